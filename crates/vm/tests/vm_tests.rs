//! Integration tests for the jstep VM.
//!
//! Organized by instruction group, then calls, then run-level behavior.

use jstep_common::{
    BinaryOp, ClassName, Condition, FieldRef, Instruction, InvokeKind, JvmType, MethodId,
    Reference, Value,
};
use jstep_vm::{run, Config, Driver, Fault, InternalError, Outcome};
use proptest::prelude::*;
use std::collections::HashMap;

// ============================================================
// Helper functions
// ============================================================

fn method(id: &str) -> MethodId {
    id.parse().unwrap()
}

fn push_int(v: i32) -> Instruction {
    Instruction::Push(Value::Int(v))
}

fn load(ty: JvmType, index: usize) -> Instruction {
    Instruction::Load { ty, index }
}

fn store(ty: JvmType, index: usize) -> Instruction {
    Instruction::Store { ty, index }
}

fn binary(op: BinaryOp) -> Instruction {
    Instruction::Binary {
        ty: JvmType::Int,
        op,
    }
}

fn ifz(cond: Condition, target: usize) -> Instruction {
    Instruction::Ifz { cond, target }
}

fn if_cmp(cond: Condition, target: usize) -> Instruction {
    Instruction::If { cond, target }
}

fn goto(target: usize) -> Instruction {
    Instruction::Goto { target }
}

fn new(class: &str) -> Instruction {
    Instruction::New {
        class: ClassName::new(class),
    }
}

fn dup() -> Instruction {
    Instruction::Dup { words: 1 }
}

fn invoke(kind: InvokeKind, id: &str) -> Instruction {
    Instruction::Invoke {
        kind,
        method: method(id),
    }
}

fn ret() -> Instruction {
    Instruction::Return { ty: None }
}

fn ret_int() -> Instruction {
    Instruction::Return {
        ty: Some(JvmType::Int),
    }
}

fn assertions_disabled() -> Instruction {
    Instruction::Get {
        is_static: true,
        field: "jpamb.cases.Simple.$assertionsDisabled:Z".parse().unwrap(),
    }
}

/// `assert false` as javac emits it, starting at `at`.
fn assert_false(at: usize) -> Vec<Instruction> {
    vec![
        assertions_disabled(),
        ifz(Condition::Ne, at + 6),
        new("java/lang/AssertionError"),
        dup(),
        invoke(InvokeKind::Special, "java/lang/AssertionError.<init>:()V"),
        Instruction::Throw,
    ]
}

const ENTRY: &str = "jpamb.cases.Simple.f:()I";

/// Run a single-method program with no arguments.
fn run_program(code: Vec<Instruction>) -> Result<Outcome, InternalError> {
    run_with(ENTRY, code, vec![])
}

fn run_with(id: &str, code: Vec<Instruction>, args: Vec<Value>) -> Result<Outcome, InternalError> {
    let entry = method(id);
    let mut source = HashMap::new();
    source.insert(entry.clone(), code);
    run(source, &entry, args)
}

fn string_call(name: &str, desc: &str) -> Instruction {
    invoke(InvokeKind::Virtual, &format!("java/lang/String.{name}:{desc}"))
}

// ============================================================
// Constants, locals, arithmetic
// ============================================================

#[test]
fn add_then_return_is_ok() {
    let result = run_program(vec![push_int(3), push_int(4), binary(BinaryOp::Add), ret_int()]);
    assert_eq!(result, Ok(Outcome::Ok));
}

#[test]
fn division_by_zero() {
    let result = run_program(vec![push_int(4), push_int(0), binary(BinaryOp::Div), ret_int()]);
    assert_eq!(result, Ok(Outcome::Fault(Fault::DivideByZero)));
}

#[test]
fn remainder_by_zero() {
    let result = run_program(vec![push_int(4), push_int(0), binary(BinaryOp::Rem), ret_int()]);
    assert_eq!(result, Ok(Outcome::Fault(Fault::DivideByZero)));
}

#[test]
fn computed_value_reaches_return() {
    let entry = method(ENTRY);
    let mut source = HashMap::new();
    source.insert(
        entry.clone(),
        vec![
            push_int(3),
            push_int(4),
            binary(BinaryOp::Add),
            push_int(7),
            if_cmp(Condition::Eq, 7),
            Instruction::Push(Value::null()),
            Instruction::Throw,
            ret(),
        ],
    );
    let execution = Driver::new(source).run(&entry, vec![]).unwrap();
    assert_eq!(execution.outcome, Outcome::Ok);
    assert!(execution.state.frames.is_empty());
}

#[test]
fn overflow_wraps() {
    let result = run_program(vec![
        push_int(i32::MAX),
        push_int(1),
        binary(BinaryOp::Add),
        push_int(i32::MIN),
        if_cmp(Condition::Eq, 7),
        Instruction::Push(Value::null()),
        Instruction::Throw,
        ret(),
    ]);
    assert_eq!(result, Ok(Outcome::Ok));
}

#[test]
fn unset_locals_read_defaults() {
    // 0 == 0, false == 0, null is null: none of the throws are reached.
    let result = run_program(vec![
        load(JvmType::Int, 5),
        ifz(Condition::Eq, 3),
        Instruction::Throw,
        load(JvmType::Boolean, 6),
        ifz(Condition::Eq, 6),
        Instruction::Throw,
        load(JvmType::Reference, 7),
        ifz(Condition::Eq, 9),
        Instruction::Throw,
        ret(),
    ]);
    assert_eq!(result, Ok(Outcome::Ok));
}

#[test]
fn store_then_load() {
    let result = run_program(vec![
        push_int(9),
        store(JvmType::Int, 2),
        load(JvmType::Int, 2),
        push_int(9),
        if_cmp(Condition::Eq, 7),
        Instruction::Push(Value::null()),
        Instruction::Throw,
        ret(),
    ]);
    assert_eq!(result, Ok(Outcome::Ok));
}

#[test]
fn binary_on_non_int_type_is_unsupported() {
    let result = run_program(vec![
        push_int(1),
        push_int(2),
        Instruction::Binary {
            ty: JvmType::Char,
            op: BinaryOp::Add,
        },
        ret_int(),
    ]);
    assert!(matches!(result, Err(InternalError::UnsupportedInstruction { .. })));
}

#[test]
fn binary_type_mismatch() {
    let result = run_program(vec![
        Instruction::Push(Value::Boolean(true)),
        push_int(2),
        binary(BinaryOp::Add),
        ret_int(),
    ]);
    assert!(matches!(result, Err(InternalError::TypeMismatch { .. })));
}

// ============================================================
// Branches
// ============================================================

#[test]
fn ifz_branches_on_sign() {
    // f(x) = x > 0 ? ok : assertion error
    let mut code = vec![load(JvmType::Int, 0), ifz(Condition::Gt, 8)];
    code.extend(assert_false(2));
    code.push(ret());
    let id = "jpamb.cases.Simple.positive:(I)V";
    assert_eq!(run_with(id, code.clone(), vec![Value::Int(5)]), Ok(Outcome::Ok));
    assert_eq!(
        run_with(id, code, vec![Value::Int(0)]),
        Ok(Outcome::Fault(Fault::AssertionError))
    );
}

#[test]
fn ifz_coerces_booleans_and_chars() {
    let result = run_program(vec![
        Instruction::Push(Value::Boolean(true)),
        ifz(Condition::Eq, 5),
        Instruction::Push(Value::Char('a')),
        ifz(Condition::Gt, 6),
        Instruction::Throw,
        Instruction::Throw,
        ret(),
    ]);
    assert_eq!(result, Ok(Outcome::Ok));
}

#[test]
fn if_compares_chars_by_code_point() {
    let result = run_program(vec![
        Instruction::Push(Value::Char('a')),
        push_int(97),
        if_cmp(Condition::Eq, 5),
        Instruction::Push(Value::null()),
        Instruction::Throw,
        ret(),
    ]);
    assert_eq!(result, Ok(Outcome::Ok));
}

#[test]
fn references_compare_by_identity() {
    let result = run_program(vec![
        Instruction::Push(Value::null()),
        Instruction::Push(Value::null()),
        if_cmp(Condition::Eq, 5),
        Instruction::Push(Value::null()),
        Instruction::Throw,
        new("jpamb/cases/Box"),
        new("jpamb/cases/Box"),
        if_cmp(Condition::Ne, 10),
        Instruction::Push(Value::null()),
        Instruction::Throw,
        ret(),
    ]);
    assert_eq!(result, Ok(Outcome::Ok));
}

#[test]
fn ordering_references_is_an_error() {
    let result = run_program(vec![
        Instruction::Push(Value::null()),
        Instruction::Push(Value::null()),
        if_cmp(Condition::Lt, 3),
        ret(),
    ]);
    assert!(matches!(result, Err(InternalError::ReferenceOrdering { condition: "lt", .. })));
}

#[test]
fn tight_loop_diverges() {
    assert_eq!(run_program(vec![goto(0)]), Ok(Outcome::Diverged));
}

#[test]
fn counted_loop_terminates() {
    // for (i = 0; i < 10; i++) {}
    let result = run_program(vec![
        push_int(0),
        store(JvmType::Int, 0),
        load(JvmType::Int, 0),
        push_int(10),
        if_cmp(Condition::Ge, 10),
        load(JvmType::Int, 0),
        push_int(1),
        binary(BinaryOp::Add),
        store(JvmType::Int, 0),
        goto(2),
        ret(),
    ]);
    assert_eq!(result, Ok(Outcome::Ok));
}

#[test]
fn step_bound_is_configurable() {
    let entry = method(ENTRY);
    let mut source = HashMap::new();
    // Eight steps per iteration, 100 iterations.
    source.insert(
        entry.clone(),
        vec![
            push_int(0),
            store(JvmType::Int, 0),
            load(JvmType::Int, 0),
            push_int(100),
            if_cmp(Condition::Ge, 10),
            load(JvmType::Int, 0),
            push_int(1),
            binary(BinaryOp::Add),
            store(JvmType::Int, 0),
            goto(2),
            ret(),
        ],
    );
    let mut small = Driver::with_config(source.clone(), Config { max_steps: 50 });
    assert_eq!(small.run(&entry, vec![]).unwrap().outcome, Outcome::Diverged);
    let mut large = Driver::with_config(source, Config { max_steps: 5000 });
    assert_eq!(large.run(&entry, vec![]).unwrap().outcome, Outcome::Ok);
}

// ============================================================
// Objects, fields, throw
// ============================================================

#[test]
fn assertion_failure() {
    let mut code = assert_false(0);
    code.push(ret());
    assert_eq!(run_program(code), Ok(Outcome::Fault(Fault::AssertionError)));
}

#[test]
fn throwing_null_is_null_pointer() {
    assert_eq!(
        run_program(vec![Instruction::Push(Value::null()), Instruction::Throw]),
        Ok(Outcome::Fault(Fault::NullPointer))
    );
    assert_eq!(
        run_with(
            "jpamb.cases.Simple.g:(Ljava/lang/String;)V",
            vec![load(JvmType::Reference, 0), Instruction::Throw],
            vec![Value::null()],
        ),
        Ok(Outcome::Fault(Fault::NullPointer))
    );
}

#[test]
fn throwing_other_objects_reports_assertion_error() {
    let result = run_program(vec![
        new("java/lang/IllegalStateException"),
        dup(),
        invoke(InvokeKind::Special, "java/lang/IllegalStateException.<init>:()V"),
        Instruction::Throw,
    ]);
    assert_eq!(result, Ok(Outcome::Fault(Fault::AssertionError)));
}

#[test]
fn throwing_an_int_is_a_type_mismatch() {
    let result = run_program(vec![push_int(1), Instruction::Throw]);
    assert!(matches!(
        result,
        Err(InternalError::TypeMismatch { expected: JvmType::Reference, found: JvmType::Int, .. })
    ));
}

#[test]
fn new_allocates_heap_objects() {
    let entry = method(ENTRY);
    let mut source = HashMap::new();
    source.insert(entry.clone(), vec![new("a/B"), new("a/C"), goto(2)]);
    let execution = Driver::with_config(source, Config { max_steps: 3 })
        .run(&entry, vec![])
        .unwrap();
    let frame = &execution.state.frames[0];
    assert_eq!(execution.state.heap.len(), 2);
    assert_eq!(
        frame.stack[1],
        Value::Reference(Reference::Object {
            class: ClassName::new("a.C"),
            handle: 1,
        })
    );
}

#[test]
fn dup_on_empty_stack_is_an_error() {
    assert!(matches!(
        run_program(vec![dup()]),
        Err(InternalError::EmptyStackDup { .. })
    ));
}

#[test]
fn dup_of_two_words_is_unsupported() {
    let result = run_program(vec![push_int(1), Instruction::Dup { words: 2 }]);
    assert!(matches!(result, Err(InternalError::UnsupportedInstruction { .. })));
}

#[test]
fn other_static_fields_are_unsupported() {
    let field: FieldRef = "jpamb.cases.Simple.counter:I".parse().unwrap();
    let result = run_program(vec![Instruction::Get {
        is_static: true,
        field,
    }]);
    assert!(matches!(result, Err(InternalError::UnsupportedField { .. })));
}

#[test]
fn instance_field_on_null_is_null_pointer() {
    let field: FieldRef = "jpamb.cases.Box.value:I".parse().unwrap();
    let result = run_program(vec![
        Instruction::Push(Value::null()),
        Instruction::Get {
            is_static: false,
            field,
        },
    ]);
    assert_eq!(result, Ok(Outcome::Fault(Fault::NullPointer)));
}

// ============================================================
// Strings
// ============================================================

#[test]
fn length_of_null_is_null_pointer() {
    let result = run_with(
        "jpamb.cases.Strings.len:(Ljava/lang/String;)I",
        vec![
            load(JvmType::Reference, 0),
            string_call("length", "()I"),
            ret_int(),
        ],
        vec![Value::null()],
    );
    assert_eq!(result, Ok(Outcome::Fault(Fault::NullPointer)));
}

#[test]
fn char_at_out_of_bounds() {
    let id = "jpamb.cases.Strings.at:(Ljava/lang/String;I)C";
    let code = vec![
        load(JvmType::Reference, 0),
        load(JvmType::Int, 1),
        string_call("charAt", "(I)C"),
        Instruction::Return {
            ty: Some(JvmType::Char),
        },
    ];
    assert_eq!(
        run_with(id, code.clone(), vec![Value::text("abc"), Value::Int(2)]),
        Ok(Outcome::Ok)
    );
    assert_eq!(
        run_with(id, code, vec![Value::text("abc"), Value::Int(3)]),
        Ok(Outcome::Fault(Fault::OutOfBounds))
    );
}

#[test]
fn equals_result_drives_branch() {
    // assert s.equals("yes")
    let mut code = vec![
        load(JvmType::Reference, 0),
        Instruction::Push(Value::text("yes")),
        string_call("equals", "(Ljava/lang/Object;)Z"),
        ifz(Condition::Ne, 8),
    ];
    code.extend(assert_false(3).into_iter().skip(2));
    code.push(ret());
    let id = "jpamb.cases.Strings.check:(Ljava/lang/String;)V";
    assert_eq!(run_with(id, code.clone(), vec![Value::text("yes")]), Ok(Outcome::Ok));
    assert_eq!(
        run_with(id, code, vec![Value::text("no")]),
        Ok(Outcome::Fault(Fault::AssertionError))
    );
}

#[test]
fn unknown_library_call_is_an_error() {
    let result = run_program(vec![
        Instruction::Push(Value::text("x")),
        string_call("hashCode", "()I"),
        ret_int(),
    ]);
    assert!(matches!(result, Err(InternalError::UnsupportedCall { .. })));
}

// ============================================================
// Calls between methods
// ============================================================

#[test]
fn static_call_returns_into_caller() {
    let entry = method("jpamb.cases.Calls.main:()V");
    let callee = method("jpamb.cases.Calls.div:(II)I");
    let mut source = HashMap::new();
    source.insert(
        entry.clone(),
        vec![
            push_int(10),
            push_int(2),
            invoke(InvokeKind::Static, "jpamb.cases.Calls.div:(II)I"),
            push_int(5),
            if_cmp(Condition::Eq, 7),
            Instruction::Push(Value::null()),
            Instruction::Throw,
            ret(),
        ],
    );
    source.insert(
        callee,
        vec![
            load(JvmType::Int, 0),
            load(JvmType::Int, 1),
            binary(BinaryOp::Div),
            ret_int(),
        ],
    );
    assert_eq!(run(source, &entry, vec![]), Ok(Outcome::Ok));
}

#[test]
fn fault_in_callee_ends_the_run() {
    let entry = method("jpamb.cases.Calls.main:()V");
    let mut source = HashMap::new();
    source.insert(
        entry.clone(),
        vec![
            push_int(1),
            push_int(0),
            invoke(InvokeKind::Static, "jpamb.cases.Calls.div:(II)I"),
            ret(),
        ],
    );
    source.insert(
        method("jpamb.cases.Calls.div:(II)I"),
        vec![
            load(JvmType::Int, 0),
            load(JvmType::Int, 1),
            binary(BinaryOp::Div),
            ret_int(),
        ],
    );
    assert_eq!(
        run(source, &entry, vec![]),
        Ok(Outcome::Fault(Fault::DivideByZero))
    );
}

#[test]
fn virtual_call_passes_receiver_in_slot_zero() {
    let entry = method("jpamb.cases.Calls.main:()V");
    let mut source = HashMap::new();
    source.insert(
        entry.clone(),
        vec![
            new("jpamb/cases/Calls"),
            dup(),
            invoke(InvokeKind::Special, "jpamb/cases/Calls.<init>:()V"),
            push_int(0),
            invoke(InvokeKind::Virtual, "jpamb.cases.Calls.check:(I)V"),
            ret(),
        ],
    );
    // Slot 0 holds the receiver, slot 1 the argument.
    source.insert(
        method("jpamb.cases.Calls.check:(I)V"),
        vec![
            load(JvmType::Reference, 0),
            ifz(Condition::Eq, 5),
            load(JvmType::Int, 1),
            ifz(Condition::Ne, 5),
            ret(),
            Instruction::Push(Value::null()),
            Instruction::Throw,
        ],
    );
    assert_eq!(run(source, &entry, vec![]), Ok(Outcome::Ok));
}

#[test]
fn unbounded_recursion_diverges() {
    let entry = method("jpamb.cases.Calls.forever:()V");
    let mut source = HashMap::new();
    source.insert(
        entry.clone(),
        vec![invoke(InvokeKind::Static, "jpamb.cases.Calls.forever:()V"), ret()],
    );
    assert_eq!(run(source, &entry, vec![]), Ok(Outcome::Diverged));
}

#[test]
fn code_store_loads_each_method_once() {
    let entry = method(ENTRY);
    let mut calls = 0;
    let source = |m: &MethodId| {
        calls += 1;
        (m == &entry).then(|| vec![goto(0)])
    };
    Driver::new(source).run(&entry, vec![]).unwrap();
    assert_eq!(calls, 1);
}

// ============================================================
// Run-level behavior
// ============================================================

#[test]
fn immediate_return_empties_the_call_stack() {
    let entry = method("jpamb.cases.Simple.noop:()V");
    let mut source = HashMap::new();
    source.insert(entry.clone(), vec![ret()]);
    let execution = Driver::new(source).run(&entry, vec![]).unwrap();
    assert_eq!(execution.outcome, Outcome::Ok);
    assert_eq!(execution.steps, 1);
    assert!(execution.state.frames.is_empty());
}

#[test]
fn running_off_the_end_is_an_error() {
    let result = run_program(vec![push_int(1)]);
    assert!(matches!(result, Err(InternalError::UnknownProgramCounter { .. })));
}

#[test]
fn missing_entry_is_an_error() {
    let entry = method(ENTRY);
    let result = run(HashMap::new(), &entry, vec![]);
    assert_eq!(result, Err(InternalError::UnknownMethod { method: entry }));
}

#[test]
fn pop_from_empty_stack_is_an_error() {
    let result = run_program(vec![store(JvmType::Int, 0)]);
    assert!(matches!(result, Err(InternalError::StackUnderflow { .. })));
}

// ============================================================
// Properties
// ============================================================

proptest! {
    #[test]
    fn div_by_zero_never_computes(a: i32, rem: bool) {
        let op = if rem { BinaryOp::Rem } else { BinaryOp::Div };
        let result = run_program(vec![push_int(a), push_int(0), binary(op), ret_int()]);
        prop_assert_eq!(result, Ok(Outcome::Fault(Fault::DivideByZero)));
    }

    #[test]
    fn nonzero_divisor_is_ok(a: i32, b in any::<i32>().prop_filter("nonzero", |b| *b != 0)) {
        let result = run_program(vec![push_int(a), push_int(b), binary(BinaryOp::Div), ret_int()]);
        prop_assert_eq!(result, Ok(Outcome::Ok));
    }

    #[test]
    fn char_at_bounds(s in "[a-z]{0,8}", i in -3i32..12) {
        let result = run_with(
            "jpamb.cases.Strings.at:(Ljava/lang/String;I)C",
            vec![
                load(JvmType::Reference, 0),
                load(JvmType::Int, 1),
                string_call("charAt", "(I)C"),
                Instruction::Return { ty: Some(JvmType::Char) },
            ],
            vec![Value::text(s.clone()), Value::Int(i)],
        );
        let expected = if i < 0 || i as usize >= s.len() {
            Outcome::Fault(Fault::OutOfBounds)
        } else {
            Outcome::Ok
        };
        prop_assert_eq!(result, Ok(expected));
    }

    #[test]
    fn substring_bounds(s in "[a-z]{0,8}", b in -2i32..11, e in -2i32..11) {
        let result = run_with(
            "jpamb.cases.Strings.cut:(Ljava/lang/String;II)Ljava/lang/String;",
            vec![
                load(JvmType::Reference, 0),
                load(JvmType::Int, 1),
                load(JvmType::Int, 2),
                string_call("substring", "(II)Ljava/lang/String;"),
                Instruction::Return { ty: Some(JvmType::Reference) },
            ],
            vec![Value::text(s.clone()), Value::Int(b), Value::Int(e)],
        );
        let len = s.len() as i32;
        let expected = if b < 0 || e > len || b > e {
            Outcome::Fault(Fault::OutOfBounds)
        } else {
            Outcome::Ok
        };
        prop_assert_eq!(result, Ok(expected));
    }

    #[test]
    fn throwing_null_from_any_slot(slot in 0usize..16) {
        let result = run_program(vec![load(JvmType::Reference, slot), Instruction::Throw]);
        prop_assert_eq!(result, Ok(Outcome::Fault(Fault::NullPointer)));
    }
}
