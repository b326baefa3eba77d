//! Listings: named method bodies ready to be served to the interpreter.
//!
//! A listing is an ordered set of methods, each a sequence of decoded
//! instructions. Branch targets are instruction indices within their own
//! method.

use crate::instruction::Instruction;
use crate::method::MethodId;
use std::collections::HashMap;

/// The code of one method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCode {
    pub id: MethodId,
    pub code: Vec<Instruction>,
}

/// A set of methods in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// Methods in the order they were declared.
    pub methods: Vec<MethodCode>,
}

impl Listing {
    pub fn new(methods: Vec<MethodCode>) -> Self {
        Self { methods }
    }

    /// Code of `id`, if the listing declares it.
    pub fn get(&self, id: &MethodId) -> Option<&[Instruction]> {
        self.methods
            .iter()
            .find(|m| &m.id == id)
            .map(|m| m.code.as_slice())
    }

    /// Number of methods.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Total instructions across all methods.
    pub fn instruction_count(&self) -> usize {
        self.methods.iter().map(|m| m.code.len()).sum()
    }
}

impl From<Listing> for HashMap<MethodId, Vec<Instruction>> {
    fn from(listing: Listing) -> Self {
        listing
            .methods
            .into_iter()
            .map(|m| (m.id, m.code))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn listing() -> Listing {
        Listing::new(vec![
            MethodCode {
                id: "a.B.f:()V".parse().unwrap(),
                code: vec![Instruction::Return { ty: None }],
            },
            MethodCode {
                id: "a.B.g:()I".parse().unwrap(),
                code: vec![
                    Instruction::Push(Value::Int(1)),
                    Instruction::Return { ty: Some(crate::JvmType::Int) },
                ],
            },
        ])
    }

    #[test]
    fn empty_listing() {
        let listing = Listing::default();
        assert!(listing.is_empty());
        assert_eq!(listing.instruction_count(), 0);
    }

    #[test]
    fn lookup_by_id() {
        let listing = listing();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing.instruction_count(), 3);
        assert_eq!(listing.get(&"a.B.g:()I".parse().unwrap()).map(<[_]>::len), Some(2));
        assert!(listing.get(&"a.B.h:()I".parse().unwrap()).is_none());
    }

    #[test]
    fn converts_into_map() {
        let map: HashMap<MethodId, Vec<Instruction>> = listing().into();
        assert_eq!(map.len(), 2);
        assert_eq!(map[&"a.B.f:()V".parse::<MethodId>().unwrap()].len(), 1);
    }
}
