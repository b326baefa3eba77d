//! Class, method, and field identifiers.
//!
//! Identifiers use the `pkg.Class.member:descriptor` form. Class names
//! written with slashes (`java/lang/String`) are normalized to dots.

use crate::error::ParseError;
use crate::types::JvmType;
use std::fmt;
use std::str::FromStr;

/// A fully-qualified class name in dotted form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassName(String);

impl ClassName {
    /// `java.lang.AssertionError`, the one exception family that is modeled.
    pub const ASSERTION_ERROR: &'static str = "java.lang.AssertionError";
    /// `java.lang.String`, whose methods are emulated.
    pub const STRING: &'static str = "java.lang.String";

    /// Create a class name, normalizing `/` separators to `.`.
    pub fn new(name: &str) -> Self {
        Self(name.replace('/', "."))
    }

    /// The dotted name.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_assertion_error(&self) -> bool {
        self.0 == Self::ASSERTION_ERROR
    }

    pub fn is_string(&self) -> bool {
        self.0 == Self::STRING
    }
}

impl fmt::Display for ClassName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split `Class.member:descriptor` into its three parts.
fn split_member(s: &str) -> Option<(&str, &str, &str)> {
    let (path, descriptor) = s.split_once(':')?;
    let (class, member) = path.rsplit_once('.')?;
    if class.is_empty() || member.is_empty() || descriptor.is_empty() {
        return None;
    }
    Some((class, member, descriptor))
}

/// Identifies a method: declaring class, name, and signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MethodId {
    /// Declaring class.
    pub class: ClassName,
    /// Method name (`<init>` for constructors).
    pub name: String,
    /// Parameter types in declaration order.
    pub params: Vec<JvmType>,
    /// Return type, `None` for `void`.
    pub returns: Option<JvmType>,
    /// Descriptor text as written, kept for display.
    descriptor: String,
}

impl MethodId {
    /// Name used by constructors.
    pub const CONSTRUCTOR: &'static str = "<init>";

    /// Number of arguments the method pops, not counting a receiver.
    pub fn param_count(&self) -> usize {
        self.params.len()
    }

    /// True for `<init>`.
    pub fn is_constructor(&self) -> bool {
        self.name == Self::CONSTRUCTOR
    }

    /// The `(params)ret` descriptor.
    pub fn descriptor(&self) -> &str {
        &self.descriptor
    }

    fn parse_descriptor(descriptor: &str) -> Result<(Vec<JvmType>, Option<JvmType>), ParseError> {
        let invalid = || ParseError::InvalidDescriptor(descriptor.to_string());

        let rest = descriptor.strip_prefix('(').ok_or_else(invalid)?;
        let (mut params_str, ret_str) = rest.split_once(')').ok_or_else(invalid)?;

        let mut params = Vec::new();
        while !params_str.is_empty() {
            let (ty, len) = JvmType::parse_descriptor(params_str)?;
            params.push(ty.ok_or_else(invalid)?);
            params_str = &params_str[len..];
        }

        let (returns, len) = JvmType::parse_descriptor(ret_str)?;
        if len != ret_str.len() {
            return Err(invalid());
        }

        Ok((params, returns))
    }
}

impl FromStr for MethodId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (class, name, descriptor) =
            split_member(s.trim()).ok_or_else(|| ParseError::InvalidMethodId(s.to_string()))?;
        let (params, returns) = Self::parse_descriptor(descriptor)?;

        Ok(Self {
            class: ClassName::new(class),
            name: name.to_string(),
            params,
            returns,
            descriptor: descriptor.to_string(),
        })
    }
}

impl fmt::Display for MethodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.class, self.name, self.descriptor())
    }
}

/// Identifies a field: declaring class, name, and type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldRef {
    pub class: ClassName,
    pub name: String,
    pub ty: JvmType,
    descriptor: String,
}

impl FieldRef {
    /// Synthetic static flag compiled into classes that contain `assert`.
    pub const ASSERTIONS_DISABLED: &'static str = "$assertionsDisabled";

    pub fn is_assertions_disabled(&self) -> bool {
        self.name == Self::ASSERTIONS_DISABLED
    }
}

impl FromStr for FieldRef {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (class, name, descriptor) =
            split_member(s.trim()).ok_or_else(|| ParseError::InvalidFieldRef(s.to_string()))?;

        let (ty, len) = JvmType::parse_descriptor(descriptor)?;
        let ty = ty.ok_or_else(|| ParseError::InvalidDescriptor(descriptor.to_string()))?;
        if len != descriptor.len() {
            return Err(ParseError::InvalidDescriptor(descriptor.to_string()));
        }

        Ok(Self {
            class: ClassName::new(class),
            name: name.to_string(),
            ty,
            descriptor: descriptor.to_string(),
        })
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}:{}", self.class, self.name, self.descriptor)
    }
}
