//! Type definitions
//!
//! The closed set of types, the assignability rule and the symbol records
//! the analyzer attaches to the AST.

use std::fmt;

/// A static type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Nil,
    Boolean,
    Integer,
    Decimal,
    Character,
    String,
    /// Supertype of Integer, Decimal, Character and String
    Comparable,
    /// Supertype of everything
    Any,
}

impl Type {
    /// Resolve a type name as written in source
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Nil" => Some(Self::Nil),
            "Boolean" => Some(Self::Boolean),
            "Integer" => Some(Self::Integer),
            "Decimal" => Some(Self::Decimal),
            "Character" => Some(Self::Character),
            "String" => Some(Self::String),
            "Comparable" => Some(Self::Comparable),
            "Any" => Some(Self::Any),
            _ => None,
        }
    }

    /// The name used in source and in messages
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nil => "Nil",
            Self::Boolean => "Boolean",
            Self::Integer => "Integer",
            Self::Decimal => "Decimal",
            Self::Character => "Character",
            Self::String => "String",
            Self::Comparable => "Comparable",
            Self::Any => "Any",
        }
    }

    /// True for the four types that `Comparable` admits
    pub fn is_comparable(&self) -> bool {
        matches!(
            self,
            Self::Integer | Self::Decimal | Self::Character | Self::String
        )
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Succeeds iff a value of type `actual` may be stored where `target` is expected
pub fn require_assignable(target: Type, actual: Type) -> Result<(), String> {
    let assignable = actual == target
        || target == Type::Any
        || (target == Type::Comparable && actual.is_comparable());

    if assignable {
        Ok(())
    } else {
        Err(format!("Type {} is not assignable to {}", actual, target))
    }
}

/// A resolved variable binding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub ty: Type,
    pub mutable: bool,
    /// Declared with `LIST`; `ty` is then the element type
    pub list: bool,
}

impl Variable {
    pub fn new(name: impl Into<String>, ty: Type, mutable: bool) -> Self {
        Self {
            name: name.into(),
            ty,
            mutable,
            list: false,
        }
    }

    pub fn list(name: impl Into<String>, element_type: Type) -> Self {
        Self {
            name: name.into(),
            ty: element_type,
            mutable: true,
            list: true,
        }
    }
}

/// A resolved function signature, keyed by name and arity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub parameter_types: Vec<Type>,
    pub return_type: Type,
}

impl FunctionSignature {
    pub fn new(name: impl Into<String>, parameter_types: Vec<Type>, return_type: Type) -> Self {
        Self {
            name: name.into(),
            parameter_types,
            return_type,
        }
    }

    pub fn arity(&self) -> usize {
        self.parameter_types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Type; 8] = [
        Type::Nil,
        Type::Boolean,
        Type::Integer,
        Type::Decimal,
        Type::Character,
        Type::String,
        Type::Comparable,
        Type::Any,
    ];

    #[test]
    fn test_type_names_round_trip() {
        for ty in ALL {
            assert_eq!(Type::from_name(ty.name()), Some(ty));
        }
        assert_eq!(Type::from_name("int"), None);
        assert_eq!(Type::from_name("List"), None);
    }

    #[test]
    fn test_any_accepts_everything() {
        for ty in ALL {
            assert!(require_assignable(Type::Any, ty).is_ok());
        }
    }

    #[test]
    fn test_comparable() {
        assert!(require_assignable(Type::Comparable, Type::Integer).is_ok());
        assert!(require_assignable(Type::Comparable, Type::Decimal).is_ok());
        assert!(require_assignable(Type::Comparable, Type::Character).is_ok());
        assert!(require_assignable(Type::Comparable, Type::String).is_ok());
        assert!(require_assignable(Type::Comparable, Type::Boolean).is_err());
        assert!(require_assignable(Type::Comparable, Type::Nil).is_err());
    }

    #[test]
    fn test_exact_match_otherwise() {
        assert!(require_assignable(Type::Integer, Type::Integer).is_ok());
        assert!(require_assignable(Type::Integer, Type::Decimal).is_err());
        assert!(require_assignable(Type::Integer, Type::Comparable).is_err());
        assert!(require_assignable(Type::String, Type::Any).is_err());
    }

    #[test]
    fn test_signature_arity() {
        let sig = FunctionSignature::new("print", vec![Type::Any], Type::Nil);
        assert_eq!(sig.arity(), 1);
    }
}
