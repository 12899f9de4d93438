//! Primitive property types.

use std::{fmt, str::FromStr};

use humidifier_ir::{Literal, Number};

/// The primitive types a property can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveType {
    String,
    Long,
    Integer,
    Double,
    Boolean,
    Timestamp,
    /// Free-form document: any literal, list or object.
    Json,
}

impl PrimitiveType {
    /// Get the catalog name (e.g. `"Boolean"`).
    pub fn as_str(&self) -> &'static str {
        match self {
            PrimitiveType::String => "String",
            PrimitiveType::Long => "Long",
            PrimitiveType::Integer => "Integer",
            PrimitiveType::Double => "Double",
            PrimitiveType::Boolean => "Boolean",
            PrimitiveType::Timestamp => "Timestamp",
            PrimitiveType::Json => "Json",
        }
    }

    /// Returns true if a literal of this shape may be assigned.
    pub fn accepts(&self, literal: &Literal) -> bool {
        match (self, literal) {
            (PrimitiveType::Json, _) => true,
            (PrimitiveType::String | PrimitiveType::Timestamp, Literal::String(_)) => true,
            (PrimitiveType::Boolean, Literal::Bool(_)) => true,
            (PrimitiveType::Long | PrimitiveType::Integer, Literal::Number(Number::Integer(_))) => {
                true
            }
            (PrimitiveType::Double, Literal::Number(_)) => true,
            _ => false,
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrimitiveType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "String" => Ok(PrimitiveType::String),
            "Long" => Ok(PrimitiveType::Long),
            "Integer" => Ok(PrimitiveType::Integer),
            "Double" => Ok(PrimitiveType::Double),
            "Boolean" => Ok(PrimitiveType::Boolean),
            "Timestamp" => Ok(PrimitiveType::Timestamp),
            "Json" => Ok(PrimitiveType::Json),
            other => Err(format!(
                "unknown primitive type '{}', expected one of String, Long, Integer, Double, Boolean, Timestamp, Json",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primitive_type_as_str_round_trip() {
        for ty in [
            PrimitiveType::String,
            PrimitiveType::Long,
            PrimitiveType::Integer,
            PrimitiveType::Double,
            PrimitiveType::Boolean,
            PrimitiveType::Timestamp,
            PrimitiveType::Json,
        ] {
            assert_eq!(ty.as_str().parse::<PrimitiveType>(), Ok(ty));
        }
        assert!("Float".parse::<PrimitiveType>().is_err());
    }

    #[test]
    fn test_accepts() {
        let s = Literal::String("x".to_string());
        let b = Literal::Bool(true);
        let i = Literal::Number(Number::Integer(3));
        let f = Literal::Number(Number::Float(0.5));

        assert!(PrimitiveType::String.accepts(&s));
        assert!(!PrimitiveType::String.accepts(&b));
        assert!(PrimitiveType::Timestamp.accepts(&s));
        assert!(PrimitiveType::Boolean.accepts(&b));
        assert!(!PrimitiveType::Boolean.accepts(&s));
        assert!(PrimitiveType::Integer.accepts(&i));
        assert!(!PrimitiveType::Integer.accepts(&f));
        assert!(PrimitiveType::Long.accepts(&i));
        assert!(PrimitiveType::Double.accepts(&i));
        assert!(PrimitiveType::Double.accepts(&f));
        assert!(PrimitiveType::Json.accepts(&b));
    }
}
