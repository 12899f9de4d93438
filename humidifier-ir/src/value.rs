//! Literal-or-expression property values.

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::{Expression, Pseudo};

/// Ordered mapping from property name to value.
///
/// Used for nested property-type values and free-form maps. Serialization
/// order of nested property types follows the descriptors, not this map.
pub type Properties = IndexMap<String, Value>;

/// A value could not be represented as the requested kind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("type mismatch: expected {expected}, got {got}")]
pub struct TypeMismatch {
    /// The kind that was required.
    pub expected: String,
    /// The kind that was supplied.
    pub got: String,
}

impl TypeMismatch {
    pub fn new(expected: impl Into<String>, got: impl Into<String>) -> Self {
        Self {
            expected: expected.into(),
            got: got.into(),
        }
    }
}

/// A property value.
///
/// The variant is fixed when the value is built. There is no implicit
/// conversion between literals and expressions: `Value::from("vpc-1")` is a
/// string literal, `Value::reference("vpc1")` is a `Ref`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
    /// Unset. Never serialized: optional properties are omitted, required
    /// ones are reported as missing.
    #[default]
    Null,
    /// A concrete string, boolean or number.
    Literal(Literal),
    /// An ordered list of values.
    List(Vec<Value>),
    /// Field values of a nested property type, or a free-form map.
    Object(Properties),
    /// A value resolved by the provisioning engine at apply time.
    Expression(Expression),
}

impl Value {
    /// A string literal.
    pub fn string(s: impl Into<String>) -> Self {
        Value::Literal(Literal::String(s.into()))
    }

    /// A boolean literal.
    pub fn bool(b: bool) -> Self {
        Value::Literal(Literal::Bool(b))
    }

    /// An integer literal.
    pub fn integer(i: i64) -> Self {
        Value::Literal(Literal::Number(Number::Integer(i)))
    }

    /// A floating point literal. Non-finite numbers are rejected.
    pub fn float(f: f64) -> Result<Self, TypeMismatch> {
        Number::from_f64(f).map(|n| Value::Literal(Literal::Number(n)))
    }

    /// A list built from anything convertible to values.
    pub fn list<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::List(items.into_iter().map(Into::into).collect())
    }

    /// An object built from `(name, value)` pairs, keeping their order.
    pub fn object<I, K, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<Value>,
    {
        Value::Object(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// `Ref` to a logical ID or parameter.
    pub fn reference(logical_id: impl Into<String>) -> Self {
        Value::Expression(Expression::Reference(logical_id.into()))
    }

    /// `Fn::GetAtt` on a resource attribute.
    pub fn get_att(logical_id: impl Into<String>, attribute: impl Into<String>) -> Self {
        Value::Expression(Expression::AttributeReference {
            logical_id: logical_id.into(),
            attribute: attribute.into(),
        })
    }

    /// `Fn::Join` of operands with a delimiter.
    pub fn join<I, T>(delimiter: impl Into<String>, operands: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Expression(Expression::Join {
            delimiter: delimiter.into(),
            operands: operands.into_iter().map(Into::into).collect(),
        })
    }

    /// `Fn::Select` of one operand by index.
    pub fn select<I, T>(index: u32, operands: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Value::Expression(Expression::Select {
            index,
            operands: operands.into_iter().map(Into::into).collect(),
        })
    }

    /// Any intrinsic function, by name.
    ///
    /// Fails for names that are not intrinsic keys. Calls whose shape matches
    /// a first-class variant are normalized to it, see [`Expression::call`].
    pub fn call<I, T>(function: impl Into<String>, args: I) -> Result<Self, TypeMismatch>
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        let expr = Expression::call(function, args.into_iter().map(Into::into).collect())?;
        Ok(Value::Expression(expr))
    }

    /// `Ref` to a pseudo parameter such as `AWS::Region`.
    pub fn pseudo(pseudo: Pseudo) -> Self {
        Value::reference(pseudo.as_str())
    }

    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for [`Value::Expression`].
    pub fn is_expression(&self) -> bool {
        matches!(self, Value::Expression(_))
    }

    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Value::Literal(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Literal(Literal::String(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Properties> {
        match self {
            Value::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_expression(&self) -> Option<&Expression> {
        match self {
            Value::Expression(e) => Some(e),
            _ => None,
        }
    }

    /// Short kind name used in type mismatch reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Literal(l) => l.kind_name(),
            Value::List(_) => "List",
            Value::Object(_) => "Object",
            Value::Expression(_) => "Expression",
        }
    }
}

/// A concrete scalar.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    String(String),
    Bool(bool),
    Number(Number),
}

impl Literal {
    /// Short kind name used in type mismatch reports.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Literal::String(_) => "String",
            Literal::Bool(_) => "Boolean",
            Literal::Number(Number::Integer(_)) => "Integer",
            Literal::Number(Number::Float(_)) => "Double",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::String(s) => f.write_str(s),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Number(n) => write!(f, "{}", n),
        }
    }
}

/// A numeric literal. Floats are always finite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    /// Build a float, rejecting NaN and infinities.
    pub fn from_f64(f: f64) -> Result<Self, TypeMismatch> {
        if f.is_finite() {
            Ok(Number::Float(f))
        } else {
            Err(TypeMismatch::new("finite number", f.to_string()))
        }
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Integer(i) => Some(*i),
            Number::Float(_) => None,
        }
    }

    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Integer(i) => *i as f64,
            Number::Float(f) => *f,
        }
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Integer(i) => write!(f, "{}", i),
            Number::Float(x) => write!(f, "{}", x),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::string(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::integer(i64::from(i))
    }
}

impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::integer(i64::from(i))
    }
}

impl TryFrom<f64> for Value {
    type Error = TypeMismatch;

    fn try_from(f: f64) -> Result<Self, Self::Error> {
        Value::float(f)
    }
}

impl From<Literal> for Value {
    fn from(l: Literal) -> Self {
        Value::Literal(l)
    }
}

impl From<Expression> for Value {
    fn from(e: Expression) -> Self {
        Value::Expression(e)
    }
}

impl From<Properties> for Value {
    fn from(map: Properties) -> Self {
        Value::Object(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::list(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map_or(Value::Null, Into::into)
    }
}
