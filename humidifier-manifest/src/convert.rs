//! TOML values to document nodes and values.

use humidifier_ir::{Node, Number, Scalar, TypeMismatch, Value};
use indexmap::IndexMap;

/// Convert a TOML value into a document node.
///
/// Datetimes have no document counterpart and fail with [`TypeMismatch`],
/// as do non-finite floats.
pub fn to_node(value: &toml::Value) -> Result<Node, TypeMismatch> {
    match value {
        toml::Value::String(s) => Ok(Node::string(s)),
        toml::Value::Integer(i) => Ok(Node::Scalar(Scalar::Number(Number::Integer(*i)))),
        toml::Value::Float(f) => Ok(Node::Scalar(Scalar::Number(Number::from_f64(*f)?))),
        toml::Value::Boolean(b) => Ok(Node::Scalar(Scalar::Bool(*b))),
        toml::Value::Datetime(dt) => Err(TypeMismatch::new("a literal", format!("Datetime {}", dt))),
        toml::Value::Array(items) => items
            .iter()
            .map(to_node)
            .collect::<Result<Vec<_>, _>>()
            .map(Node::Array),
        toml::Value::Table(table) => {
            let mut map = IndexMap::with_capacity(table.len());
            for (key, value) in table {
                map.insert(key.clone(), to_node(value)?);
            }
            Ok(Node::Object(map))
        }
    }
}

/// Convert a TOML value into a property value, decoding expressions.
pub fn to_value(value: &toml::Value) -> Result<Value, TypeMismatch> {
    to_node(value).map(|node| Value::from_node(&node))
}

/// Convert a TOML number.
pub(crate) fn to_number(value: &toml::Value) -> Result<Number, TypeMismatch> {
    match value {
        toml::Value::Integer(i) => Ok(Number::Integer(*i)),
        toml::Value::Float(f) => Number::from_f64(*f),
        other => Err(TypeMismatch::new("a number", other.type_str())),
    }
}
