//! Generic document tree.

use std::fmt;

use indexmap::IndexMap;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{self, MapAccess, SeqAccess, Visitor},
    ser::{SerializeMap, SerializeSeq},
};

use crate::Number;

/// A node of the serialized document.
///
/// Objects keep their key order, so writing the same tree twice produces the
/// same text. There is no null node: unset values are omitted before a tree
/// is built.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Object(IndexMap<String, Node>),
    Array(Vec<Node>),
    Scalar(Scalar),
}

/// A leaf of the document.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Bool(bool),
    Number(Number),
}

impl Node {
    /// A string scalar.
    pub fn string(s: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(s.into()))
    }

    /// An object with a single entry, the shape of every encoded function.
    pub fn single(key: impl Into<String>, value: Node) -> Self {
        let mut map = IndexMap::with_capacity(1);
        map.insert(key.into(), value);
        Node::Object(map)
    }

    pub fn as_object(&self) -> Option<&IndexMap<String, Node>> {
        match self {
            Node::Object(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Node]> {
        match self {
            Node::Array(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Look up a key of an object node.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_object().and_then(|map| map.get(key))
    }
}

impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Node::Object(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Node::Array(items) => {
                let mut out = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    out.serialize_element(item)?;
                }
                out.end()
            }
            Node::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Scalar::String(s) => serializer.serialize_str(s),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Number(Number::Integer(i)) => serializer.serialize_i64(*i),
            Scalar::Number(Number::Float(f)) => serializer.serialize_f64(*f),
        }
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct NodeVisitor;

        impl<'de> Visitor<'de> for NodeVisitor {
            type Value = Node;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an object, array, string, boolean or number")
            }

            fn visit_bool<E>(self, v: bool) -> Result<Node, E> {
                Ok(Node::Scalar(Scalar::Bool(v)))
            }

            fn visit_i64<E>(self, v: i64) -> Result<Node, E> {
                Ok(Node::Scalar(Scalar::Number(Number::Integer(v))))
            }

            fn visit_u64<E>(self, v: u64) -> Result<Node, E>
            where
                E: de::Error,
            {
                match i64::try_from(v) {
                    Ok(i) => Ok(Node::Scalar(Scalar::Number(Number::Integer(i)))),
                    Err(_) => self.visit_f64(v as f64),
                }
            }

            fn visit_f64<E>(self, v: f64) -> Result<Node, E>
            where
                E: de::Error,
            {
                Number::from_f64(v)
                    .map(|n| Node::Scalar(Scalar::Number(n)))
                    .map_err(E::custom)
            }

            fn visit_str<E>(self, v: &str) -> Result<Node, E> {
                Ok(Node::string(v))
            }

            fn visit_string<E>(self, v: String) -> Result<Node, E> {
                Ok(Node::string(v))
            }

            fn visit_unit<E>(self) -> Result<Node, E>
            where
                E: de::Error,
            {
                Err(E::custom("null has no document representation"))
            }

            fn visit_none<E>(self) -> Result<Node, E>
            where
                E: de::Error,
            {
                self.visit_unit()
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Node::Array(items))
            }

            fn visit_map<M>(self, mut map: M) -> Result<Node, M::Error>
            where
                M: MapAccess<'de>,
            {
                let mut entries = IndexMap::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((key, value)) = map.next_entry::<String, Node>()? {
                    entries.insert(key, value);
                }
                Ok(Node::Object(entries))
            }
        }

        deserializer.deserialize_any(NodeVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialize_keeps_key_order() {
        let mut map = IndexMap::new();
        map.insert("Type".to_string(), Node::string("AWS::EC2::VPC"));
        map.insert("Properties".to_string(), Node::Object(IndexMap::new()));
        map.insert("Alpha".to_string(), Node::Scalar(Scalar::Bool(true)));

        let json = serde_json::to_string(&Node::Object(map)).unwrap();
        assert_eq!(
            json,
            r#"{"Type":"AWS::EC2::VPC","Properties":{},"Alpha":true}"#
        );
    }

    #[test]
    fn test_serialize_scalars() {
        let node = Node::Array(vec![
            Node::string("a"),
            Node::Scalar(Scalar::Number(Number::Integer(3))),
            Node::Scalar(Scalar::Number(Number::Float(1.5))),
            Node::Scalar(Scalar::Bool(false)),
        ]);
        assert_eq!(serde_json::to_string(&node).unwrap(), r#"["a",3,1.5,false]"#);
    }

    #[test]
    fn test_deserialize_preserves_document_order() {
        let node: Node = serde_json::from_str(r#"{"Zeta": 1, "Alpha": [true, "x"]}"#).unwrap();
        let keys: Vec<_> = node.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["Zeta", "Alpha"]);
        assert_eq!(node.get("Alpha").unwrap().as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_deserialize_rejects_null() {
        let result: Result<Node, _> = serde_json::from_str(r#"{"Key": null}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_single() {
        let node = Node::single("Ref", Node::string("myVpc"));
        assert_eq!(node.get("Ref").and_then(Node::as_str), Some("myVpc"));
    }
}
