//! Expression encoding table.
//!
//! | Expression                      | Node                                  |
//! |---------------------------------|---------------------------------------|
//! | `Reference(id)`                 | `{"Ref": "id"}`                       |
//! | `AttributeReference(id, attr)`  | `{"Fn::GetAtt": ["id", "attr"]}`      |
//! | `Join(d, ops)`                  | `{"Fn::Join": ["d", [ops...]]}`       |
//! | `Select(i, ops)`                | `{"Fn::Select": ["i", [ops...]]}`     |
//! | `Call(f, [x])`, scalar operand  | `{"f": x}`                            |
//! | `Call(f, args)`                 | `{"f": [args...]}`                    |
//!
//! A call is written with a bare operand only when the function takes a
//! single operand (`Ref`, `Condition`, `Fn::Base64`, `Fn::GetAZs`,
//! `Fn::ImportValue`, `Fn::Sub`, `Fn::Length`, `Fn::ToJsonString`,
//! `Fn::Transform`), exactly one argument is given and that argument is not
//! a list. Decoding reverses the table; an array operand always decodes to
//! the argument list, and any single-key object whose key is `Ref`,
//! `Condition` or `Fn::*` decodes to an expression.
//!
//! With [`Expression::call`] normalization, `decode(encode(e)) == e` holds
//! unless an argument is itself an object literal with a single function
//! key. Such an object is indistinguishable from an expression on the wire
//! and decodes as one, so `Fn::Base64` of the object `{"Ref": "x"}` comes
//! back as `Fn::Base64` of the reference `x`.
//!
//! This table is the wire contract with existing templates. Changing it
//! breaks round-tripping.

use indexmap::IndexMap;

use crate::{
    Expression, FunctionCall, Literal, Node, Scalar, TypeMismatch, Value, expression::intrinsic,
};

impl Value {
    /// Encode a value without schema information.
    ///
    /// Used for expression operands, conditions and free-form `Json`
    /// properties. `Null` entries of objects are omitted; `Null` anywhere
    /// else has no encoding.
    pub fn to_node(&self) -> Result<Node, TypeMismatch> {
        match self {
            Value::Null => Err(TypeMismatch::new("a value", "Null")),
            Value::Literal(literal) => Ok(Node::Scalar(literal.to_scalar())),
            Value::List(items) => items
                .iter()
                .map(Value::to_node)
                .collect::<Result<Vec<_>, _>>()
                .map(Node::Array),
            Value::Object(map) => {
                let mut out = IndexMap::with_capacity(map.len());
                for (key, value) in map {
                    if value.is_null() {
                        continue;
                    }
                    out.insert(key.clone(), value.to_node()?);
                }
                Ok(Node::Object(out))
            }
            Value::Expression(expr) => expr.to_node(),
        }
    }

    /// Decode a document node.
    ///
    /// A single-key object whose key names an intrinsic function decodes to
    /// an expression; every other node decodes structurally. Decoding never
    /// fails.
    pub fn from_node(node: &Node) -> Value {
        match node {
            Node::Scalar(scalar) => Value::Literal(Literal::from_scalar(scalar)),
            Node::Array(items) => Value::List(items.iter().map(Value::from_node).collect()),
            Node::Object(map) => match Expression::from_node(node) {
                Some(expr) => Value::Expression(expr),
                None => Value::Object(
                    map.iter()
                        .map(|(k, v)| (k.clone(), Value::from_node(v)))
                        .collect(),
                ),
            },
        }
    }
}

impl Expression {
    /// Encode this expression as a single-key object.
    pub fn to_node(&self) -> Result<Node, TypeMismatch> {
        let operand = match self {
            Expression::Reference(id) => Node::string(id),
            Expression::AttributeReference {
                logical_id,
                attribute,
            } => Node::Array(vec![Node::string(logical_id), Node::string(attribute)]),
            Expression::Join {
                delimiter,
                operands,
            } => Node::Array(vec![Node::string(delimiter), encode_list(operands)?]),
            Expression::Select { index, operands } => {
                Node::Array(vec![Node::string(index.to_string()), encode_list(operands)?])
            }
            Expression::Call(call) => encode_call_operand(call)?,
        };
        Ok(Node::single(self.function_name(), operand))
    }

    /// Decode a single-key function object. Returns `None` for any other node.
    pub fn from_node(node: &Node) -> Option<Expression> {
        let map = node.as_object()?;
        if map.len() != 1 {
            return None;
        }
        let (key, operand) = map.first()?;
        if !intrinsic::is_function_key(key) {
            return None;
        }
        let args = match operand {
            Node::Array(items) => items.iter().map(Value::from_node).collect(),
            other => vec![Value::from_node(other)],
        };
        Some(Expression::normalized(key.clone(), args))
    }
}

fn encode_list(values: &[Value]) -> Result<Node, TypeMismatch> {
    values
        .iter()
        .map(Value::to_node)
        .collect::<Result<Vec<_>, _>>()
        .map(Node::Array)
}

fn encode_call_operand(call: &FunctionCall) -> Result<Node, TypeMismatch> {
    match call.args() {
        [single]
            if !matches!(single, Value::List(_))
                && intrinsic::SCALAR_OPERAND.contains(&call.function()) =>
        {
            single.to_node()
        }
        args => encode_list(args),
    }
}

impl Literal {
    pub fn to_scalar(&self) -> Scalar {
        match self {
            Literal::String(s) => Scalar::String(s.clone()),
            Literal::Bool(b) => Scalar::Bool(*b),
            Literal::Number(n) => Scalar::Number(*n),
        }
    }

    pub fn from_scalar(scalar: &Scalar) -> Literal {
        match scalar {
            Scalar::String(s) => Literal::String(s.clone()),
            Scalar::Bool(b) => Literal::Bool(*b),
            Scalar::Number(n) => Literal::Number(*n),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pseudo;

    fn json(value: &Value) -> String {
        serde_json::to_string(&value.to_node().unwrap()).unwrap()
    }

    fn round_trip(value: Value) {
        let node = value.to_node().unwrap();
        assert_eq!(Value::from_node(&node), value, "round trip of {:?}", node);
    }

    #[test]
    fn test_encode_reference() {
        assert_eq!(json(&Value::reference("myVpc")), r#"{"Ref":"myVpc"}"#);
        assert_eq!(
            json(&Value::pseudo(Pseudo::StackName)),
            r#"{"Ref":"AWS::StackName"}"#
        );
    }

    #[test]
    fn test_encode_get_att() {
        assert_eq!(
            json(&Value::get_att("myVpc", "DefaultSecurityGroup")),
            r#"{"Fn::GetAtt":["myVpc","DefaultSecurityGroup"]}"#
        );
    }

    #[test]
    fn test_encode_join_and_select() {
        let join = Value::join("-", vec![Value::pseudo(Pseudo::StackName), Value::from("db")]);
        assert_eq!(
            json(&join),
            r#"{"Fn::Join":["-",[{"Ref":"AWS::StackName"},"db"]]}"#
        );

        let select = Value::select(1, ["a", "b", "c"]);
        assert_eq!(json(&select), r#"{"Fn::Select":["1",["a","b","c"]]}"#);
    }

    #[test]
    fn test_encode_scalar_operand_calls() {
        assert_eq!(
            json(&Expression::base64("#!/bin/bash").into()),
            r##"{"Fn::Base64":"#!/bin/bash"}"##
        );
        assert_eq!(json(&Expression::get_azs("").into()), r#"{"Fn::GetAZs":""}"#);
        assert_eq!(
            json(&Expression::sub("arn:${AWS::Partition}:s3:::bucket").into()),
            r#"{"Fn::Sub":"arn:${AWS::Partition}:s3:::bucket"}"#
        );
    }

    #[test]
    fn test_encode_list_operand_calls() {
        let not = Expression::not(Expression::condition("IsProd"));
        assert_eq!(
            json(&not.into()),
            r#"{"Fn::Not":[{"Condition":"IsProd"}]}"#
        );

        let mut vars = IndexMap::new();
        vars.insert("Name".to_string(), Value::reference("bucket"));
        let sub = Expression::sub_with("${Name}-logs", vars);
        assert_eq!(
            json(&sub.into()),
            r#"{"Fn::Sub":["${Name}-logs",{"Name":{"Ref":"bucket"}}]}"#
        );
    }

    #[test]
    fn test_null_operand_has_no_encoding() {
        let join = Value::join(",", vec![Value::from("a"), Value::Null]);
        let err = join.to_node().unwrap_err();
        assert_eq!(err.got, "Null");
    }

    #[test]
    fn test_null_object_entries_omitted() {
        let value = Value::object([("Key", Value::from("env")), ("Value", Value::Null)]);
        assert_eq!(json(&value), r#"{"Key":"env"}"#);
    }

    #[test]
    fn test_round_trip_first_class_expressions() {
        round_trip(Value::reference("myVpc"));
        round_trip(Value::get_att("myVpc", "DefaultSecurityGroup"));
        round_trip(Value::join(",", vec![Value::from("a"), Value::reference("b")]));
        round_trip(Value::select(2, vec![Value::from("a"), Value::integer(7)]));
        round_trip(Value::join("", Vec::<Value>::new()));
    }

    #[test]
    fn test_round_trip_calls() {
        round_trip(Expression::base64("hello").into());
        round_trip(Expression::base64(Value::list(["wrapped"])).into());
        round_trip(Expression::not(Expression::condition("IsProd")).into());
        round_trip(Expression::split(",", Value::reference("Subnets")).into());
        round_trip(Expression::cidr(Value::get_att("vpc", "CidrBlock"), 6, 8).into());
        round_trip(Expression::if_("IsProd", "m5.large", Value::pseudo(Pseudo::NoValue)).into());
        round_trip(
            Value::call("Fn::Select", vec![Value::from("0"), Expression::get_azs("").into()])
                .unwrap(),
        );
        round_trip(Value::call("Fn::Custom", Vec::<Value>::new()).unwrap());
        round_trip(Value::call("Fn::Custom", vec![Value::from("only")]).unwrap());
    }

    #[test]
    fn test_call_without_function_key_rejected() {
        // {"Custom": "x"} would decode as a plain object.
        let err = Value::call("Custom", vec![Value::from("x")]).unwrap_err();
        assert_eq!(err.got, "Custom");

        let node: Node = serde_json::from_str(r#"{"Custom": "x"}"#).unwrap();
        assert!(Expression::from_node(&node).is_none());
    }

    #[test]
    fn test_function_shaped_object_operand_decodes_as_expression() {
        let literal = Value::object([("Ref", "x")]);
        let value = Value::from(Expression::base64(literal));
        let decoded = Value::from_node(&value.to_node().unwrap());
        assert_eq!(decoded, Value::from(Expression::base64(Value::reference("x"))));
        assert_ne!(decoded, value);
    }

    #[test]
    fn test_decode_plain_object() {
        let node: Node =
            serde_json::from_str(r#"{"VpcId": {"Ref": "myVpc"}, "SubnetIds": ["s-1"]}"#).unwrap();
        let value = Value::from_node(&node);
        let map = value.as_object().unwrap();
        assert_eq!(map["VpcId"], Value::reference("myVpc"));
        assert_eq!(map["SubnetIds"], Value::list(["s-1"]));
    }

    #[test]
    fn test_decode_dotted_get_att() {
        let node: Node = serde_json::from_str(r#"{"Fn::GetAtt": "myVpc.CidrBlock"}"#).unwrap();
        assert_eq!(Value::from_node(&node), Value::get_att("myVpc", "CidrBlock"));
    }

    #[test]
    fn test_decode_multi_key_object_is_not_expression() {
        let node: Node = serde_json::from_str(r#"{"Ref": "a", "Other": "b"}"#).unwrap();
        assert!(Expression::from_node(&node).is_none());
        assert!(Value::from_node(&node).as_object().is_some());
    }
}
