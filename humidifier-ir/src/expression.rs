//! Deferred values: references and intrinsic functions.

use std::{fmt, str::FromStr};

use crate::{Literal, Number, Properties, TypeMismatch, Value};

/// Names of the intrinsic functions understood by the codec.
pub mod intrinsic {
    pub const REF: &str = "Ref";
    pub const GET_ATT: &str = "Fn::GetAtt";
    pub const JOIN: &str = "Fn::Join";
    pub const SELECT: &str = "Fn::Select";
    pub const BASE64: &str = "Fn::Base64";
    pub const CIDR: &str = "Fn::Cidr";
    pub const FIND_IN_MAP: &str = "Fn::FindInMap";
    pub const GET_AZS: &str = "Fn::GetAZs";
    pub const IMPORT_VALUE: &str = "Fn::ImportValue";
    pub const SPLIT: &str = "Fn::Split";
    pub const SUB: &str = "Fn::Sub";
    pub const LENGTH: &str = "Fn::Length";
    pub const TO_JSON_STRING: &str = "Fn::ToJsonString";
    pub const TRANSFORM: &str = "Fn::Transform";
    pub const IF: &str = "Fn::If";
    pub const EQUALS: &str = "Fn::Equals";
    pub const AND: &str = "Fn::And";
    pub const OR: &str = "Fn::Or";
    pub const NOT: &str = "Fn::Not";
    pub const CONDITION: &str = "Condition";

    /// Prefix shared by every `Fn::` function.
    pub const FN_PREFIX: &str = "Fn::";

    /// Functions whose single operand is written without an enclosing array.
    pub(crate) const SCALAR_OPERAND: &[&str] = &[
        REF,
        CONDITION,
        BASE64,
        GET_AZS,
        IMPORT_VALUE,
        SUB,
        LENGTH,
        TO_JSON_STRING,
        TRANSFORM,
    ];

    /// Returns true if `key` names an intrinsic function.
    pub fn is_function_key(key: &str) -> bool {
        key == REF || key == CONDITION || key.starts_with(FN_PREFIX)
    }
}

/// A value resolved by the provisioning engine at apply time.
///
/// The four well-known functions have first-class variants; every other
/// intrinsic is a [`FunctionCall`]. Referenced logical IDs are not checked
/// here: forward references across resources are legal.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// `Ref` to a resource, parameter or pseudo parameter.
    Reference(String),
    /// `Fn::GetAtt` of a resource attribute.
    AttributeReference {
        logical_id: String,
        attribute: String,
    },
    /// `Fn::Join` of operands with a delimiter.
    Join {
        delimiter: String,
        operands: Vec<Value>,
    },
    /// `Fn::Select` of the operand at `index`.
    Select { index: u32, operands: Vec<Value> },
    /// Any other intrinsic function.
    Call(FunctionCall),
}

/// An intrinsic function without a first-class variant.
///
/// Only constructible through [`Expression::call`], which guarantees the
/// function name is an intrinsic key and the call does not shadow one of
/// the first-class variants.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    function: String,
    args: Vec<Value>,
}

impl FunctionCall {
    /// Function name, e.g. `Fn::Sub`.
    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn args(&self) -> &[Value] {
        &self.args
    }
}

impl Expression {
    /// Build an expression for any intrinsic function.
    ///
    /// The name must be `Ref`, `Condition` or start with `Fn::`; any other
    /// key would decode back as a plain object, so it fails with
    /// [`TypeMismatch`].
    ///
    /// Calls that match the shape of a first-class variant are normalized:
    /// `Ref` with one string, `Fn::GetAtt` with two strings (or one dotted
    /// string), `Fn::Join` with a string and a list, and `Fn::Select` with
    /// an index and a list.
    pub fn call(function: impl Into<String>, args: Vec<Value>) -> Result<Self, TypeMismatch> {
        let function = function.into();
        if !intrinsic::is_function_key(&function) {
            return Err(TypeMismatch::new("an intrinsic function name", function));
        }
        Ok(Self::normalized(function, args))
    }

    /// [`Expression::call`] for a name already known to be an intrinsic key.
    pub(crate) fn normalized(function: String, args: Vec<Value>) -> Self {
        debug_assert!(intrinsic::is_function_key(&function));
        match (function.as_str(), args.as_slice()) {
            (intrinsic::REF, [Value::Literal(Literal::String(id))]) => {
                return Expression::Reference(id.clone());
            }
            (
                intrinsic::GET_ATT,
                [
                    Value::Literal(Literal::String(id)),
                    Value::Literal(Literal::String(attr)),
                ],
            ) => {
                return Expression::AttributeReference {
                    logical_id: id.clone(),
                    attribute: attr.clone(),
                };
            }
            (intrinsic::GET_ATT, [Value::Literal(Literal::String(dotted))]) => {
                if let Some((id, attr)) = dotted.split_once('.') {
                    return Expression::AttributeReference {
                        logical_id: id.to_string(),
                        attribute: attr.to_string(),
                    };
                }
            }
            (intrinsic::JOIN, [Value::Literal(Literal::String(delim)), Value::List(ops)]) => {
                return Expression::Join {
                    delimiter: delim.clone(),
                    operands: ops.clone(),
                };
            }
            (intrinsic::SELECT, [Value::Literal(index), Value::List(ops)]) => {
                if let Some(index) = parse_index(index) {
                    return Expression::Select {
                        index,
                        operands: ops.clone(),
                    };
                }
            }
            _ => {}
        }
        Expression::Call(FunctionCall { function, args })
    }

    /// Name of the intrinsic function this expression encodes to.
    pub fn function_name(&self) -> &str {
        match self {
            Expression::Reference(_) => intrinsic::REF,
            Expression::AttributeReference { .. } => intrinsic::GET_ATT,
            Expression::Join { .. } => intrinsic::JOIN,
            Expression::Select { .. } => intrinsic::SELECT,
            Expression::Call(call) => call.function(),
        }
    }

    /// The pseudo parameter this expression refers to, if any.
    pub fn as_pseudo(&self) -> Option<Pseudo> {
        match self {
            Expression::Reference(id) => id.parse().ok(),
            _ => None,
        }
    }

    fn intrinsic(function: &'static str, args: Vec<Value>) -> Self {
        Self::normalized(function.to_string(), args)
    }

    /// `Fn::Base64` of a value.
    pub fn base64(value: impl Into<Value>) -> Self {
        Self::intrinsic(intrinsic::BASE64, vec![value.into()])
    }

    /// `Fn::Cidr` splitting an address block.
    pub fn cidr(block: impl Into<Value>, count: impl Into<Value>, bits: impl Into<Value>) -> Self {
        Self::intrinsic(intrinsic::CIDR, vec![block.into(), count.into(), bits.into()])
    }

    /// `Fn::FindInMap` lookup.
    pub fn find_in_map(
        map: impl Into<Value>,
        top_level_key: impl Into<Value>,
        second_level_key: impl Into<Value>,
    ) -> Self {
        Self::intrinsic(
            intrinsic::FIND_IN_MAP,
            vec![map.into(), top_level_key.into(), second_level_key.into()],
        )
    }

    /// `Fn::GetAZs` for a region; an empty string means the stack's region.
    pub fn get_azs(region: impl Into<Value>) -> Self {
        Self::intrinsic(intrinsic::GET_AZS, vec![region.into()])
    }

    /// `Fn::ImportValue` of another stack's export.
    pub fn import_value(name: impl Into<Value>) -> Self {
        Self::intrinsic(intrinsic::IMPORT_VALUE, vec![name.into()])
    }

    /// `Fn::Split` of a string on a delimiter.
    pub fn split(delimiter: impl Into<String>, source: impl Into<Value>) -> Self {
        Self::intrinsic(
            intrinsic::SPLIT,
            vec![Value::string(delimiter), source.into()],
        )
    }

    /// `Fn::Sub` of a template string.
    pub fn sub(template: impl Into<String>) -> Self {
        Self::intrinsic(intrinsic::SUB, vec![Value::string(template)])
    }

    /// `Fn::Sub` of a template string with explicit variables.
    pub fn sub_with(template: impl Into<String>, variables: Properties) -> Self {
        Self::intrinsic(
            intrinsic::SUB,
            vec![Value::string(template), Value::Object(variables)],
        )
    }

    /// `Fn::If` choosing between two values on a named condition.
    pub fn if_(
        condition: impl Into<String>,
        when_true: impl Into<Value>,
        when_false: impl Into<Value>,
    ) -> Self {
        Self::intrinsic(
            intrinsic::IF,
            vec![Value::string(condition), when_true.into(), when_false.into()],
        )
    }

    /// `Fn::Equals` condition.
    pub fn equals(left: impl Into<Value>, right: impl Into<Value>) -> Self {
        Self::intrinsic(intrinsic::EQUALS, vec![left.into(), right.into()])
    }

    /// `Fn::And` condition.
    pub fn and(conditions: Vec<Value>) -> Self {
        Self::intrinsic(intrinsic::AND, conditions)
    }

    /// `Fn::Or` condition.
    pub fn or(conditions: Vec<Value>) -> Self {
        Self::intrinsic(intrinsic::OR, conditions)
    }

    /// `Fn::Not` condition.
    pub fn not(condition: impl Into<Value>) -> Self {
        Self::intrinsic(intrinsic::NOT, vec![condition.into()])
    }

    /// Reference to a named condition inside another condition.
    pub fn condition(name: impl Into<String>) -> Self {
        Self::intrinsic(intrinsic::CONDITION, vec![Value::string(name)])
    }
}

fn parse_index(index: &Literal) -> Option<u32> {
    match index {
        Literal::String(s) => s.parse().ok(),
        Literal::Number(Number::Integer(i)) => u32::try_from(*i).ok(),
        _ => None,
    }
}

/// CloudFormation pseudo parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pseudo {
    AccountId,
    NotificationArns,
    NoValue,
    Partition,
    Region,
    StackId,
    StackName,
    UrlSuffix,
}

impl Pseudo {
    pub const ALL: [Pseudo; 8] = [
        Pseudo::AccountId,
        Pseudo::NotificationArns,
        Pseudo::NoValue,
        Pseudo::Partition,
        Pseudo::Region,
        Pseudo::StackId,
        Pseudo::StackName,
        Pseudo::UrlSuffix,
    ];

    /// The logical ID used to reference this parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Pseudo::AccountId => "AWS::AccountId",
            Pseudo::NotificationArns => "AWS::NotificationARNs",
            Pseudo::NoValue => "AWS::NoValue",
            Pseudo::Partition => "AWS::Partition",
            Pseudo::Region => "AWS::Region",
            Pseudo::StackId => "AWS::StackId",
            Pseudo::StackName => "AWS::StackName",
            Pseudo::UrlSuffix => "AWS::URLSuffix",
        }
    }
}

impl fmt::Display for Pseudo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pseudo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pseudo::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown pseudo parameter '{}'", s))
    }
}
