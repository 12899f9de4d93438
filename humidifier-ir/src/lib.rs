//! Value model and document tree for Humidifier templates.
//!
//! This crate provides the two data shapes every other Humidifier crate is
//! built around:
//!
//! - [`Value`] - what a caller assigns to a property: a literal, a list, a
//!   nested object or a deferred [`Expression`]
//! - [`Node`] - the generic document tree (objects, arrays, scalars) handed
//!   to a writer for text encoding
//!
//! # Architecture
//!
//! ```text
//! Value ──(serializer, with descriptors)──► Node ──(writer)──► JSON text
//!   ▲                                          │
//!   └──────────(Value::from_node, decoding)────┘
//! ```
//!
//! The expression encoding lives in [`codec`] and is the wire contract of
//! the whole system: `Ref`, `Fn::GetAtt`, `Fn::Join`, `Fn::Select` and the
//! open-ended `Fn::*` call form.

pub mod codec;
mod expression;
mod node;
mod value;

pub use expression::{Expression, FunctionCall, Pseudo, intrinsic};
pub use node::{Node, Scalar};
pub use value::{Literal, Number, Properties, TypeMismatch, Value};
