// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Stack manifests (`stack.toml`) for Humidifier.
//!
//! A stack manifest describes a template in TOML. Property values use the
//! same grammar as the rendered document, so `{ Ref = "myVpc" }` or
//! `{ "Fn::GetAtt" = ["myVpc", "DefaultSecurityGroup"] }` become expressions.
//!
//! ```toml
//! description = "Corporate directory"
//!
//! [resources.myVpc]
//! type = "AWS::EC2::VPC"
//!
//! [resources.myVpc.properties]
//! CidrBlock = "10.0.0.0/16"
//!
//! [outputs.VpcId]
//! value = { Ref = "myVpc" }
//! ```

mod convert;
mod error;
mod file;
mod stack;

pub use convert::{to_node, to_value};
pub use error::{Error, Result, SourceContext};
pub use file::StackToml;
pub use stack::{OutputSpec, ParameterSpec, ResourceSpec, Stack};
