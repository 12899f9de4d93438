// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Property descriptors and resource definitions for Humidifier.
//!
//! Definitions describe *shape*: which properties a resource or nested
//! property type has, their kinds, whether they are required and how the
//! provisioning engine treats updates. They are registered once in a
//! [`Registry`] and shared read-only afterwards.
//!
//! # Sources
//!
//! - [`Registry::builtin`] - the definitions bundled with this crate
//! - [`Registry::from_file`] / [`str::parse`] - a catalog in the
//!   CloudFormation resource specification JSON format
//! - [`Registry::builder`] - definitions assembled in code

mod builtin;
mod catalog;
mod definition;
mod descriptor;
mod error;
mod primitive;
mod registry;

pub use definition::{Definition, PropertyTypeDefinition, ResourceDefinition};
pub use descriptor::{Mutability, PropertyDescriptor, PropertyKind};
pub use error::{Error, Result, SourceContext};
pub use primitive::PrimitiveType;
pub use registry::{Registry, RegistryBuilder};
