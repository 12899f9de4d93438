// Miette's derive macro generates code that triggers these warnings
#![allow(unused_assignments)]

//! Resource instances, templates and the document serializer.
//!
//! A caller creates [`ResourceInstance`]s from registered definitions,
//! assigns property values, groups them in a [`Template`] and hands the
//! result to a [`Serializer`]:
//!
//! ```
//! use humidifier_ir::Value;
//! use humidifier_schema::Registry;
//! use humidifier_template::{ResourceInstance, Serializer, Template, to_json_string};
//!
//! let registry = Registry::builtin();
//! let mut template = Template::new().description("Network");
//! template
//!     .add_resource(
//!         "myVpc",
//!         ResourceInstance::from_registry(registry, "AWS::EC2::VPC")?
//!             .with("CidrBlock", "10.0.0.0/16")?,
//!     )?;
//! let cidr = template.get_att("myVpc", "CidrBlock")?;
//! template.add_resource(
//!     "extraCidr",
//!     ResourceInstance::from_registry(registry, "AWS::EC2::VPCCidrBlock")?
//!         .with("VpcId", Value::reference("myVpc"))?
//!         .with("AmazonProvidedIpv6CidrBlock", true)?,
//! )?;
//! # let _ = cidr;
//!
//! let document = Serializer::new(registry).serialize_template(&template)?;
//! assert!(to_json_string(&document).starts_with(r#"{"AWSTemplateFormatVersion":"2010-09-09""#));
//! # Ok::<(), Box<humidifier_template::Error>>(())
//! ```

mod error;
mod instance;
mod serializer;
mod template;
mod writer;

pub use error::{Error, Result};
pub use instance::{DeletionPolicy, ResourceInstance};
pub use serializer::Serializer;
pub use template::{FORMAT_VERSION, Output, Parameter, Template};
pub use writer::{to_json_string, to_json_string_pretty};
