//! Resource and property type definitions.

use crate::PropertyDescriptor;

/// Shared view of anything with an ordered list of property descriptors.
///
/// The serializer walks resources and nested property types through this
/// trait, so both are handled by the same recursion.
pub trait Definition {
    /// Fully qualified name, e.g. `AWS::EC2::VPC` or `AWS::EC2::VPC.Tag`.
    fn name(&self) -> &str;

    /// Descriptors in declaration order.
    fn properties(&self) -> &[PropertyDescriptor];

    /// Look up a descriptor by property name.
    fn descriptor(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties().iter().find(|p| p.name() == name)
    }

    /// Names of all required properties, in declaration order.
    fn required_properties(&self) -> Vec<&str> {
        self.properties()
            .iter()
            .filter(|p| p.is_required())
            .map(|p| p.name())
            .collect()
    }
}

/// A top-level resource type.
///
/// # Example
///
/// ```
/// use humidifier_schema::{Definition, PrimitiveType, PropertyDescriptor, ResourceDefinition};
///
/// let def = ResourceDefinition::new("AWS::EC2::VPCCidrBlock")
///     .property(PropertyDescriptor::primitive("VpcId", PrimitiveType::String).required())
///     .attribute("Id");
/// assert_eq!(def.required_properties(), vec!["VpcId"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceDefinition {
    type_name: String,
    properties: Vec<PropertyDescriptor>,
    attributes: Vec<String>,
    documentation: Option<String>,
}

impl ResourceDefinition {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            properties: Vec::new(),
            attributes: Vec::new(),
            documentation: None,
        }
    }

    /// Append a property descriptor.
    pub fn property(mut self, descriptor: PropertyDescriptor) -> Self {
        self.properties.push(descriptor);
        self
    }

    /// Declare an attribute readable with `Fn::GetAtt`.
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.attributes.push(name.into());
        self
    }

    pub fn documentation(mut self, url: impl Into<String>) -> Self {
        self.documentation = Some(url.into());
        self
    }

    /// The document's `Type` discriminator.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a == name)
    }

    pub fn documentation_url(&self) -> Option<&str> {
        self.documentation.as_deref()
    }

    /// Qualified name of a property type owned by this resource.
    pub fn property_type_name(&self, short_name: &str) -> String {
        format!("{}.{}", self.type_name, short_name)
    }
}

impl Definition for ResourceDefinition {
    fn name(&self) -> &str {
        &self.type_name
    }

    fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }
}

/// A nested property type, owned by exactly one resource type.
///
/// The qualified name is `<owner>.<short name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyTypeDefinition {
    name: String,
    properties: Vec<PropertyDescriptor>,
    documentation: Option<String>,
}

impl PropertyTypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            properties: Vec::new(),
            documentation: None,
        }
    }

    /// Append a property descriptor.
    pub fn property(mut self, descriptor: PropertyDescriptor) -> Self {
        self.properties.push(descriptor);
        self
    }

    pub fn documentation(mut self, url: impl Into<String>) -> Self {
        self.documentation = Some(url.into());
        self
    }

    /// The owning resource type, or `None` if the name is not qualified.
    pub fn owner(&self) -> Option<&str> {
        self.name.split_once('.').map(|(owner, _)| owner)
    }

    /// The name without the owner prefix.
    pub fn short_name(&self) -> &str {
        self.name
            .split_once('.')
            .map_or(self.name.as_str(), |(_, short)| short)
    }

    pub fn documentation_url(&self) -> Option<&str> {
        self.documentation.as_deref()
    }
}

impl Definition for PropertyTypeDefinition {
    fn name(&self) -> &str {
        &self.name
    }

    fn properties(&self) -> &[PropertyDescriptor] {
        &self.properties
    }
}
