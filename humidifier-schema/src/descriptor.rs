//! Per-property metadata.

use std::{fmt, str::FromStr};

use crate::PrimitiveType;

/// The shape of a property's value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// A single primitive.
    Primitive(PrimitiveType),
    /// A nested property type, by qualified name (`Resource.Name`).
    Complex(String),
    /// An ordered list of items of the inner kind.
    ListOf(Box<PropertyKind>),
    /// A string-keyed map of items of the inner kind.
    MapOf(Box<PropertyKind>),
}

impl PropertyKind {
    pub fn list(item: PropertyKind) -> Self {
        PropertyKind::ListOf(Box::new(item))
    }

    pub fn map(item: PropertyKind) -> Self {
        PropertyKind::MapOf(Box::new(item))
    }

    pub fn complex(type_name: impl Into<String>) -> Self {
        PropertyKind::Complex(type_name.into())
    }

    /// The property type this kind refers to, looking through lists and maps.
    pub fn complex_ref(&self) -> Option<&str> {
        match self {
            PropertyKind::Primitive(_) => None,
            PropertyKind::Complex(name) => Some(name),
            PropertyKind::ListOf(inner) | PropertyKind::MapOf(inner) => inner.complex_ref(),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyKind::Primitive(p) => write!(f, "{}", p),
            PropertyKind::Complex(name) => f.write_str(name),
            PropertyKind::ListOf(inner) => write!(f, "List<{}>", inner),
            PropertyKind::MapOf(inner) => write!(f, "Map<{}>", inner),
        }
    }
}

/// How the provisioning engine handles a change to a property.
///
/// Informational: change planning is done by consumers, not at
/// serialization time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mutability {
    /// Updated in place.
    #[default]
    Mutable,
    /// Changing the value replaces the resource.
    Immutable,
    /// Replacement depends on the value or on other properties.
    Conditional,
}

impl Mutability {
    /// Get the catalog `UpdateType` name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mutability::Mutable => "Mutable",
            Mutability::Immutable => "Immutable",
            Mutability::Conditional => "Conditional",
        }
    }
}

impl fmt::Display for Mutability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mutability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Mutable" => Ok(Mutability::Mutable),
            "Immutable" => Ok(Mutability::Immutable),
            "Conditional" => Ok(Mutability::Conditional),
            other => Err(format!(
                "unknown update type '{}', expected Mutable, Immutable or Conditional",
                other
            )),
        }
    }
}

/// Static metadata for one property of a resource or property type.
///
/// Built once with the consuming setters below, then frozen inside a
/// definition.
///
/// # Example
///
/// ```
/// use humidifier_schema::{Mutability, PrimitiveType, PropertyDescriptor, PropertyKind};
///
/// let name = PropertyDescriptor::new("Name", PropertyKind::Primitive(PrimitiveType::String))
///     .required()
///     .mutability(Mutability::Immutable);
/// assert!(name.is_required());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    name: String,
    kind: PropertyKind,
    required: bool,
    mutability: Mutability,
    duplicates_allowed: bool,
    documentation: Option<String>,
}

impl PropertyDescriptor {
    /// An optional, mutable property.
    pub fn new(name: impl Into<String>, kind: PropertyKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            mutability: Mutability::Mutable,
            duplicates_allowed: true,
            documentation: None,
        }
    }

    /// Shorthand for a primitive property.
    pub fn primitive(name: impl Into<String>, ty: PrimitiveType) -> Self {
        Self::new(name, PropertyKind::Primitive(ty))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn set_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn mutability(mut self, mutability: Mutability) -> Self {
        self.mutability = mutability;
        self
    }

    pub fn immutable(self) -> Self {
        self.mutability(Mutability::Immutable)
    }

    pub fn duplicates_allowed(mut self, allowed: bool) -> Self {
        self.duplicates_allowed = allowed;
        self
    }

    pub fn documentation(mut self, url: impl Into<String>) -> Self {
        self.documentation = Some(url.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn update_type(&self) -> Mutability {
        self.mutability
    }

    /// Whether list items may repeat. Only meaningful for list kinds.
    pub fn allows_duplicates(&self) -> bool {
        self.duplicates_allowed
    }

    pub fn documentation_url(&self) -> Option<&str> {
        self.documentation.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display() {
        let subnets = PropertyKind::list(PropertyKind::Primitive(PrimitiveType::String));
        let tags = PropertyKind::list(PropertyKind::complex("AWS::EC2::VPC.Tag"));
        let labels = PropertyKind::map(PropertyKind::Primitive(PrimitiveType::String));
        assert_eq!(subnets.to_string(), "List<String>");
        assert_eq!(tags.to_string(), "List<AWS::EC2::VPC.Tag>");
        assert_eq!(labels.to_string(), "Map<String>");
    }

    #[test]
    fn test_complex_ref_looks_through_containers() {
        let tags = PropertyKind::list(PropertyKind::complex("AWS::EC2::VPC.Tag"));
        assert_eq!(tags.complex_ref(), Some("AWS::EC2::VPC.Tag"));
        assert_eq!(
            PropertyKind::Primitive(PrimitiveType::String).complex_ref(),
            None
        );
    }

    #[test]
    fn test_descriptor_defaults() {
        let desc = PropertyDescriptor::primitive("ShortName", PrimitiveType::String);
        assert!(!desc.is_required());
        assert_eq!(desc.update_type(), Mutability::Mutable);
        assert!(desc.allows_duplicates());
        assert_eq!(desc.documentation_url(), None);
    }

    #[test]
    fn test_mutability_parse() {
        assert_eq!("Immutable".parse(), Ok(Mutability::Immutable));
        assert_eq!("Conditional".parse(), Ok(Mutability::Conditional));
        assert!("Sometimes".parse::<Mutability>().is_err());
    }
}
