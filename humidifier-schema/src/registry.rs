//! Read-only registry of definitions.

use std::{collections::HashMap, sync::Arc};

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use tracing::debug;

use crate::{Definition, Error, PropertyTypeDefinition, ResourceDefinition, Result, builtin};

static BUILTIN: Lazy<Registry> = Lazy::new(|| {
    builtin::builder()
        .build()
        .expect("built-in definitions are valid")
});

/// All known resource and property type definitions.
///
/// A registry is assembled once through [`RegistryBuilder`] (or loaded from
/// a catalog) and never changes afterwards, so it can be shared freely
/// between threads and serialization calls.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    version: Option<String>,
    resources: IndexMap<String, Arc<ResourceDefinition>>,
    property_types: IndexMap<String, Arc<PropertyTypeDefinition>>,
}

impl Registry {
    /// Start assembling a registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// The definitions bundled with this crate, initialized on first use.
    pub fn builtin() -> &'static Registry {
        &BUILTIN
    }

    /// Catalog version, when loaded from a versioned catalog.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Look up a resource type, failing with [`Error::UnknownType`].
    pub fn resource(&self, type_name: &str) -> Result<Arc<ResourceDefinition>> {
        self.get_resource(type_name)
            .cloned()
            .ok_or_else(|| Error::unknown_type(type_name))
    }

    /// Look up a property type, failing with [`Error::UnknownType`].
    pub fn property_type(&self, name: &str) -> Result<&PropertyTypeDefinition> {
        self.get_property_type(name)
            .ok_or_else(|| Error::unknown_type(name))
    }

    pub fn get_resource(&self, type_name: &str) -> Option<&Arc<ResourceDefinition>> {
        self.resources.get(type_name)
    }

    pub fn get_property_type(&self, name: &str) -> Option<&PropertyTypeDefinition> {
        self.property_types.get(name).map(Arc::as_ref)
    }

    /// Returns true if a resource or property type with this name exists.
    pub fn contains(&self, name: &str) -> bool {
        self.resources.contains_key(name) || self.property_types.contains_key(name)
    }

    /// Resource types in registration order.
    pub fn resources(&self) -> impl Iterator<Item = &ResourceDefinition> {
        self.resources.values().map(Arc::as_ref)
    }

    /// Property types in registration order.
    pub fn property_types(&self) -> impl Iterator<Item = &PropertyTypeDefinition> {
        self.property_types.values().map(Arc::as_ref)
    }

    /// Property types owned by a resource type.
    pub fn property_types_of<'a>(
        &'a self,
        type_name: &'a str,
    ) -> impl Iterator<Item = &'a PropertyTypeDefinition> + 'a {
        self.property_types()
            .filter(move |pt| pt.owner() == Some(type_name))
    }

    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }

    pub fn property_type_count(&self) -> usize {
        self.property_types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

/// Collects definitions and validates them into a [`Registry`].
///
/// # Example
///
/// ```
/// use humidifier_schema::{
///     PrimitiveType, PropertyDescriptor, PropertyKind, PropertyTypeDefinition, Registry,
///     ResourceDefinition,
/// };
///
/// let registry = Registry::builder()
///     .resource(
///         ResourceDefinition::new("AWS::EC2::VPC").property(PropertyDescriptor::new(
///             "Tags",
///             PropertyKind::list(PropertyKind::complex("AWS::EC2::VPC.Tag")),
///         )),
///     )
///     .property_type(
///         PropertyTypeDefinition::new("AWS::EC2::VPC.Tag")
///             .property(PropertyDescriptor::primitive("Key", PrimitiveType::String).required()),
///     )
///     .build()
///     .unwrap();
/// assert!(registry.contains("AWS::EC2::VPC.Tag"));
/// ```
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    version: Option<String>,
    resources: Vec<ResourceDefinition>,
    property_types: Vec<PropertyTypeDefinition>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn resource(mut self, definition: ResourceDefinition) -> Self {
        self.add_resource(definition);
        self
    }

    pub fn property_type(mut self, definition: PropertyTypeDefinition) -> Self {
        self.add_property_type(definition);
        self
    }

    pub fn add_resource(&mut self, definition: ResourceDefinition) {
        self.resources.push(definition);
    }

    pub fn add_property_type(&mut self, definition: PropertyTypeDefinition) {
        self.property_types.push(definition);
    }

    /// Validate and freeze the collected definitions.
    ///
    /// Rejects duplicate type names, duplicate property names, property
    /// types without a registered owner and cycles between property types.
    /// References to unregistered property types are left for the
    /// serializer to report.
    pub fn build(self) -> Result<Registry> {
        let mut resources = IndexMap::with_capacity(self.resources.len());
        for def in self.resources {
            check_unique_properties(&def)?;
            if resources.contains_key(def.type_name()) {
                return Err(Box::new(Error::DuplicateType {
                    name: def.type_name().to_string(),
                }));
            }
            resources.insert(def.type_name().to_string(), Arc::new(def));
        }

        let mut property_types = IndexMap::with_capacity(self.property_types.len());
        for def in self.property_types {
            check_unique_properties(&def)?;
            let name = def.name().to_string();
            if property_types.contains_key(&name) || resources.contains_key(&name) {
                return Err(Box::new(Error::DuplicateType { name }));
            }
            if !def.owner().is_some_and(|owner| resources.contains_key(owner)) {
                return Err(Box::new(Error::OrphanPropertyType { name }));
            }
            property_types.insert(name, Arc::new(def));
        }

        check_cycles(&property_types)?;

        debug!(
            resources = resources.len(),
            property_types = property_types.len(),
            "registry built"
        );

        Ok(Registry {
            version: self.version,
            resources,
            property_types,
        })
    }
}

fn check_unique_properties(def: &dyn Definition) -> Result<()> {
    let properties = def.properties();
    for (i, desc) in properties.iter().enumerate() {
        if properties[..i].iter().any(|p| p.name() == desc.name()) {
            return Err(Box::new(Error::DuplicateProperty {
                owner: def.name().to_string(),
                property: desc.name().to_string(),
            }));
        }
    }
    Ok(())
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

fn check_cycles(property_types: &IndexMap<String, Arc<PropertyTypeDefinition>>) -> Result<()> {
    let mut marks = HashMap::new();
    let mut stack = Vec::new();
    for name in property_types.keys() {
        visit(name, property_types, &mut marks, &mut stack)?;
    }
    Ok(())
}

fn visit<'a>(
    name: &'a str,
    property_types: &'a IndexMap<String, Arc<PropertyTypeDefinition>>,
    marks: &mut HashMap<&'a str, Mark>,
    stack: &mut Vec<&'a str>,
) -> Result<()> {
    match marks.get(name) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = stack.iter().position(|n| *n == name).unwrap_or(0);
            let mut cycle = stack[start..].to_vec();
            cycle.push(name);
            return Err(Box::new(Error::CyclicPropertyType {
                cycle: cycle.join(" -> "),
            }));
        }
        None => {}
    }

    // Dangling references surface as UnknownType at serialization time.
    let Some(def) = property_types.get(name) else {
        return Ok(());
    };

    marks.insert(name, Mark::Visiting);
    stack.push(name);
    for desc in def.properties() {
        if let Some(target) = desc.kind().complex_ref() {
            visit(target, property_types, marks, stack)?;
        }
    }
    stack.pop();
    marks.insert(name, Mark::Done);
    Ok(())
}
