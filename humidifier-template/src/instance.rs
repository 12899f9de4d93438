//! Resource instances.

use std::{fmt, str::FromStr, sync::Arc};

use humidifier_ir::Value;
use humidifier_schema::{Definition, Registry, ResourceDefinition};
use indexmap::IndexMap;
use serde::Deserialize;

use crate::{Error, Result};

/// Returned for properties that were never assigned.
pub(crate) static NULL: Value = Value::Null;

/// What happens to the physical resource when it leaves the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum DeletionPolicy {
    Delete,
    Retain,
    Snapshot,
    RetainExceptOnCreate,
}

impl DeletionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeletionPolicy::Delete => "Delete",
            DeletionPolicy::Retain => "Retain",
            DeletionPolicy::Snapshot => "Snapshot",
            DeletionPolicy::RetainExceptOnCreate => "RetainExceptOnCreate",
        }
    }
}

impl fmt::Display for DeletionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeletionPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Delete" => Ok(DeletionPolicy::Delete),
            "Retain" => Ok(DeletionPolicy::Retain),
            "Snapshot" => Ok(DeletionPolicy::Snapshot),
            "RetainExceptOnCreate" => Ok(DeletionPolicy::RetainExceptOnCreate),
            other => Err(format!(
                "unknown deletion policy '{}', expected Delete, Retain, Snapshot or RetainExceptOnCreate",
                other
            )),
        }
    }
}

/// One resource: its definition plus the values the caller assigned.
///
/// Values are stored in assignment order but always serialized in the
/// definition's declaration order. Unset properties read as [`Value::Null`].
#[derive(Debug, Clone)]
pub struct ResourceInstance {
    definition: Arc<ResourceDefinition>,
    values: IndexMap<String, Value>,
    depends_on: Vec<String>,
    condition: Option<String>,
    deletion_policy: Option<DeletionPolicy>,
    update_replace_policy: Option<DeletionPolicy>,
    metadata: Option<Value>,
}

impl ResourceInstance {
    /// An instance with every property unset.
    pub fn new(definition: Arc<ResourceDefinition>) -> Self {
        Self {
            definition,
            values: IndexMap::new(),
            depends_on: Vec::new(),
            condition: None,
            deletion_policy: None,
            update_replace_policy: None,
            metadata: None,
        }
    }

    /// Create an instance of a registered resource type.
    pub fn from_registry(registry: &Registry, type_name: &str) -> Result<Self> {
        let definition = registry
            .get_resource(type_name)
            .cloned()
            .ok_or_else(|| Error::unknown_type(type_name))?;
        Ok(Self::new(definition))
    }

    pub fn definition(&self) -> &ResourceDefinition {
        &self.definition
    }

    pub fn type_name(&self) -> &str {
        self.definition.type_name()
    }

    /// Assign a property. Assigning [`Value::Null`] unsets it.
    ///
    /// Only the property name is checked here; the value is checked against
    /// the descriptor when serialized.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self> {
        if self.definition.descriptor(name).is_none() {
            return Err(Error::unknown_property(self.type_name(), name));
        }
        match value.into() {
            Value::Null => {
                self.values.shift_remove(name);
            }
            value => {
                self.values.insert(name.to_string(), value);
            }
        }
        Ok(self)
    }

    /// Consuming form of [`set`](Self::set).
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Result<Self> {
        self.set(name, value)?;
        Ok(self)
    }

    /// Unset a property, returning the previous value.
    pub fn unset(&mut self, name: &str) -> Value {
        self.values.shift_remove(name).unwrap_or_default()
    }

    /// Current value of a property ([`Value::Null`] when unset).
    pub fn get(&self, name: &str) -> &Value {
        self.values.get(name).unwrap_or(&NULL)
    }

    /// Assigned properties in assignment order.
    pub fn values(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn add_dependency(&mut self, logical_id: impl Into<String>) -> &mut Self {
        let logical_id = logical_id.into();
        if !self.depends_on.contains(&logical_id) {
            self.depends_on.push(logical_id);
        }
        self
    }

    pub fn set_condition(&mut self, condition: impl Into<String>) -> &mut Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn set_deletion_policy(&mut self, policy: DeletionPolicy) -> &mut Self {
        self.deletion_policy = Some(policy);
        self
    }

    pub fn set_update_replace_policy(&mut self, policy: DeletionPolicy) -> &mut Self {
        self.update_replace_policy = Some(policy);
        self
    }

    pub fn set_metadata(&mut self, metadata: impl Into<Value>) -> &mut Self {
        self.metadata = Some(metadata.into()).filter(|m| !m.is_null());
        self
    }

    pub fn dependencies(&self) -> &[String] {
        &self.depends_on
    }

    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }

    pub fn deletion_policy(&self) -> Option<DeletionPolicy> {
        self.deletion_policy
    }

    pub fn update_replace_policy(&self) -> Option<DeletionPolicy> {
        self.update_replace_policy
    }

    pub fn metadata(&self) -> Option<&Value> {
        self.metadata.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vpc() -> ResourceInstance {
        ResourceInstance::from_registry(Registry::builtin(), "AWS::EC2::VPC").unwrap()
    }

    #[test]
    fn test_unset_reads_null() {
        let instance = vpc();
        assert!(instance.get("CidrBlock").is_null());
        assert_eq!(instance.values().count(), 0);
    }

    #[test]
    fn test_set_and_unset() {
        let mut instance = vpc();
        instance.set("CidrBlock", "10.0.0.0/16").unwrap();
        assert_eq!(instance.get("CidrBlock").as_str(), Some("10.0.0.0/16"));

        assert_eq!(instance.unset("CidrBlock"), Value::string("10.0.0.0/16"));
        assert!(instance.get("CidrBlock").is_null());
        assert_eq!(instance.unset("CidrBlock"), Value::Null);
    }

    #[test]
    fn test_set_null_unsets() {
        let mut instance = vpc().with("CidrBlock", "10.0.0.0/16").unwrap();
        instance.set("CidrBlock", Value::Null).unwrap();
        assert_eq!(instance.values().count(), 0);
    }

    #[test]
    fn test_set_unknown_property() {
        let mut instance = vpc();
        let err = instance.set("Cidr", "10.0.0.0/16").unwrap_err();
        assert!(matches!(
            *err,
            Error::UnknownProperty { ref type_name, ref property }
                if type_name == "AWS::EC2::VPC" && property == "Cidr"
        ));
    }

    #[test]
    fn test_unknown_resource_type() {
        let err = ResourceInstance::from_registry(Registry::builtin(), "AWS::EC2::Nope").unwrap_err();
        assert!(matches!(*err, Error::UnknownType { .. }));
    }

    #[test]
    fn test_dependencies_are_unique() {
        let mut instance = vpc();
        instance.add_dependency("gateway").add_dependency("gateway");
        assert_eq!(instance.dependencies(), ["gateway"]);
    }

    #[test]
    fn test_deletion_policy_parse() {
        assert_eq!("Retain".parse(), Ok(DeletionPolicy::Retain));
        assert!("Keep".parse::<DeletionPolicy>().is_err());
    }
}
