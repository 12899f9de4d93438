//! Templates: parameters, conditions, resources and outputs.

use std::str::FromStr;

use humidifier_ir::{Number, Pseudo, Value};
use indexmap::IndexMap;

use crate::{Error, ResourceInstance, Result};

/// The only template format version the provisioning engine accepts.
pub const FORMAT_VERSION: &str = "2010-09-09";

/// A stack parameter, referenced with `Ref` by its logical ID.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub(crate) param_type: String,
    pub(crate) description: Option<String>,
    pub(crate) default: Value,
    pub(crate) allowed_values: Vec<Value>,
    pub(crate) allowed_pattern: Option<String>,
    pub(crate) min_length: Option<u32>,
    pub(crate) max_length: Option<u32>,
    pub(crate) min_value: Option<Number>,
    pub(crate) max_value: Option<Number>,
    pub(crate) no_echo: bool,
    pub(crate) constraint_description: Option<String>,
}

impl Parameter {
    /// A parameter of the given type (`String`, `Number`, `List<AWS::EC2::Subnet::Id>`, ...).
    pub fn new(param_type: impl Into<String>) -> Self {
        Self {
            param_type: param_type.into(),
            description: None,
            default: Value::Null,
            allowed_values: Vec::new(),
            allowed_pattern: None,
            min_length: None,
            max_length: None,
            min_value: None,
            max_value: None,
            no_echo: false,
            constraint_description: None,
        }
    }

    pub fn string() -> Self {
        Self::new("String")
    }

    pub fn number() -> Self {
        Self::new("Number")
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn default_value(mut self, default: impl Into<Value>) -> Self {
        self.default = default.into();
        self
    }

    pub fn allowed_values<I, T>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.allowed_values = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn allowed_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.allowed_pattern = Some(pattern.into());
        self
    }

    pub fn min_length(mut self, len: u32) -> Self {
        self.min_length = Some(len);
        self
    }

    pub fn max_length(mut self, len: u32) -> Self {
        self.max_length = Some(len);
        self
    }

    pub fn min_value(mut self, value: Number) -> Self {
        self.min_value = Some(value);
        self
    }

    pub fn max_value(mut self, value: Number) -> Self {
        self.max_value = Some(value);
        self
    }

    /// Mask the value in console and API output.
    pub fn no_echo(mut self) -> Self {
        self.no_echo = true;
        self
    }

    pub fn constraint_description(mut self, description: impl Into<String>) -> Self {
        self.constraint_description = Some(description.into());
        self
    }

    pub fn param_type(&self) -> &str {
        &self.param_type
    }
}

/// A stack output.
#[derive(Debug, Clone, PartialEq)]
pub struct Output {
    pub(crate) value: Value,
    pub(crate) description: Option<String>,
    pub(crate) export_name: Option<Value>,
    pub(crate) condition: Option<String>,
}

impl Output {
    pub fn new(value: impl Into<Value>) -> Self {
        Self {
            value: value.into(),
            description: None,
            export_name: None,
            condition: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Export the value under a name other stacks can import.
    pub fn export(mut self, name: impl Into<Value>) -> Self {
        self.export_name = Some(name.into()).filter(|n| !n.is_null());
        self
    }

    pub fn condition(mut self, condition: impl Into<String>) -> Self {
        self.condition = Some(condition.into());
        self
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// A complete template.
///
/// Parameters and resources share one logical ID namespace (both are `Ref`
/// targets); conditions and outputs each have their own.
#[derive(Debug, Clone, Default)]
pub struct Template {
    description: Option<String>,
    parameters: IndexMap<String, Parameter>,
    conditions: IndexMap<String, Value>,
    resources: IndexMap<String, ResourceInstance>,
    outputs: IndexMap<String, Output>,
}

impl Template {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    pub fn add_parameter(&mut self, logical_id: &str, parameter: Parameter) -> Result<()> {
        self.check_ref_target(logical_id)?;
        self.parameters.insert(logical_id.to_string(), parameter);
        Ok(())
    }

    /// Add a named condition (usually an `Fn::Equals`/`Fn::And`/... expression).
    pub fn add_condition(&mut self, logical_id: &str, condition: impl Into<Value>) -> Result<()> {
        validate_logical_id(logical_id)?;
        if self.conditions.contains_key(logical_id) {
            return Err(duplicate(logical_id, "Conditions"));
        }
        self.conditions
            .insert(logical_id.to_string(), condition.into());
        Ok(())
    }

    pub fn add_resource(
        &mut self,
        logical_id: &str,
        resource: ResourceInstance,
    ) -> Result<&mut ResourceInstance> {
        self.check_ref_target(logical_id)?;
        Ok(self
            .resources
            .entry(logical_id.to_string())
            .or_insert(resource))
    }

    pub fn add_output(&mut self, logical_id: &str, output: Output) -> Result<()> {
        validate_logical_id(logical_id)?;
        if self.outputs.contains_key(logical_id) {
            return Err(duplicate(logical_id, "Outputs"));
        }
        self.outputs.insert(logical_id.to_string(), output);
        Ok(())
    }

    pub fn resource(&self, logical_id: &str) -> Option<&ResourceInstance> {
        self.resources.get(logical_id)
    }

    pub fn resource_mut(&mut self, logical_id: &str) -> Option<&mut ResourceInstance> {
        self.resources.get_mut(logical_id)
    }

    /// `Ref` to a resource, parameter or pseudo parameter declared in this template.
    pub fn reference(&self, logical_id: &str) -> Result<Value> {
        let known = self.resources.contains_key(logical_id)
            || self.parameters.contains_key(logical_id)
            || Pseudo::from_str(logical_id).is_ok();
        if !known {
            return Err(Box::new(Error::UnknownLogicalId {
                logical_id: logical_id.to_string(),
            }));
        }
        Ok(Value::reference(logical_id))
    }

    /// `Fn::GetAtt` on a resource of this template, checked against its definition.
    pub fn get_att(&self, logical_id: &str, attribute: &str) -> Result<Value> {
        let resource = self.resources.get(logical_id).ok_or_else(|| {
            Box::new(Error::UnknownLogicalId {
                logical_id: logical_id.to_string(),
            })
        })?;
        if !resource.definition().has_attribute(attribute) {
            return Err(Box::new(Error::UnknownAttribute {
                type_name: resource.type_name().to_string(),
                attribute: attribute.to_string(),
            }));
        }
        Ok(Value::get_att(logical_id, attribute))
    }

    pub fn get_description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn parameters(&self) -> impl Iterator<Item = (&str, &Parameter)> {
        self.parameters.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn conditions(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn resources(&self) -> impl Iterator<Item = (&str, &ResourceInstance)> {
        self.resources.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn outputs(&self) -> impl Iterator<Item = (&str, &Output)> {
        self.outputs.iter().map(|(k, v)| (k.as_str(), v))
    }

    fn check_ref_target(&self, logical_id: &str) -> Result<()> {
        validate_logical_id(logical_id)?;
        if self.resources.contains_key(logical_id) {
            return Err(duplicate(logical_id, "Resources"));
        }
        if self.parameters.contains_key(logical_id) {
            return Err(duplicate(logical_id, "Parameters"));
        }
        Ok(())
    }
}

fn validate_logical_id(logical_id: &str) -> Result<()> {
    if logical_id.is_empty() || !logical_id.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(Box::new(Error::InvalidLogicalId {
            logical_id: logical_id.to_string(),
        }));
    }
    Ok(())
}

fn duplicate(logical_id: &str, section: &'static str) -> Box<Error> {
    Box::new(Error::DuplicateLogicalId {
        logical_id: logical_id.to_string(),
        section,
    })
}

#[cfg(test)]
mod tests {
    use humidifier_schema::Registry;

    use super::*;

    fn vpc() -> ResourceInstance {
        ResourceInstance::from_registry(Registry::builtin(), "AWS::EC2::VPC").unwrap()
    }

    #[test]
    fn test_logical_id_validation() {
        let mut template = Template::new();
        for bad in ["", "my-vpc", "my vpc", "vpc_1", "vpć"] {
            let err = template.add_resource(bad, vpc()).unwrap_err();
            assert!(matches!(*err, Error::InvalidLogicalId { .. }), "{bad}");
        }
        assert!(template.add_resource("MyVpc1", vpc()).is_ok());
    }

    #[test]
    fn test_parameters_and_resources_share_namespace() {
        let mut template = Template::new();
        template.add_parameter("Network", Parameter::string()).unwrap();
        let err = template.add_resource("Network", vpc()).unwrap_err();
        assert!(matches!(
            *err,
            Error::DuplicateLogicalId { section: "Parameters", .. }
        ));
    }

    #[test]
    fn test_outputs_have_their_own_namespace() {
        let mut template = Template::new();
        template.add_resource("Network", vpc()).unwrap();
        template
            .add_output("Network", Output::new(Value::reference("Network")))
            .unwrap();
        let err = template
            .add_output("Network", Output::new(Value::reference("Network")))
            .unwrap_err();
        assert!(matches!(*err, Error::DuplicateLogicalId { section: "Outputs", .. }));
    }

    #[test]
    fn test_checked_reference() {
        let mut template = Template::new();
        template.add_resource("Network", vpc()).unwrap();
        template.add_parameter("Env", Parameter::string()).unwrap();

        assert_eq!(template.reference("Network").unwrap(), Value::reference("Network"));
        assert_eq!(template.reference("Env").unwrap(), Value::reference("Env"));
        assert_eq!(
            template.reference("AWS::Region").unwrap(),
            Value::pseudo(Pseudo::Region)
        );
        let err = template.reference("Missing").unwrap_err();
        assert!(matches!(*err, Error::UnknownLogicalId { .. }));
    }

    #[test]
    fn test_checked_get_att() {
        let mut template = Template::new();
        template.add_resource("Network", vpc()).unwrap();

        assert_eq!(
            template.get_att("Network", "DefaultSecurityGroup").unwrap(),
            Value::get_att("Network", "DefaultSecurityGroup")
        );
        let err = template.get_att("Network", "Arn").unwrap_err();
        assert!(matches!(
            *err,
            Error::UnknownAttribute { ref type_name, ref attribute }
                if type_name == "AWS::EC2::VPC" && attribute == "Arn"
        ));
        let err = template.get_att("Other", "Arn").unwrap_err();
        assert!(matches!(*err, Error::UnknownLogicalId { .. }));
    }

    #[test]
    fn test_resource_mut() {
        let mut template = Template::new();
        template
            .add_resource("Network", vpc())
            .unwrap()
            .set("CidrBlock", "10.0.0.0/16")
            .unwrap();
        assert_eq!(
            template.resource("Network").unwrap().get("CidrBlock").as_str(),
            Some("10.0.0.0/16")
        );
        template
            .resource_mut("Network")
            .unwrap()
            .set("CidrBlock", Value::Null)
            .unwrap();
        assert!(template.resource("Network").unwrap().get("CidrBlock").is_null());
    }
}
