//! Stack manifest schema.

use std::{path::Path, str::FromStr};

use humidifier_schema::Registry;
use humidifier_template::{DeletionPolicy, Output, Parameter, ResourceInstance, Template};
use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::{
    Error, Result, SourceContext,
    convert::{to_number, to_value},
};

/// Root schema for stack.toml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stack {
    /// Template description
    pub description: Option<String>,

    /// Resource catalog, relative to the manifest. The built-in catalog is
    /// used when absent.
    pub catalog: Option<String>,

    #[serde(default)]
    pub parameters: IndexMap<String, ParameterSpec>,

    /// Named conditions, written as condition expressions
    #[serde(default)]
    pub conditions: IndexMap<String, toml::Value>,

    #[serde(default)]
    pub resources: IndexMap<String, ResourceSpec>,

    #[serde(default)]
    pub outputs: IndexMap<String, OutputSpec>,
}

/// `[parameters.<id>]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterSpec {
    #[serde(rename = "type", default = "default_parameter_type")]
    pub param_type: String,
    pub description: Option<String>,
    pub default: Option<toml::Value>,
    #[serde(default)]
    pub allowed_values: Vec<toml::Value>,
    pub allowed_pattern: Option<String>,
    pub min_length: Option<u32>,
    pub max_length: Option<u32>,
    pub min_value: Option<toml::Value>,
    pub max_value: Option<toml::Value>,
    #[serde(default)]
    pub no_echo: bool,
    pub constraint_description: Option<String>,
}

fn default_parameter_type() -> String {
    "String".to_string()
}

/// `[resources.<id>]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResourceSpec {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default)]
    pub depends_on: Vec<String>,
    pub condition: Option<String>,
    pub deletion_policy: Option<DeletionPolicy>,
    pub update_replace_policy: Option<DeletionPolicy>,
    pub metadata: Option<toml::Value>,
    #[serde(default)]
    pub properties: IndexMap<String, toml::Value>,
}

/// `[outputs.<id>]`
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputSpec {
    pub value: toml::Value,
    pub description: Option<String>,
    /// Export name, a string or an expression
    pub export: Option<toml::Value>,
    pub condition: Option<String>,
}

impl FromStr for Stack {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, "stack.toml")
    }
}

impl Stack {
    /// Parse a stack.toml file from the given path
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Parse a stack.toml from a string with a custom filename for error reporting
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| SourceContext::new(content, filename).parse_error(e))
    }

    /// Build the template against a registry.
    ///
    /// Errors point at the offending entry in `ctx`.
    pub fn to_template(&self, registry: &Registry, ctx: &SourceContext) -> Result<Template> {
        let mut template = Template::new();
        if let Some(description) = &self.description {
            template.set_description(description);
        }

        for (id, spec) in &self.parameters {
            let parameter = spec
                .to_parameter()
                .map_err(|e| ctx.entry_error("parameters", id, e))?;
            template
                .add_parameter(id, parameter)
                .map_err(|e| ctx.entry_error("parameters", id, e))?;
        }

        for (id, condition) in &self.conditions {
            let condition = to_value(condition).map_err(|e| ctx.entry_error("conditions", id, e))?;
            template
                .add_condition(id, condition)
                .map_err(|e| ctx.entry_error("conditions", id, e))?;
        }

        for (id, spec) in &self.resources {
            debug!(logical_id = %id, resource_type = %spec.resource_type, "building resource");
            let instance = spec
                .to_instance(registry)
                .map_err(|e| ctx.entry_error("resources", id, e))?;
            template
                .add_resource(id, instance)
                .map_err(|e| ctx.entry_error("resources", id, e))?;
        }

        for (id, spec) in &self.outputs {
            let output = spec
                .to_output()
                .map_err(|e| ctx.entry_error("outputs", id, e))?;
            template
                .add_output(id, output)
                .map_err(|e| ctx.entry_error("outputs", id, e))?;
        }

        Ok(template)
    }
}

impl ParameterSpec {
    fn to_parameter(&self) -> humidifier_template::Result<Parameter> {
        let mut parameter = Parameter::new(&self.param_type);
        if let Some(description) = &self.description {
            parameter = parameter.description(description);
        }
        if let Some(default) = &self.default {
            parameter = parameter.default_value(to_value(default)?);
        }
        if !self.allowed_values.is_empty() {
            let values = self
                .allowed_values
                .iter()
                .map(to_value)
                .collect::<std::result::Result<Vec<_>, _>>()?;
            parameter = parameter.allowed_values(values);
        }
        if let Some(pattern) = &self.allowed_pattern {
            parameter = parameter.allowed_pattern(pattern);
        }
        if let Some(len) = self.min_length {
            parameter = parameter.min_length(len);
        }
        if let Some(len) = self.max_length {
            parameter = parameter.max_length(len);
        }
        if let Some(value) = &self.min_value {
            parameter = parameter.min_value(to_number(value)?);
        }
        if let Some(value) = &self.max_value {
            parameter = parameter.max_value(to_number(value)?);
        }
        if self.no_echo {
            parameter = parameter.no_echo();
        }
        if let Some(description) = &self.constraint_description {
            parameter = parameter.constraint_description(description);
        }
        Ok(parameter)
    }
}

impl ResourceSpec {
    fn to_instance(&self, registry: &Registry) -> humidifier_template::Result<ResourceInstance> {
        let mut instance = ResourceInstance::from_registry(registry, &self.resource_type)?;
        for (name, value) in &self.properties {
            instance.set(name, to_value(value)?)?;
        }
        for dependency in &self.depends_on {
            instance.add_dependency(dependency);
        }
        if let Some(condition) = &self.condition {
            instance.set_condition(condition);
        }
        if let Some(policy) = self.deletion_policy {
            instance.set_deletion_policy(policy);
        }
        if let Some(policy) = self.update_replace_policy {
            instance.set_update_replace_policy(policy);
        }
        if let Some(metadata) = &self.metadata {
            instance.set_metadata(to_value(metadata)?);
        }
        Ok(instance)
    }
}

impl OutputSpec {
    fn to_output(&self) -> humidifier_template::Result<Output> {
        let mut output = Output::new(to_value(&self.value)?);
        if let Some(description) = &self.description {
            output = output.description(description);
        }
        if let Some(export) = &self.export {
            output = output.export(to_value(export)?);
        }
        if let Some(condition) = &self.condition {
            output = output.condition(condition);
        }
        Ok(output)
    }
}
