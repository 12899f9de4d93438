//! Document serializer.
//!
//! Walks resource instances against their definitions and produces the
//! generic [`Node`] tree. Keys always follow descriptor declaration order,
//! unset optional properties are omitted and the first failure (depth
//! first, in descriptor order) aborts the whole call.

use humidifier_ir::{Node, Properties, Scalar, Value};
use humidifier_schema::{Definition, PrimitiveType, PropertyKind, Registry};
use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::{
    Error, FORMAT_VERSION, Output, Parameter, ResourceInstance, Result, Template, instance::NULL,
};

type Object = IndexMap<String, Node>;

/// Serializes instances and templates using the definitions of a registry.
///
/// The registry resolves nested property types; resource definitions come
/// from the instances themselves.
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'r> {
    registry: &'r Registry,
}

impl<'r> Serializer<'r> {
    pub fn new(registry: &'r Registry) -> Self {
        Self { registry }
    }

    /// Serialize one resource to `{"Type": ..., "Properties": {...}, ...}`.
    pub fn serialize_resource(&self, instance: &ResourceInstance) -> Result<Node> {
        let definition = instance.definition();
        let properties = self.serialize_fields(definition, |name| instance.get(name))?;

        let mut object = Object::new();
        object.insert("Type".into(), Node::string(definition.type_name()));
        object.insert("Properties".into(), Node::Object(properties));
        if let Some(condition) = instance.condition() {
            object.insert("Condition".into(), Node::string(condition));
        }
        if !instance.dependencies().is_empty() {
            let ids = instance.dependencies().iter().map(Node::string).collect();
            object.insert("DependsOn".into(), Node::Array(ids));
        }
        if let Some(policy) = instance.deletion_policy() {
            object.insert("DeletionPolicy".into(), Node::string(policy.as_str()));
        }
        if let Some(policy) = instance.update_replace_policy() {
            object.insert("UpdateReplacePolicy".into(), Node::string(policy.as_str()));
        }
        if let Some(metadata) = instance.metadata() {
            object.insert("Metadata".into(), metadata.to_node()?);
        }
        Ok(Node::Object(object))
    }

    /// Serialize a whole template.
    ///
    /// Sections are emitted in a fixed order; empty sections other than
    /// `Resources` are left out.
    pub fn serialize_template(&self, template: &Template) -> Result<Node> {
        let mut object = Object::new();
        object.insert(
            "AWSTemplateFormatVersion".into(),
            Node::string(FORMAT_VERSION),
        );
        if let Some(description) = template.get_description() {
            object.insert("Description".into(), Node::string(description));
        }

        let mut parameters = Object::new();
        for (logical_id, parameter) in template.parameters() {
            parameters.insert(logical_id.to_string(), serialize_parameter(parameter)?);
        }
        if !parameters.is_empty() {
            object.insert("Parameters".into(), Node::Object(parameters));
        }

        let mut conditions = Object::new();
        for (logical_id, condition) in template.conditions() {
            conditions.insert(logical_id.to_string(), condition.to_node()?);
        }
        if !conditions.is_empty() {
            object.insert("Conditions".into(), Node::Object(conditions));
        }

        let mut resources = Object::new();
        for (logical_id, instance) in template.resources() {
            debug!(logical_id, resource_type = instance.type_name(), "serializing resource");
            resources.insert(logical_id.to_string(), self.serialize_resource(instance)?);
        }
        object.insert("Resources".into(), Node::Object(resources));

        let mut outputs = Object::new();
        for (logical_id, output) in template.outputs() {
            outputs.insert(logical_id.to_string(), serialize_output(logical_id, output)?);
        }
        if !outputs.is_empty() {
            object.insert("Outputs".into(), Node::Object(outputs));
        }

        Ok(Node::Object(object))
    }

    fn serialize_fields<'v>(
        &self,
        definition: &dyn Definition,
        get: impl Fn(&str) -> &'v Value,
    ) -> Result<Object> {
        let mut object = Object::new();
        for descriptor in definition.properties() {
            let value = get(descriptor.name());
            if value.is_null() {
                if descriptor.is_required() {
                    return Err(Error::missing_required(
                        definition.name(),
                        descriptor.name(),
                    ));
                }
                continue;
            }
            trace!(
                owner = definition.name(),
                property = descriptor.name(),
                "serializing property"
            );
            let node = self.serialize_value(descriptor.kind(), value)?;
            object.insert(descriptor.name().to_string(), node);
        }
        Ok(object)
    }

    fn serialize_value(&self, kind: &PropertyKind, value: &Value) -> Result<Node> {
        if let Value::Expression(expression) = value {
            return Ok(expression.to_node()?);
        }
        match kind {
            PropertyKind::Primitive(ty) => serialize_primitive(*ty, value),
            PropertyKind::Complex(name) => {
                let definition = self
                    .registry
                    .get_property_type(name)
                    .ok_or_else(|| Error::unknown_type(name))?;
                let Value::Object(fields) = value else {
                    return Err(Error::type_mismatch(name, value.kind_name()));
                };
                let object = self.serialize_fields(definition, |field| {
                    fields.get(field).unwrap_or(&NULL)
                })?;
                check_declared(definition, fields)?;
                Ok(Node::Object(object))
            }
            PropertyKind::ListOf(item) => {
                let Value::List(items) = value else {
                    return Err(Error::type_mismatch(kind.to_string(), value.kind_name()));
                };
                let nodes = items
                    .iter()
                    .map(|element| match element {
                        Value::Null => Err(Error::type_mismatch(item.to_string(), "Null")),
                        element => self.serialize_value(item, element),
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(Node::Array(nodes))
            }
            PropertyKind::MapOf(item) => {
                let Value::Object(entries) = value else {
                    return Err(Error::type_mismatch(kind.to_string(), value.kind_name()));
                };
                let mut object = Object::new();
                for (key, entry) in entries {
                    if entry.is_null() {
                        return Err(Error::type_mismatch(item.to_string(), "Null"));
                    }
                    object.insert(key.clone(), self.serialize_value(item, entry)?);
                }
                Ok(Node::Object(object))
            }
        }
    }
}

fn serialize_primitive(ty: PrimitiveType, value: &Value) -> Result<Node> {
    match value {
        _ if ty == PrimitiveType::Json => Ok(value.to_node()?),
        Value::Literal(literal) if ty.accepts(literal) => Ok(Node::Scalar(literal.to_scalar())),
        _ => Err(Error::type_mismatch(ty.as_str(), value.kind_name())),
    }
}

/// Reject caller keys the property type does not declare. Runs after the
/// declared fields are walked, so their errors come first.
fn check_declared(definition: &dyn Definition, fields: &Properties) -> Result<()> {
    match fields
        .keys()
        .find(|key| definition.descriptor(key).is_none())
    {
        Some(key) => Err(Error::unknown_property(definition.name(), key.as_str())),
        None => Ok(()),
    }
}

fn serialize_parameter(parameter: &Parameter) -> Result<Node> {
    let mut object = Object::new();
    object.insert("Type".into(), Node::string(&parameter.param_type));
    if let Some(description) = &parameter.description {
        object.insert("Description".into(), Node::string(description));
    }
    if !parameter.default.is_null() {
        object.insert("Default".into(), parameter.default.to_node()?);
    }
    if !parameter.allowed_values.is_empty() {
        let values = parameter
            .allowed_values
            .iter()
            .map(Value::to_node)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        object.insert("AllowedValues".into(), Node::Array(values));
    }
    if let Some(pattern) = &parameter.allowed_pattern {
        object.insert("AllowedPattern".into(), Node::string(pattern));
    }
    if let Some(len) = parameter.min_length {
        object.insert("MinLength".into(), Value::from(len).to_node()?);
    }
    if let Some(len) = parameter.max_length {
        object.insert("MaxLength".into(), Value::from(len).to_node()?);
    }
    if let Some(n) = parameter.min_value {
        object.insert("MinValue".into(), Node::Scalar(Scalar::Number(n)));
    }
    if let Some(n) = parameter.max_value {
        object.insert("MaxValue".into(), Node::Scalar(Scalar::Number(n)));
    }
    if parameter.no_echo {
        object.insert("NoEcho".into(), Node::Scalar(Scalar::Bool(true)));
    }
    if let Some(description) = &parameter.constraint_description {
        object.insert("ConstraintDescription".into(), Node::string(description));
    }
    Ok(Node::Object(object))
}

fn serialize_output(logical_id: &str, output: &Output) -> Result<Node> {
    if output.value.is_null() {
        return Err(Error::missing_required(
            format!("Outputs.{}", logical_id),
            "Value",
        ));
    }
    let mut object = Object::new();
    if let Some(description) = &output.description {
        object.insert("Description".into(), Node::string(description));
    }
    object.insert("Value".into(), output.value.to_node()?);
    if let Some(name) = &output.export_name {
        object.insert("Export".into(), Node::single("Name", name.to_node()?));
    }
    if let Some(condition) = &output.condition {
        object.insert("Condition".into(), Node::string(condition));
    }
    Ok(Node::Object(object))
}
