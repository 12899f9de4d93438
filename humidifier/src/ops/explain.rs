//! Explain operation - descriptors of one type.

use humidifier_schema::{Definition, Error, PropertyDescriptor, Registry, Result};

use crate::reports::{ExplainReport, PropertyInfo};

/// Describe a resource type or a qualified property type.
pub fn explain(registry: &Registry, name: &str) -> Result<ExplainReport> {
    if let Some(resource) = registry.get_resource(name) {
        return Ok(ExplainReport {
            name: resource.type_name().to_string(),
            kind: "resource type",
            documentation: resource.documentation_url().map(str::to_string),
            properties: property_infos(&**resource),
            attributes: resource.attributes().to_vec(),
            property_types: registry
                .property_types_of(name)
                .map(|pt| pt.name().to_string())
                .collect(),
        });
    }

    let property_type = registry
        .get_property_type(name)
        .ok_or_else(|| Error::unknown_type(name))?;
    Ok(ExplainReport {
        name: property_type.name().to_string(),
        kind: "property type",
        documentation: property_type.documentation_url().map(str::to_string),
        properties: property_infos(property_type),
        attributes: Vec::new(),
        property_types: Vec::new(),
    })
}

fn property_infos(definition: &dyn Definition) -> Vec<PropertyInfo> {
    definition.properties().iter().map(property_info).collect()
}

fn property_info(descriptor: &PropertyDescriptor) -> PropertyInfo {
    PropertyInfo {
        name: descriptor.name().to_string(),
        kind: descriptor.kind().to_string(),
        required: descriptor.is_required(),
        update_type: descriptor.update_type().to_string(),
    }
}
