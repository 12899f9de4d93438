//! Explain command report data structures.

use super::output::{Output, Report};

/// Descriptors of a resource or property type.
#[derive(Debug)]
pub struct ExplainReport {
    /// Fully qualified type name.
    pub name: String,
    /// "resource type" or "property type".
    pub kind: &'static str,
    /// User guide URL.
    pub documentation: Option<String>,
    /// Properties in declaration order.
    pub properties: Vec<PropertyInfo>,
    /// `Fn::GetAtt` attributes (resources only).
    pub attributes: Vec<String>,
    /// Property types owned by the resource.
    pub property_types: Vec<String>,
}

/// One property descriptor.
#[derive(Debug)]
pub struct PropertyInfo {
    pub name: String,
    /// Kind as written in the catalog, e.g. `List<String>`.
    pub kind: String,
    pub required: bool,
    /// `Mutable`, `Immutable` or `Conditional`.
    pub update_type: String,
}

impl Report for ExplainReport {
    fn render(&self, out: &mut dyn Output) {
        out.title(&self.name);
        out.key_value("Kind", self.kind);
        if let Some(url) = &self.documentation {
            out.key_value("Documentation", url);
        }
        out.newline();

        out.section("Properties");
        for property in &self.properties {
            let required = if property.required { "required" } else { "optional" };
            out.list_item(&format!(
                "{}: {} ({}, {})",
                property.name, property.kind, required, property.update_type
            ));
        }

        if !self.attributes.is_empty() {
            out.newline();
            out.section("Attributes");
            for attribute in &self.attributes {
                out.list_item(attribute);
            }
        }

        if !self.property_types.is_empty() {
            out.newline();
            out.section("Property types");
            for name in &self.property_types {
                out.list_item(name);
            }
        }
    }
}
