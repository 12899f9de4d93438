//! Check command report data structures.

use super::output::{Output, Report};

/// Summary of a catalog that loaded and validated.
#[derive(Debug)]
pub struct CheckReport {
    /// Catalog path, or "built-in catalog".
    pub source: String,
    /// `ResourceSpecificationVersion`, when the catalog has one.
    pub version: Option<String>,
    pub resource_count: usize,
    pub property_type_count: usize,
    /// Required properties across all resource types.
    pub required_properties: usize,
}

impl Report for CheckReport {
    fn render(&self, out: &mut dyn Output) {
        out.preformatted(&format!("✓ {} is valid", self.source));
        out.newline();

        if let Some(version) = &self.version {
            out.key_value_indented("Version", version);
        }
        out.key_value_indented(
            "Resource types",
            &self.resource_count.to_string(),
        );
        out.key_value_indented(
            "Property types",
            &self.property_type_count.to_string(),
        );
        out.key_value_indented(
            "Required properties",
            &self.required_properties.to_string(),
        );
    }
}
