//! Check operation - catalog summary.

use humidifier_schema::{Definition, Registry};

use crate::reports::CheckReport;

/// Summarize a registry that loaded without errors.
pub fn check(registry: &Registry, source: &str) -> CheckReport {
    let required_properties = registry
        .resources()
        .map(|r| r.required_properties().len())
        .sum();

    CheckReport {
        source: source.to_string(),
        version: registry.version().map(str::to_string),
        resource_count: registry.resource_count(),
        property_type_count: registry.property_type_count(),
        required_properties,
    }
}
