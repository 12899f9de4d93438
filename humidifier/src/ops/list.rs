//! List operation - registered resource types.

use humidifier_schema::{Definition, Registry};

use crate::reports::{ListReport, ResourceSummary};

pub fn list(registry: &Registry) -> ListReport {
    let resources = registry
        .resources()
        .map(|r| ResourceSummary {
            type_name: r.type_name().to_string(),
            property_count: r.properties().len(),
            required_count: r.required_properties().len(),
        })
        .collect();

    ListReport { resources }
}
