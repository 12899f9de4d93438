//! List command report data structures.

use super::output::{Output, Report};

#[derive(Debug)]
pub struct ListReport {
    /// Resource types in registration order.
    pub resources: Vec<ResourceSummary>,
}

#[derive(Debug)]
pub struct ResourceSummary {
    pub type_name: String,
    pub property_count: usize,
    pub required_count: usize,
}

impl Report for ListReport {
    fn render(&self, out: &mut dyn Output) {
        if self.resources.is_empty() {
            out.preformatted("No resource types registered");
            return;
        }

        out.section(&format!("Resource types ({})", self.resources.len()));
        for resource in &self.resources {
            out.list_item(&format!(
                "{} ({} properties, {} required)",
                resource.type_name, resource.property_count, resource.required_count
            ));
        }
    }
}
