//! JSON text output.

use humidifier_ir::Node;

/// Compact JSON, keys in document order.
pub fn to_json_string(node: &Node) -> String {
    serde_json::to_string(node).expect("serialization cannot fail for a document tree")
}

/// Pretty-printed JSON with two-space indentation.
pub fn to_json_string_pretty(node: &Node) -> String {
    serde_json::to_string_pretty(node).expect("serialization cannot fail for a document tree")
}
