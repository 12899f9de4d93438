//! Render operation - stack manifest to template document.

use humidifier_manifest::{Result, StackToml};
use humidifier_schema::Registry;
use humidifier_template::{to_json_string, to_json_string_pretty};

/// Render a stack to JSON text, pretty-printed unless `compact`.
pub fn render(stack: &StackToml, registry: &Registry, compact: bool) -> Result<String> {
    let node = stack.render(registry)?;
    let mut json = if compact {
        to_json_string(&node)
    } else {
        to_json_string_pretty(&node)
    };
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_render_compact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stack.toml");
        fs::write(
            &path,
            "[resources.Net]\ntype = \"AWS::EC2::VPC\"\nproperties = { CidrBlock = \"10.0.0.0/16\" }\n",
        )
        .unwrap();

        let stack = StackToml::open(&path).unwrap();
        let json = render(&stack, Registry::builtin(), true).unwrap();
        assert_eq!(
            json,
            "{\"AWSTemplateFormatVersion\":\"2010-09-09\",\"Resources\":{\"Net\":{\"Type\":\"AWS::EC2::VPC\",\"Properties\":{\"CidrBlock\":\"10.0.0.0/16\"}}}}\n"
        );
    }
}
