use std::path::{Path, PathBuf};

use humidifier_ir::Node;
use humidifier_schema::Registry;
use humidifier_template::{Serializer, Template};
use tracing::debug;

use crate::{Error, Result, SourceContext, Stack};

/// A stack.toml file with its path, raw content and parsed stack.
#[derive(Debug, Clone)]
pub struct StackToml {
    path: PathBuf,
    content: String,
    stack: Stack,
}

impl StackToml {
    /// Open and parse a stack.toml file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let content = std::fs::read_to_string(&path).map_err(|e| {
            Box::new(Error::Io {
                path: path.clone(),
                source: e,
            })
        })?;
        let filename = path.display().to_string();
        let stack = Stack::from_str_with_filename(&content, &filename)?;

        Ok(Self {
            path,
            content,
            stack,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Path of the catalog named by the manifest, resolved against the
    /// manifest's directory.
    pub fn catalog_path(&self) -> Option<PathBuf> {
        let catalog = self.stack.catalog.as_ref()?;
        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        Some(dir.join(catalog))
    }

    /// The registry this stack renders against: its catalog, or the
    /// built-in definitions.
    pub fn registry(&self) -> Result<Registry> {
        match self.catalog_path() {
            Some(path) => Registry::from_file(&path)
                .map_err(|e| Box::new(Error::Catalog { path, source: *e })),
            None => Ok(Registry::builtin().clone()),
        }
    }

    /// Build the template described by this file.
    pub fn template(&self, registry: &Registry) -> Result<Template> {
        self.stack.to_template(registry, &self.source_context())
    }

    /// Build and serialize the template.
    pub fn render(&self, registry: &Registry) -> Result<Node> {
        let template = self.template(registry)?;
        debug!(path = %self.path.display(), "rendering stack");
        let ctx = self.source_context();
        Serializer::new(registry)
            .serialize_template(&template)
            .map_err(|e| ctx.render_error(e))
    }

    fn source_context(&self) -> SourceContext {
        SourceContext::new(&self.content, self.path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_open_missing_file() {
        let err = StackToml::open("does/not/exist/stack.toml").unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }

    #[test]
    fn test_catalog_path_relative_to_manifest() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stack.toml");
        fs::write(&path, "catalog = \"defs/catalog.json\"\n").unwrap();

        let file = StackToml::open(&path).unwrap();
        assert_eq!(file.catalog_path(), Some(dir.path().join("defs/catalog.json")));
    }

    #[test]
    fn test_builtin_registry_without_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stack.toml");
        fs::write(&path, "").unwrap();

        let file = StackToml::open(&path).unwrap();
        assert!(file.catalog_path().is_none());
        assert!(file.registry().unwrap().contains("AWS::EC2::VPC"));
    }

    #[test]
    fn test_missing_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stack.toml");
        fs::write(&path, "catalog = \"catalog.json\"\n").unwrap();

        let err = StackToml::open(&path).unwrap().registry().unwrap_err();
        assert!(matches!(
            *err,
            Error::Catalog {
                source: humidifier_schema::Error::Io { .. },
                ..
            }
        ));
    }

    #[test]
    fn test_render_missing_required_property() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("stack.toml");
        fs::write(&path, "[resources.Ad]\ntype = \"AWS::DirectoryService::MicrosoftAD\"\n").unwrap();

        let file = StackToml::open(&path).unwrap();
        let err = file.render(Registry::builtin()).unwrap_err();
        assert!(matches!(
            *err,
            Error::Render {
                source: humidifier_template::Error::MissingRequiredProperty { .. }
            }
        ));
    }
}
