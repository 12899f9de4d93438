//! Loader for the CloudFormation resource specification JSON format.
//!
//! ```json
//! {
//!   "ResourceSpecificationVersion": "1.0.0",
//!   "PropertyTypes": {
//!     "AWS::EC2::VPC.Tag": { "Properties": { "Key": { "PrimitiveType": "String", "Required": true } } }
//!   },
//!   "ResourceTypes": {
//!     "AWS::EC2::VPC": {
//!       "Attributes": { "DefaultSecurityGroup": { "PrimitiveType": "String" } },
//!       "Properties": {
//!         "CidrBlock": { "PrimitiveType": "String", "Required": true, "UpdateType": "Immutable" },
//!         "Tags": { "Type": "List", "ItemType": "Tag", "Required": false, "UpdateType": "Mutable" }
//!       }
//!     }
//!   }
//! }
//! ```
//!
//! `Type` and `ItemType` name property types relative to the owning
//! resource. Unqualified entries under `PropertyTypes` (the shared `Tag`)
//! are copied under every resource that refers to them.

use std::{path::Path, str::FromStr};

use indexmap::IndexMap;
use serde::{Deserialize, de::IgnoredAny};
use tracing::{debug, trace};

use crate::{
    Error, Mutability, PrimitiveType, PropertyDescriptor, PropertyKind, PropertyTypeDefinition, Registry,
    RegistryBuilder, ResourceDefinition, Result, SourceContext,
};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawCatalog {
    resource_specification_version: Option<String>,
    #[serde(default)]
    property_types: IndexMap<String, RawPropertyType>,
    #[serde(default)]
    resource_types: IndexMap<String, RawResourceType>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawPropertyType {
    documentation: Option<String>,
    #[serde(default)]
    properties: IndexMap<String, RawProperty>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawResourceType {
    documentation: Option<String>,
    #[serde(default)]
    attributes: IndexMap<String, IgnoredAny>,
    #[serde(default)]
    properties: IndexMap<String, RawProperty>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RawProperty {
    documentation: Option<String>,
    #[serde(default)]
    required: bool,
    update_type: Option<String>,
    primitive_type: Option<String>,
    #[serde(rename = "Type")]
    kind: Option<String>,
    item_type: Option<String>,
    primitive_item_type: Option<String>,
    duplicates_allowed: Option<bool>,
}

impl Registry {
    /// Load a catalog from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading resource catalog");
        let content = std::fs::read_to_string(path).map_err(|e| {
            Box::new(Error::Io {
                path: path.to_path_buf(),
                source: e,
            })
        })?;
        Self::from_str_with_filename(&content, &path.display().to_string())
    }

    /// Load a catalog from a string with a custom filename for error reporting.
    pub fn from_str_with_filename(content: &str, filename: &str) -> Result<Self> {
        let ctx = SourceContext::new(content, filename);
        load(&ctx)
    }
}

impl FromStr for Registry {
    type Err = Box<Error>;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_filename(s, "catalog.json")
    }
}

fn load(ctx: &SourceContext) -> Result<Registry> {
    let raw: RawCatalog = serde_json::from_str(ctx.src()).map_err(|e| ctx.parse_error(e))?;

    let mut resolver = Resolver {
        ctx,
        raw: &raw,
        pending: Vec::new(),
    };
    let mut builder = RegistryBuilder::new();
    if let Some(version) = &raw.resource_specification_version {
        builder = builder.version(version);
    }

    for (type_name, rt) in &raw.resource_types {
        let mut def = ResourceDefinition::new(type_name);
        for desc in resolver.descriptors(type_name, type_name, &rt.properties)? {
            def = def.property(desc);
        }
        for attribute in rt.attributes.keys() {
            def = def.attribute(attribute);
        }
        if let Some(url) = &rt.documentation {
            def = def.documentation(url);
        }
        builder.add_resource(def);
    }

    for (name, pt) in &raw.property_types {
        // Shared types are only registered through the resources using them.
        let Some((owner, _)) = name.split_once('.') else {
            continue;
        };
        builder.add_property_type(resolver.property_type(owner, name, pt)?);
    }

    let mut materialized = Vec::new();
    while let Some((owner, short)) = resolver.pending.pop() {
        let name = format!("{}.{}", owner, short);
        if materialized.contains(&name) {
            continue;
        }
        trace!(%name, "materializing shared property type");
        let pt = &raw.property_types[short.as_str()];
        builder.add_property_type(resolver.property_type(&owner, &name, pt)?);
        materialized.push(name);
    }

    builder.build()
}

struct Resolver<'a> {
    ctx: &'a SourceContext,
    raw: &'a RawCatalog,
    /// Shared property types still to be copied, as (owner, short name).
    pending: Vec<(String, String)>,
}

impl Resolver<'_> {
    fn property_type(
        &mut self,
        owner: &str,
        name: &str,
        raw: &RawPropertyType,
    ) -> Result<PropertyTypeDefinition> {
        let mut def = PropertyTypeDefinition::new(name);
        for desc in self.descriptors(owner, name, &raw.properties)? {
            def = def.property(desc);
        }
        if let Some(url) = &raw.documentation {
            def = def.documentation(url);
        }
        Ok(def)
    }

    fn descriptors(
        &mut self,
        owner: &str,
        def_name: &str,
        properties: &IndexMap<String, RawProperty>,
    ) -> Result<Vec<PropertyDescriptor>> {
        properties
            .iter()
            .map(|(name, raw)| self.descriptor(owner, def_name, name, raw))
            .collect()
    }

    fn descriptor(
        &mut self,
        owner: &str,
        def_name: &str,
        name: &str,
        raw: &RawProperty,
    ) -> Result<PropertyDescriptor> {
        let kind = self.kind(owner, def_name, name, raw)?;
        let mut desc = PropertyDescriptor::new(name, kind).set_required(raw.required);
        if let Some(update_type) = &raw.update_type {
            let mutability = update_type
                .parse::<Mutability>()
                .map_err(|reason| self.ctx.invalid_kind_error(def_name, name, reason))?;
            desc = desc.mutability(mutability);
        }
        if let Some(allowed) = raw.duplicates_allowed {
            desc = desc.duplicates_allowed(allowed);
        }
        if let Some(url) = &raw.documentation {
            desc = desc.documentation(url);
        }
        Ok(desc)
    }

    fn kind(
        &mut self,
        owner: &str,
        def_name: &str,
        name: &str,
        raw: &RawProperty,
    ) -> Result<PropertyKind> {
        if let Some(primitive) = &raw.primitive_type {
            return self.primitive(def_name, name, primitive);
        }
        match raw.kind.as_deref() {
            Some("List") => Ok(PropertyKind::list(self.item_kind(owner, def_name, name, raw)?)),
            Some("Map") => Ok(PropertyKind::map(self.item_kind(owner, def_name, name, raw)?)),
            Some(type_ref) => Ok(PropertyKind::complex(self.resolve(owner, type_ref))),
            None => Err(self.ctx.invalid_kind_error(
                def_name,
                name,
                "property declares neither PrimitiveType nor Type",
            )),
        }
    }

    fn item_kind(
        &mut self,
        owner: &str,
        def_name: &str,
        name: &str,
        raw: &RawProperty,
    ) -> Result<PropertyKind> {
        if let Some(primitive) = &raw.primitive_item_type {
            return self.primitive(def_name, name, primitive);
        }
        match &raw.item_type {
            Some(type_ref) => Ok(PropertyKind::complex(self.resolve(owner, type_ref))),
            None => Err(self.ctx.invalid_kind_error(
                def_name,
                name,
                "List and Map properties need ItemType or PrimitiveItemType",
            )),
        }
    }

    fn primitive(&self, def_name: &str, name: &str, primitive: &str) -> Result<PropertyKind> {
        primitive
            .parse::<PrimitiveType>()
            .map(PropertyKind::Primitive)
            .map_err(|reason| self.ctx.invalid_kind_error(def_name, name, reason))
    }

    /// Qualify a type reference against its owning resource.
    fn resolve(&mut self, owner: &str, type_ref: &str) -> String {
        if type_ref.contains('.') {
            return type_ref.to_string();
        }
        let qualified = format!("{}.{}", owner, type_ref);
        if !self.raw.property_types.contains_key(&qualified)
            && self.raw.property_types.contains_key(type_ref)
        {
            self.pending
                .push((owner.to_string(), type_ref.to_string()));
        }
        qualified
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::Definition;

    const DIRECTORY: &str = r#"{
  "ResourceSpecificationVersion": "2.3.0",
  "PropertyTypes": {
    "AWS::DirectoryService::MicrosoftAD.VpcSettings": {
      "Properties": {
        "VpcId": { "PrimitiveType": "String", "Required": true, "UpdateType": "Immutable" },
        "SubnetIds": { "Type": "List", "PrimitiveItemType": "String", "Required": true, "DuplicatesAllowed": false, "UpdateType": "Immutable" }
      }
    }
  },
  "ResourceTypes": {
    "AWS::DirectoryService::MicrosoftAD": {
      "Documentation": "http://docs.aws.amazon.com/AWSCloudFormation/latest/UserGuide/aws-resource-directoryservice-microsoftad.html",
      "Attributes": { "Alias": { "PrimitiveType": "String" }, "DnsIpAddresses": { "Type": "List", "PrimitiveItemType": "String" } },
      "Properties": {
        "Name": { "PrimitiveType": "String", "Required": true, "UpdateType": "Immutable" },
        "Password": { "PrimitiveType": "String", "Required": true, "UpdateType": "Immutable" },
        "VpcSettings": { "Type": "VpcSettings", "Required": true, "UpdateType": "Immutable" },
        "CreateAlias": { "PrimitiveType": "Boolean", "Required": false, "UpdateType": "Immutable" }
      }
    }
  }
}"#;

    #[test]
    fn test_load_keeps_document_order() {
        let registry: Registry = DIRECTORY.parse().unwrap();
        let def = registry.resource("AWS::DirectoryService::MicrosoftAD").unwrap();
        let names: Vec<_> = def.properties().iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["Name", "Password", "VpcSettings", "CreateAlias"]);
        assert_eq!(def.attributes(), ["Alias", "DnsIpAddresses"]);
        assert_eq!(registry.version(), Some("2.3.0"));
    }

    #[test]
    fn test_relative_type_resolves_against_owner() {
        let registry: Registry = DIRECTORY.parse().unwrap();
        let def = registry.resource("AWS::DirectoryService::MicrosoftAD").unwrap();
        let vpc = def.descriptor("VpcSettings").unwrap();
        assert_eq!(
            vpc.kind(),
            &PropertyKind::complex("AWS::DirectoryService::MicrosoftAD.VpcSettings")
        );
        assert!(vpc.is_required());
        assert_eq!(vpc.update_type(), Mutability::Immutable);
    }

    #[test]
    fn test_list_item_kinds() {
        let registry: Registry = DIRECTORY.parse().unwrap();
        let settings = registry
            .property_type("AWS::DirectoryService::MicrosoftAD.VpcSettings")
            .unwrap();
        let subnets = settings.descriptor("SubnetIds").unwrap();
        assert_eq!(subnets.kind().to_string(), "List<String>");
        assert!(!subnets.allows_duplicates());
    }

    #[test]
    fn test_shared_property_type_is_copied_per_owner() {
        let catalog = r#"{
  "PropertyTypes": {
    "Tag": { "Properties": { "Key": { "PrimitiveType": "String", "Required": true }, "Value": { "PrimitiveType": "String", "Required": true } } }
  },
  "ResourceTypes": {
    "AWS::EC2::VPC": { "Properties": { "Tags": { "Type": "List", "ItemType": "Tag" } } },
    "AWS::EC2::Subnet": { "Properties": { "Tags": { "Type": "List", "ItemType": "Tag" } } }
  }
}"#;
        let registry: Registry = catalog.parse().unwrap();
        assert!(registry.contains("AWS::EC2::VPC.Tag"));
        assert!(registry.contains("AWS::EC2::Subnet.Tag"));
        assert!(!registry.contains("Tag"));
        assert_eq!(
            registry.property_type("AWS::EC2::VPC.Tag").unwrap().required_properties(),
            vec!["Key", "Value"]
        );
    }

    #[test]
    fn test_map_kind() {
        let catalog = r#"{
  "ResourceTypes": {
    "AWS::SSM::Parameter": { "Properties": { "Tags": { "Type": "Map", "PrimitiveItemType": "String" } } }
  }
}"#;
        let registry: Registry = catalog.parse().unwrap();
        let def = registry.resource("AWS::SSM::Parameter").unwrap();
        assert_eq!(def.descriptor("Tags").unwrap().kind().to_string(), "Map<String>");
    }

    #[test]
    fn test_missing_kind_is_invalid() {
        let catalog = r#"{
  "ResourceTypes": {
    "AWS::EC2::VPC": { "Properties": { "CidrBlock": { "Required": true } } }
  }
}"#;
        let err = catalog.parse::<Registry>().unwrap_err();
        match *err {
            Error::InvalidKind { owner, property, span, .. } => {
                assert_eq!(owner, "AWS::EC2::VPC");
                assert_eq!(property, "CidrBlock");
                assert!(span.is_some());
            }
            other => panic!("expected invalid kind, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_primitive_is_invalid() {
        let catalog = r#"{
  "ResourceTypes": {
    "AWS::EC2::VPC": { "Properties": { "CidrBlock": { "PrimitiveType": "Text" } } }
  }
}"#;
        let err = catalog.parse::<Registry>().unwrap_err();
        assert!(matches!(*err, Error::InvalidKind { .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = "{ \"ResourceTypes\": ".parse::<Registry>().unwrap_err();
        assert!(matches!(*err, Error::Parse { .. }));
    }

    #[test]
    fn test_cycle_in_catalog() {
        let catalog = r#"{
  "PropertyTypes": {
    "AWS::WAF::Rule.Statement": { "Properties": { "Not": { "Type": "Statement" } } }
  },
  "ResourceTypes": {
    "AWS::WAF::Rule": { "Properties": { "Statement": { "Type": "Statement" } } }
  }
}"#;
        let err = catalog.parse::<Registry>().unwrap_err();
        assert!(matches!(*err, Error::CyclicPropertyType { .. }));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(DIRECTORY.as_bytes()).unwrap();
        let registry = Registry::from_file(file.path()).unwrap();
        assert_eq!(registry.resource_count(), 1);
        assert_eq!(registry.property_type_count(), 1);
    }

    #[test]
    fn test_from_missing_file() {
        let err = Registry::from_file("/nonexistent/catalog.json").unwrap_err();
        assert!(matches!(*err, Error::Io { .. }));
    }
}
