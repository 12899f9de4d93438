//! Rendering stack manifests.

use std::fs;

use humidifier_ir::{Expression, Value};
use humidifier_manifest::{Error, StackToml};
use humidifier_schema::Registry;
use humidifier_template::{
    DeletionPolicy, Output, Parameter, ResourceInstance, Serializer, Template, to_json_string,
    to_json_string_pretty,
};
use tempfile::TempDir;

const DIRECTORY_STACK: &str = r#"
description = "Corporate directory"

[parameters.DirectoryPassword]
type = "String"
no_echo = true

[resources.corpDirectory]
type = "AWS::DirectoryService::MicrosoftAD"
depends_on = ["myVpc"]

[resources.corpDirectory.properties]
Name = "corp.example.com"
Password = { Ref = "DirectoryPassword" }
VpcSettings = { VpcId = { Ref = "myVpc" }, SubnetIds = ["subnet-1", "subnet-2"] }

[outputs.DirectoryId]
value = { Ref = "corpDirectory" }
"#;

fn write_stack(content: &str) -> (TempDir, StackToml) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("stack.toml");
    fs::write(&path, content).unwrap();
    let file = StackToml::open(&path).unwrap();
    (dir, file)
}

#[test]
fn test_directory_stack() {
    let (_dir, file) = write_stack(DIRECTORY_STACK);
    let node = file.render(Registry::builtin()).unwrap();

    insta::assert_snapshot!(to_json_string_pretty(&node), @r#"
    {
      "AWSTemplateFormatVersion": "2010-09-09",
      "Description": "Corporate directory",
      "Parameters": {
        "DirectoryPassword": {
          "Type": "String",
          "NoEcho": true
        }
      },
      "Resources": {
        "corpDirectory": {
          "Type": "AWS::DirectoryService::MicrosoftAD",
          "Properties": {
            "Name": "corp.example.com",
            "Password": {
              "Ref": "DirectoryPassword"
            },
            "VpcSettings": {
              "SubnetIds": [
                "subnet-1",
                "subnet-2"
              ],
              "VpcId": {
                "Ref": "myVpc"
              }
            }
          },
          "DependsOn": [
            "myVpc"
          ]
        }
      },
      "Outputs": {
        "DirectoryId": {
          "Value": {
            "Ref": "corpDirectory"
          }
        }
      }
    }
    "#);
}

#[test]
fn test_stack_matches_api_calls() {
    let (_dir, file) = write_stack(
        r#"
[parameters.Env]
type = "String"
allowed_values = ["prod", "dev"]
default = "dev"

[conditions]
IsProd = { "Fn::Equals" = [{ Ref = "Env" }, "prod"] }

[resources.Network]
type = "AWS::EC2::VPC"
deletion_policy = "Retain"
properties = { CidrBlock = "10.0.0.0/16", Tags = [{ Key = "Name", Value = "corp" }] }

[resources.Ipv6]
type = "AWS::EC2::VPCCidrBlock"
condition = "IsProd"
depends_on = ["Network"]

[resources.Ipv6.properties]
VpcId = { Ref = "Network" }
AmazonProvidedIpv6CidrBlock = true

[outputs.SecurityGroup]
value = { "Fn::GetAtt" = ["Network", "DefaultSecurityGroup"] }
export = { "Fn::Sub" = "${AWS::StackName}-sg" }
"#,
    );

    let registry = Registry::builtin();
    let mut template = Template::new();
    template
        .add_parameter(
            "Env",
            Parameter::string()
                .allowed_values(["prod", "dev"])
                .default_value("dev"),
        )
        .unwrap();
    template
        .add_condition("IsProd", Expression::equals(Value::reference("Env"), "prod"))
        .unwrap();
    template
        .add_resource(
            "Network",
            ResourceInstance::from_registry(registry, "AWS::EC2::VPC")
                .unwrap()
                .with("CidrBlock", "10.0.0.0/16")
                .unwrap()
                .with(
                    "Tags",
                    Value::list([Value::object([("Key", "Name"), ("Value", "corp")])]),
                )
                .unwrap(),
        )
        .unwrap()
        .set_deletion_policy(DeletionPolicy::Retain);
    template
        .add_resource(
            "Ipv6",
            ResourceInstance::from_registry(registry, "AWS::EC2::VPCCidrBlock")
                .unwrap()
                .with("VpcId", Value::reference("Network"))
                .unwrap()
                .with("AmazonProvidedIpv6CidrBlock", true)
                .unwrap(),
        )
        .unwrap()
        .set_condition("IsProd")
        .add_dependency("Network");
    template
        .add_output(
            "SecurityGroup",
            Output::new(Value::get_att("Network", "DefaultSecurityGroup"))
                .export(Expression::sub("${AWS::StackName}-sg")),
        )
        .unwrap();

    let expected = Serializer::new(registry).serialize_template(&template).unwrap();
    let rendered = file.render(registry).unwrap();
    assert_eq!(to_json_string(&rendered), to_json_string(&expected));
}

#[test]
fn test_stack_with_catalog() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("catalog.json"),
        r#"{
  "ResourceSpecificationVersion": "1.0.0",
  "PropertyTypes": {},
  "ResourceTypes": {
    "Test::Bucket": {
      "Properties": {
        "BucketName": { "PrimitiveType": "String", "Required": true, "UpdateType": "Immutable" }
      }
    }
  }
}"#,
    )
    .unwrap();
    let path = dir.path().join("stack.toml");
    fs::write(
        &path,
        "catalog = \"catalog.json\"\n\n[resources.Logs]\ntype = \"Test::Bucket\"\nproperties = { BucketName = \"logs\" }\n",
    )
    .unwrap();

    let file = StackToml::open(&path).unwrap();
    let registry = file.registry().unwrap();
    assert_eq!(registry.version(), Some("1.0.0"));

    let node = file.render(&registry).unwrap();
    insta::assert_snapshot!(to_json_string(&node), @r#"{"AWSTemplateFormatVersion":"2010-09-09","Resources":{"Logs":{"Type":"Test::Bucket","Properties":{"BucketName":"logs"}}}}"#);

    let err = file.render(Registry::builtin()).unwrap_err();
    assert!(matches!(
        *err,
        Error::Entry {
            section: "resources",
            source: humidifier_template::Error::UnknownType { .. },
            ..
        }
    ));
}

#[test]
fn test_wrong_property_type() {
    let (_dir, file) = write_stack(
        "[resources.Network]\ntype = \"AWS::EC2::VPC\"\nproperties = { CidrBlock = \"10.0.0.0/16\", EnableDnsSupport = \"yes\" }\n",
    );
    let err = file.render(Registry::builtin()).unwrap_err();
    match *err {
        Error::Render {
            source: humidifier_template::Error::TypeMismatch { expected, got },
        } => {
            assert_eq!(expected, "Boolean");
            assert_eq!(got, "String");
        }
        other => panic!("expected type mismatch, got {:?}", other),
    }
}
