//! End-to-end runs of the humidifier binary.

use std::{fs, path::Path, process::Command};

use tempfile::TempDir;

fn humidifier(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_humidifier"))
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_render_default_stack() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("stack.toml"),
        "[resources.Net]\ntype = \"AWS::EC2::VPC\"\nproperties = { CidrBlock = \"10.0.0.0/16\" }\n",
    )
    .unwrap();

    let output = humidifier(dir.path(), &["render", "--compact"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap(),
        "{\"AWSTemplateFormatVersion\":\"2010-09-09\",\"Resources\":{\"Net\":{\"Type\":\"AWS::EC2::VPC\",\"Properties\":{\"CidrBlock\":\"10.0.0.0/16\"}}}}\n"
    );
}

#[test]
fn test_render_to_file() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("network.toml"),
        "description = \"Network\"\n\n[resources.Net]\ntype = \"AWS::EC2::VPC\"\nproperties = { CidrBlock = \"10.0.0.0/16\" }\n",
    )
    .unwrap();

    let output = humidifier(dir.path(), &["render", "network.toml", "-o", "template.json"]);
    assert!(output.status.success());

    let written = fs::read_to_string(dir.path().join("template.json")).unwrap();
    assert!(written.starts_with("{\n  \"AWSTemplateFormatVersion\": \"2010-09-09\""));
    assert!(written.contains("\"Description\": \"Network\""));
}

#[test]
fn test_render_missing_required_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("stack.toml"),
        "[resources.Ad]\ntype = \"AWS::DirectoryService::MicrosoftAD\"\n",
    )
    .unwrap();

    let output = humidifier(dir.path(), &["render"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("humidifier::manifest::render_error"), "{stderr}");
}

#[test]
fn test_check_catalog() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("catalog.json"),
        r#"{"ResourceSpecificationVersion":"2.1.0","ResourceTypes":{"Test::Bucket":{"Properties":{"Name":{"PrimitiveType":"String"}}}}}"#,
    )
    .unwrap();

    let output = humidifier(dir.path(), &["check", "--catalog", "catalog.json"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("catalog.json is valid"));
    assert!(stdout.contains("Version: 2.1.0"));
    assert!(stdout.contains("Resource types: 1"));
}

#[test]
fn test_explain_unknown_type_fails() {
    let dir = TempDir::new().unwrap();
    let output = humidifier(dir.path(), &["explain", "AWS::S3::Bucket"]);
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn test_list_builtin() {
    let dir = TempDir::new().unwrap();
    let output = humidifier(dir.path(), &["list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("AWS::EC2::SecurityGroup"));
}
