//! Definitions bundled with the crate.

use crate::{
    Mutability, PrimitiveType, PropertyDescriptor, PropertyKind, PropertyTypeDefinition, RegistryBuilder,
    ResourceDefinition,
};

const USER_GUIDE: &str = "http://docs.aws.amazon.com/AWSCloudFormation/latest/UserGuide";

/// Builder holding every bundled definition.
pub(crate) fn builder() -> RegistryBuilder {
    let mut builder = RegistryBuilder::new();
    for (resource, property_types) in [
        microsoft_ad(),
        vpc(),
        vpc_cidr_block(),
        subnet(),
        security_group(),
    ] {
        builder.add_resource(resource);
        for pt in property_types {
            builder.add_property_type(pt);
        }
    }
    builder
}

fn string(name: &str) -> PropertyDescriptor {
    PropertyDescriptor::primitive(name, PrimitiveType::String)
}

fn boolean(name: &str) -> PropertyDescriptor {
    PropertyDescriptor::primitive(name, PrimitiveType::Boolean)
}

fn integer(name: &str) -> PropertyDescriptor {
    PropertyDescriptor::primitive(name, PrimitiveType::Integer)
}

fn string_list(name: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(
        name,
        PropertyKind::list(PropertyKind::Primitive(PrimitiveType::String)),
    )
}

/// `Key`/`Value` pair, materialized per owning resource.
fn tag(owner: &str) -> PropertyTypeDefinition {
    let doc = |anchor: &str| format!("{}/aws-properties-resource-tags.html#cfn-resource-tags-{}", USER_GUIDE, anchor);
    PropertyTypeDefinition::new(format!("{}.Tag", owner))
        .property(string("Key").required().documentation(doc("key")))
        .property(string("Value").required().documentation(doc("value")))
        .documentation(format!("{}/aws-properties-resource-tags.html", USER_GUIDE))
}

fn tags(owner: &str) -> PropertyDescriptor {
    PropertyDescriptor::new(
        "Tags",
        PropertyKind::list(PropertyKind::complex(format!("{}.Tag", owner))),
    )
}

fn microsoft_ad() -> (ResourceDefinition, Vec<PropertyTypeDefinition>) {
    const TYPE: &str = "AWS::DirectoryService::MicrosoftAD";
    let page = format!("{}/aws-resource-directoryservice-microsoftad.html", USER_GUIDE);
    let doc = |anchor: &str| format!("{}#cfn-directoryservice-microsoftad-{}", page, anchor);

    let resource = ResourceDefinition::new(TYPE)
        .property(boolean("CreateAlias").immutable().documentation(doc("createalias")))
        .property(boolean("EnableSso").documentation(doc("enablesso")))
        .property(string("Name").required().immutable().documentation(doc("name")))
        .property(string("Password").required().immutable().documentation(doc("password")))
        .property(string("ShortName").immutable().documentation(doc("shortname")))
        .property(
            PropertyDescriptor::new("VpcSettings", PropertyKind::complex(format!("{}.VpcSettings", TYPE)))
                .required()
                .immutable()
                .documentation(doc("vpcsettings")),
        )
        .attribute("Alias")
        .attribute("DnsIpAddresses")
        .documentation(page.clone());

    let settings_page = format!(
        "{}/aws-properties-directoryservice-microsoftad-vpcsettings.html",
        USER_GUIDE
    );
    let settings_doc = |anchor: &str| {
        format!(
            "{}#cfn-directoryservice-microsoftad-vpcsettings-{}",
            settings_page, anchor
        )
    };
    let vpc_settings = PropertyTypeDefinition::new(format!("{}.VpcSettings", TYPE))
        .property(string_list("SubnetIds").required().documentation(settings_doc("subnetids")))
        .property(string("VpcId").required().documentation(settings_doc("vpcid")))
        .documentation(settings_page.clone());

    (resource, vec![vpc_settings])
}

fn vpc() -> (ResourceDefinition, Vec<PropertyTypeDefinition>) {
    const TYPE: &str = "AWS::EC2::VPC";
    let page = format!("{}/aws-resource-ec2-vpc.html", USER_GUIDE);
    let doc = |anchor: &str| format!("{}#cfn-aws-ec2-vpc-{}", page, anchor);

    let resource = ResourceDefinition::new(TYPE)
        .property(string("CidrBlock").required().immutable().documentation(doc("cidrblock")))
        .property(boolean("EnableDnsHostnames").documentation(doc("enablednshostnames")))
        .property(boolean("EnableDnsSupport").documentation(doc("enablednssupport")))
        .property(string("InstanceTenancy").documentation(doc("instancetenancy")))
        .property(tags(TYPE).documentation(doc("tags")))
        .attribute("CidrBlock")
        .attribute("CidrBlockAssociations")
        .attribute("DefaultNetworkAcl")
        .attribute("DefaultSecurityGroup")
        .attribute("Ipv6CidrBlocks")
        .documentation(page.clone());

    (resource, vec![tag(TYPE)])
}

fn vpc_cidr_block() -> (ResourceDefinition, Vec<PropertyTypeDefinition>) {
    let page = format!("{}/aws-resource-ec2-vpccidrblock.html", USER_GUIDE);
    let doc = |anchor: &str| format!("{}#cfn-ec2-vpccidrblock-{}", page, anchor);

    let resource = ResourceDefinition::new("AWS::EC2::VPCCidrBlock")
        .property(
            boolean("AmazonProvidedIpv6CidrBlock")
                .immutable()
                .documentation(doc("amazonprovidedipv6cidrblock")),
        )
        .property(string("VpcId").required().immutable().documentation(doc("vpcid")))
        .documentation(page.clone());

    (resource, Vec::new())
}

fn subnet() -> (ResourceDefinition, Vec<PropertyTypeDefinition>) {
    const TYPE: &str = "AWS::EC2::Subnet";
    let page = format!("{}/aws-resource-ec2-subnet.html", USER_GUIDE);
    let doc = |anchor: &str| format!("{}#cfn-ec2-subnet-{}", page, anchor);

    let resource = ResourceDefinition::new(TYPE)
        .property(string("AvailabilityZone").immutable().documentation(doc("availabilityzone")))
        .property(string("CidrBlock").required().immutable().documentation(doc("cidrblock")))
        .property(boolean("MapPublicIpOnLaunch").documentation(doc("mappubliciponlaunch")))
        .property(tags(TYPE).documentation(doc("tags")))
        .property(string("VpcId").required().immutable().documentation(doc("vpcid")))
        .attribute("AvailabilityZone")
        .attribute("Ipv6CidrBlocks")
        .attribute("NetworkAclAssociationId")
        .attribute("VpcId")
        .documentation(page.clone());

    (resource, vec![tag(TYPE)])
}

fn security_group() -> (ResourceDefinition, Vec<PropertyTypeDefinition>) {
    const TYPE: &str = "AWS::EC2::SecurityGroup";
    let page = format!("{}/aws-properties-ec2-security-group.html", USER_GUIDE);
    let doc = |anchor: &str| format!("{}#cfn-ec2-securitygroup-{}", page, anchor);

    let resource = ResourceDefinition::new(TYPE)
        .property(string("GroupDescription").required().immutable().documentation(doc("groupdescription")))
        .property(string("GroupName").immutable().documentation(doc("groupname")))
        .property(
            PropertyDescriptor::new(
                "SecurityGroupIngress",
                PropertyKind::list(PropertyKind::complex(format!("{}.Ingress", TYPE))),
            )
            .duplicates_allowed(false)
            .documentation(doc("securitygroupingress")),
        )
        .property(tags(TYPE).documentation(doc("tags")))
        .property(
            string("VpcId")
                .mutability(Mutability::Conditional)
                .documentation(doc("vpcid")),
        )
        .attribute("GroupId")
        .attribute("VpcId")
        .documentation(page.clone());

    let rule_page = format!("{}/aws-properties-ec2-security-group-rule-1.html", USER_GUIDE);
    let rule_doc = |anchor: &str| format!("{}#cfn-ec2-security-group-rule-{}", rule_page, anchor);
    let ingress = PropertyTypeDefinition::new(format!("{}.Ingress", TYPE))
        .property(string("CidrIp").documentation(rule_doc("cidrip")))
        .property(string("Description").documentation(rule_doc("description")))
        .property(integer("FromPort").documentation(rule_doc("fromport")))
        .property(string("IpProtocol").required().documentation(rule_doc("ipprotocol")))
        .property(string("SourceSecurityGroupId").documentation(rule_doc("sourcesecuritygroupid")))
        .property(integer("ToPort").documentation(rule_doc("toport")))
        .documentation(rule_page.clone());

    (resource, vec![ingress, tag(TYPE)])
}
