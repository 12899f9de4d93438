use miette::Diagnostic;
use thiserror::Error;

/// Result type for humidifier-template operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("type mismatch: expected {expected}, got {got}")]
    #[diagnostic(code(humidifier::type_mismatch))]
    TypeMismatch { expected: String, got: String },

    #[error("'{resource_type}' is missing required property '{property}'")]
    #[diagnostic(code(humidifier::missing_required_property))]
    MissingRequiredProperty {
        resource_type: String,
        property: String,
    },

    #[error("unknown type '{name}'")]
    #[diagnostic(
        code(humidifier::unknown_type),
        help("check the type name against `humidifier list`")
    )]
    UnknownType { name: String },

    #[error("'{type_name}' has no property '{property}'")]
    #[diagnostic(
        code(humidifier::unknown_property),
        help("run `humidifier explain {type_name}` to see the declared properties")
    )]
    UnknownProperty { type_name: String, property: String },

    #[error("'{type_name}' has no attribute '{attribute}'")]
    #[diagnostic(code(humidifier::unknown_attribute))]
    UnknownAttribute {
        type_name: String,
        attribute: String,
    },

    #[error("no resource or parameter named '{logical_id}'")]
    #[diagnostic(code(humidifier::unknown_logical_id))]
    UnknownLogicalId { logical_id: String },

    #[error("logical ID '{logical_id}' is already used in {section}")]
    #[diagnostic(code(humidifier::duplicate_logical_id))]
    DuplicateLogicalId {
        logical_id: String,
        section: &'static str,
    },

    #[error("invalid logical ID '{logical_id}'")]
    #[diagnostic(
        code(humidifier::invalid_logical_id),
        help("logical IDs are non-empty and contain only ASCII letters and digits")
    )]
    InvalidLogicalId { logical_id: String },
}

impl Error {
    pub fn type_mismatch(expected: impl Into<String>, got: impl Into<String>) -> Box<Self> {
        Box::new(Error::TypeMismatch {
            expected: expected.into(),
            got: got.into(),
        })
    }

    pub fn missing_required(
        resource_type: impl Into<String>,
        property: impl Into<String>,
    ) -> Box<Self> {
        Box::new(Error::MissingRequiredProperty {
            resource_type: resource_type.into(),
            property: property.into(),
        })
    }

    pub fn unknown_type(name: impl Into<String>) -> Box<Self> {
        Box::new(Error::UnknownType { name: name.into() })
    }

    pub fn unknown_property(type_name: impl Into<String>, property: impl Into<String>) -> Box<Self> {
        Box::new(Error::UnknownProperty {
            type_name: type_name.into(),
            property: property.into(),
        })
    }
}

impl From<humidifier_ir::TypeMismatch> for Box<Error> {
    fn from(e: humidifier_ir::TypeMismatch) -> Self {
        Error::type_mismatch(e.expected, e.got)
    }
}
