use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceOffset, SourceSpan};
use thiserror::Error;

/// Result type for humidifier-schema operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for catalog error reporting.
///
/// Encapsulates the catalog content and filename, reducing parameter
/// passing in error factory functions.
#[derive(Debug, Clone)]
pub struct SourceContext {
    src: String,
    filename: String,
}

impl SourceContext {
    /// Create a new source context.
    pub fn new(src: impl Into<String>, filename: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            filename: filename.into(),
        }
    }

    /// Get the source content.
    pub fn src(&self) -> &str {
        &self.src
    }

    /// Get the filename.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Create a NamedSource for miette error reporting.
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.filename, self.src.clone())
    }

    /// Create a parse error from a JSON error.
    ///
    /// serde_json reports 1-based line and column; line 0 means no position.
    pub fn parse_error(&self, source: serde_json::Error) -> Box<Error> {
        let span = (source.line() > 0).then(|| {
            let offset = SourceOffset::from_location(&self.src, source.line(), source.column());
            SourceSpan::new(offset, 0)
        });
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Find the span of a quoted key in the catalog source.
    pub fn find_key_span(&self, key: &str) -> Option<SourceSpan> {
        let quoted = format!("\"{}\"", key);
        self.src
            .find(&quoted)
            .map(|pos| SourceSpan::from((pos + 1, key.len())))
    }

    /// Create an invalid kind error pointing at the property key.
    pub fn invalid_kind_error(
        &self,
        owner: impl Into<String>,
        property: impl Into<String>,
        reason: impl Into<String>,
    ) -> Box<Error> {
        let property = property.into();
        Box::new(Error::InvalidKind {
            src: self.named_source(),
            span: self.find_key_span(&property),
            owner: owner.into(),
            property,
            reason: reason.into(),
        })
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(code(humidifier::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse resource catalog")]
    #[diagnostic(code(humidifier::catalog::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: serde_json::Error,
    },

    #[error("unknown type '{name}'")]
    #[diagnostic(
        code(humidifier::unknown_type),
        help("check the type name against `humidifier list`")
    )]
    UnknownType { name: String },

    #[error("type '{name}' is registered more than once")]
    #[diagnostic(code(humidifier::duplicate_type))]
    DuplicateType { name: String },

    #[error("property '{property}' is declared more than once on '{owner}'")]
    #[diagnostic(code(humidifier::duplicate_property))]
    DuplicateProperty { owner: String, property: String },

    #[error("property type '{name}' is not owned by a registered resource type")]
    #[diagnostic(
        code(humidifier::orphan_property_type),
        help("property types are named '<ResourceType>.<Name>' and registered with their resource")
    )]
    OrphanPropertyType { name: String },

    #[error("property types form a cycle: {cycle}")]
    #[diagnostic(code(humidifier::cyclic_property_type))]
    CyclicPropertyType { cycle: String },

    #[error("invalid kind for property '{property}' of '{owner}'")]
    #[diagnostic(code(humidifier::invalid_kind), help("{reason}"))]
    InvalidKind {
        #[source_code]
        src: NamedSource<String>,
        #[label("{reason}")]
        span: Option<SourceSpan>,
        owner: String,
        property: String,
        reason: String,
    },
}

impl Error {
    /// Create an unknown type error
    pub fn unknown_type(name: impl Into<String>) -> Box<Self> {
        Box::new(Error::UnknownType { name: name.into() })
    }
}
