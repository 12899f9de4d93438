use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Result type for humidifier-manifest operations (boxed to reduce size on stack)
pub type Result<T> = std::result::Result<T, Box<Error>>;

/// Source context for error reporting.
///
/// Encapsulates the manifest content and filename, reducing parameter
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

    /// Create a parse error from a toml error.
    pub fn parse_error(&self, source: toml::de::Error) -> Box<Error> {
        let span = source.span().map(SourceSpan::from);
        Box::new(Error::Parse {
            src: self.named_source(),
            span,
            source,
        })
    }

    /// Wrap a template error raised while building an entry of a section.
    pub fn entry_error(
        &self,
        section: &'static str,
        logical_id: &str,
        source: impl Into<Box<humidifier_template::Error>>,
    ) -> Box<Error> {
        Box::new(Error::Entry {
            src: self.named_source(),
            span: self.find_entry_span(section, logical_id),
            section,
            logical_id: logical_id.to_string(),
            source: *source.into(),
        })
    }

    /// Create a render error.
    pub fn render_error(&self, source: Box<humidifier_template::Error>) -> Box<Error> {
        Box::new(Error::Render { source: *source })
    }

    /// Find the span of a logical ID in the manifest source.
    ///
    /// Looks for `[section.id]`, `[section.id.*]` and `id = ` inside an
    /// inline `section` table, in that order.
    pub fn find_entry_span(&self, section: &str, logical_id: &str) -> Option<SourceSpan> {
        let headers = [
            format!("[{}.{}]", section, logical_id),
            format!("[{}.{}.", section, logical_id),
        ];
        for header in &headers {
            if let Some(pos) = self.src.find(header.as_str()) {
                let start = pos + section.len() + 2;
                return Some(SourceSpan::from((start, logical_id.len())));
            }
        }

        let assignment = format!("{} =", logical_id);
        self.src
            .find(&assignment)
            .map(|pos| SourceSpan::from((pos, logical_id.len())))
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum Error {
    #[error("failed to read '{path}'")]
    #[diagnostic(
        code(humidifier::io),
        help("pass the path of a stack manifest, e.g. `humidifier render stack.toml`")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse stack manifest")]
    #[diagnostic(code(humidifier::manifest::parse_error))]
    Parse {
        #[source_code]
        src: NamedSource<String>,
        #[label("parse error here")]
        span: Option<SourceSpan>,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid entry '{logical_id}' in {section}")]
    #[diagnostic(code(humidifier::manifest::invalid_entry))]
    Entry {
        #[source_code]
        src: NamedSource<String>,
        #[label("defined here")]
        span: Option<SourceSpan>,
        section: &'static str,
        logical_id: String,
        #[source]
        #[diagnostic_source]
        source: humidifier_template::Error,
    },

    #[error("failed to load catalog '{path}'")]
    #[diagnostic(code(humidifier::manifest::catalog_error))]
    Catalog {
        path: PathBuf,
        #[source]
        #[diagnostic_source]
        source: humidifier_schema::Error,
    },

    #[error("failed to render template")]
    #[diagnostic(code(humidifier::manifest::render_error))]
    Render {
        #[source]
        #[diagnostic_source]
        source: humidifier_template::Error,
    },
}
