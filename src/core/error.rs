//! TL-000: Error type shared by resolution, scaffolding and generation.

use std::path::PathBuf;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a trellis operation.
///
/// Generation skips are not errors; they are reported through
/// [`crate::generator::GenerationOutcome`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Entity kind outside instance/site/resource/package/project.
    #[error("entity type {0} not known")]
    UnknownEntityType(String),

    /// Entity name that is not a single plain path component.
    #[error("invalid {kind} name '{name}': must be a single folder name")]
    InvalidName { kind: String, name: String },

    /// No configured root or project folder contains the entity.
    #[error("{kind} {name} not found")]
    EntityNotFound { kind: String, name: String },

    /// Filesystem failure while reading or writing `path`.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Environment or schema file could not be parsed.
    #[error("cannot parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// Inline YAML could not be parsed.
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// Package missing from the schema description.
    #[error("package {0} not found in schema")]
    UnknownPackage(String),

    /// Table missing from a package of the schema description.
    #[error("table {package}.{table} not found in schema")]
    UnknownTable { package: String, table: String },

    /// Report serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A `{{key}}` placeholder could not be rendered.
    #[error("template error: {0}")]
    Template(String),
}

impl Error {
    /// Wrap an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
