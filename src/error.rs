use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the massing pipeline.
#[derive(Debug, Error)]
pub enum MassingError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Topology(#[from] TopologyError),

    #[error(transparent)]
    Operation(#[from] OperationError),

    #[error(transparent)]
    Tessellation(#[from] TessellationError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Errors raised while reading the footprint and camera tables.
///
/// All of these are fatal: they abort the run before any geometry is built.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to open {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed csv: {0}")]
    Csv(#[from] csv::Error),

    #[error("{file} is missing required column `{column}`")]
    MissingColumn { file: String, column: &'static str },
}

/// Errors raised while loading a pipeline configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors related to topological operations.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("wire is not closed")]
    WireNotClosed,

    #[error("invalid topology: {0}")]
    InvalidTopology(String),
}

/// Errors related to modelling operations.
#[derive(Debug, Error)]
pub enum OperationError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("operation failed: {0}")]
    Failed(String),
}

/// Errors related to tessellation.
#[derive(Debug, Error)]
pub enum TessellationError {
    #[error("tessellation failed: {0}")]
    Failed(String),
}

/// Errors raised by a scene backend or the render batch.
///
/// A render error aborts the remaining batch.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid render settings: {0}")]
    InvalidSettings(String),

    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode {}: {source}", path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("render backend failed: {0}")]
    Backend(String),
}

/// Convenience type alias for results using [`MassingError`].
pub type Result<T> = std::result::Result<T, MassingError>;
