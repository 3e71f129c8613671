//! Code generation errors.

use std::path::PathBuf;

/// Errors raised while discovering or generating actions.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// Two files map to the same route name or generated identifier.
    #[error("duplicate action `{name}`: {} and {}", first.display(), second.display())]
    DuplicateAction {
        /// The colliding route name or identifier.
        name: String,
        /// File registered first.
        first: PathBuf,
        /// File that collided with it.
        second: PathBuf,
    },

    /// An action file does not define `pub fn action()`.
    #[error("{} does not define `pub fn action() -> Action<..>`", path.display())]
    MissingFactory {
        /// The offending file.
        path: PathBuf,
    },

    /// The factory exists but cannot be referenced from generated code.
    #[error("unsupported factory in {}: {reason}", path.display())]
    UnsupportedFactory {
        /// The offending file.
        path: PathBuf,
        /// What is wrong with it.
        reason: String,
    },

    /// An action name does not produce a valid Rust identifier.
    #[error("action `{name}` does not map to a valid identifier (got `{ident}`)")]
    InvalidIdentifier {
        /// Route name of the action.
        name: String,
        /// The identifier that was derived from it.
        ident: String,
    },

    /// An action file could not be parsed as Rust.
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// Parser error.
        #[source]
        source: syn::Error,
    },

    /// Filesystem failure.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Directory traversal failure.
    #[error("failed to walk actions directory: {0}")]
    Walk(#[from] walkdir::Error),
}

impl CodegenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias for code generation.
pub type CodegenResult<T> = Result<T, CodegenError>;
