// crates/golink-core/src/error.rs - Umbrella error for dispatch
//
// Each module owns a narrow error enum (UriError, LocateError, EditorError,
// ConfigError). This type is what handlers and the router return, so a
// caller sees one Result type from `dispatch` no matter which stage failed.
// LocateError never reaches it (handlers recover lookups) and ConfigError is
// a startup concern of the binary, so neither has a variant here.
//
// PROPAGATION:
// - Module errors convert with `?` through `#[from]`, nothing else is added
// - Handler errors pass through the router untouched
// - Only the binary decides what is fatal and how it is reported

use thiserror::Error;

use crate::editor::EditorError;
use crate::request::UriError;

/// Errors surfaced by routing and service handlers
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Uri(#[from] UriError),

    #[error("{name:?} is unknown service (registered: {})", known.join(", "))]
    UnknownService { name: String, known: Vec<String> },

    #[error(transparent)]
    Editor(#[from] EditorError),
}

/// Result type for dispatch operations
pub type Result<T> = std::result::Result<T, Error>;
