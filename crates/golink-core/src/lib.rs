//! # golink-core
//!
//! Routing for `go://` links. A link such as
//!
//! ```text
//! go://journal/20200627?title=Rust
//! ```
//!
//! is validated ([`request`]), dispatched by host name ([`router`]) to a
//! service handler ([`handlers`]), which finds the matching org header line
//! ([`locator`]) and opens the file in an editor ([`editor`]).
//!
//! ## Example
//!
//! ```no_run
//! use std::path::Path;
//! use std::rc::Rc;
//! use golink_core::{AppConfig, EditorInvoker, Router, validate};
//!
//! let config = AppConfig::for_home(Path::new("/home/user"));
//! let opener = Rc::new(EditorInvoker::new(config.editor.clone()));
//! let router = Router::with_defaults(&config, opener);
//!
//! let request = validate(&["go://journal/20200627?title=Rust"])?;
//! router.dispatch_request(&request)?;
//! # Ok::<(), golink_core::Error>(())
//! ```

pub mod config;
pub mod editor;
pub mod error;
pub mod handlers;
pub mod locator;
pub mod request;
pub mod router;

pub use config::{AppConfig, ConfigError};
pub use editor::{EditorError, EditorInvoker, FileOpener};
pub use error::{Error, Result};
pub use handlers::ServiceHandler;
pub use locator::{LocateError, find_header_line};
pub use request::{Query, Request, SCHEME, UriError, validate, validate_with_scheme};
pub use router::Router;
