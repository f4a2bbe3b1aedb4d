// crates/golink-core/src/router.rs - Service name to handler registry
//
// The router is built once by the driver, filled with `register`, and then
// only read. It is an ordinary owned value passed by reference to whoever
// dispatches; there is no global registry.

use std::rc::Rc;

use indexmap::IndexMap;

use crate::config::AppConfig;
use crate::editor::FileOpener;
use crate::error::{Error, Result};
use crate::handlers::{BookHandler, JournalHandler, ServiceHandler};
use crate::request::{Query, Request};

/// Maps service names to their handlers
#[derive(Default)]
pub struct Router {
    handlers: IndexMap<String, Box<dyn ServiceHandler>>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router with the `journal` and `book` services from `config`
    pub fn with_defaults(config: &AppConfig, opener: Rc<dyn FileOpener>) -> Self {
        let mut router = Self::new();
        router.register(
            "journal",
            JournalHandler::new(config.journal.clone(), Rc::clone(&opener)),
        );
        router.register("book", BookHandler::new(config.book.clone(), opener));
        router
    }

    /// Register `handler` under `name`, replacing any earlier registration
    pub fn register<H>(&mut self, name: impl Into<String>, handler: H)
    where
        H: ServiceHandler + 'static,
    {
        self.handlers.insert(name.into(), Box::new(handler));
    }

    /// Forward to the handler registered under `name`
    ///
    /// Lookup is an exact string match on the service name, so
    /// `journal:8080` or `Journal` do not reach the journal handler.
    ///
    /// ERROR HANDLING:
    /// - `UnknownService` names the requested service and lists the
    ///   registered ones, in registration order
    /// - Whatever the handler returns is passed back unchanged; header
    ///   lookups are already recovered inside the handlers, so an error here
    ///   means the editor itself failed
    pub fn dispatch(&self, name: &str, path: &str, query: &Query) -> Result<()> {
        let handler = self.handlers.get(name).ok_or_else(|| Error::UnknownService {
            name: name.to_string(),
            known: self.services().map(str::to_string).collect(),
        })?;
        handler.handle(path, query)
    }

    pub fn dispatch_request(&self, request: &Request) -> Result<()> {
        self.dispatch(request.service(), request.path(), request.query())
    }

    /// Registered names in registration order
    pub fn services(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}
