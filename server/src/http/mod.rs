//! HTTP boundary: a thin adapter from requests to [`crate::service`] calls.
//!
//! - server: listener and per-connection tasks
//! - router: path matching and dispatch to the right service
//! - handlers: the verb → CRUD operation mapping shared by all resources
//! - response: status codes and JSON bodies

mod handlers;
mod response;
mod router;
mod server;

pub use router::Router;
pub use server::Server;
