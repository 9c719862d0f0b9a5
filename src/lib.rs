//! An Express-style HTTP router and middleware engine built on hyper.
//!
//! ```no_run
//! use mortar::{Request, Response, Router};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//! 	let app = Router::new();
//!
//! 	app.get("/", |_req: &Request, resp: &Response| {
//! 		resp.send("Hello World!");
//! 	});
//!
//! 	// Default handler when no route matched.
//! 	app.middleware(|_req: &Request, resp: &Response| {
//! 		resp.status(404).end();
//! 	});
//!
//! 	mortar::serve(app, ([127, 0, 0, 1], 3000).into()).await
//! }
//! ```
//!
//! Routes are matched in registration order against the *remaining* path of
//! the request: `mount` routes (registered with [`Router::mount`] or
//! [`Router::middleware`]) consume a matched prefix and descend, everything
//! else must match the remaining path exactly. Segments like `:id` capture
//! into [`Request::params`]. Handlers come in three shapes: plain
//! `(req, resp)` closures, continuation-aware `(req, resp, next)` closures
//! and nested [`Router`]s; continuation-aware handlers signal completion
//! through the shared [`Next`] token, which also carries errors to the
//! nearest error-handler chain and up through enclosing routers.

mod error;
mod next;
mod path;
mod request;
mod response;

/// Static file serving as a plain continuation-aware handler.
pub mod files;

/// Filename-extension to content-type lookup.
pub mod mime;

/// Routes, match disciplines and the polymorphic handler variant.
pub mod route;

/// The core dispatch and error-escalation engine.
pub mod router;

#[cfg(feature = "http")]
mod server;

pub use error::Error;
pub use files::{StaticFiles, StaticFilesOptions};
pub use next::Next;
pub use path::PathPattern;
pub use request::Request;
pub use response::{Outgoing, Response, Transport};
pub use route::{Handler, IntoHandler, Route, RouteKind};
pub use router::Router;

#[cfg(feature = "http")]
pub use server::serve;
