use crate::{Error, Handler, IntoHandler, Next, Request, Response, Route, RouteKind};
use http::Method;
use std::{
	collections::HashMap,
	sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::debug;

/// An error handler: receives the carried error and the continuation.
pub type ErrorFn = dyn Fn(&Error, &Request, &Response, &Next) + Send + Sync;

/// A param handler: called once per request the first time its named path
/// parameter is captured, with the captured value.
pub type ParamFn = dyn Fn(&Request, &Response, &Next, &str) + Send + Sync;

#[derive(Default)]
struct RouterInner {
	routes: RwLock<Vec<Route>>,
	errors: RwLock<Vec<Box<ErrorFn>>>,
	params: RwLock<HashMap<String, Box<ParamFn>>>,
}

/// An ordered list of routes, an ordered list of error handlers and a map of
/// param handlers, with the dispatch and error-escalation algorithm.
///
/// A `Router` is a cheap cloneable handle: mounting a clone at several
/// points shares one underlying route list. All registration must complete
/// before the first concurrent dispatch begins; registering routes while a
/// dispatch is in flight is not supported.
#[derive(Clone, Default)]
pub struct Router {
	inner: Arc<RouterInner>,
}

impl Router {
	pub fn new() -> Self {
		Self::default()
	}

	fn add(&self, kind: RouteKind, verb: Option<Method>, path: &str, handler: Handler) -> &Self {
		write(&self.inner.routes).push(Route::new(kind, verb, path, handler));
		self
	}

	/// Mount a handler on a leading path: matches every method and any path
	/// sharing the prefix. The matched prefix is consumed before the handler
	/// (typically a nested `Router`) sees the request.
	pub fn mount<M>(&self, path: &str, handler: impl IntoHandler<M>) -> &Self {
		self.add(RouteKind::Mount, None, path, handler.into_handler())
	}

	/// Mount a handler on `/`, matching every request. The express
	/// pathless `use`.
	pub fn middleware<M>(&self, handler: impl IntoHandler<M>) -> &Self {
		self.mount("/", handler)
	}

	/// Match every method, but require the path to match exactly.
	pub fn all<M>(&self, path: &str, handler: impl IntoHandler<M>) -> &Self {
		self.add(RouteKind::Exact, None, path, handler.into_handler())
	}

	/// Match `GET` requests on an exact path.
	pub fn get<M>(&self, path: &str, handler: impl IntoHandler<M>) -> &Self {
		self.add(RouteKind::Method, Some(Method::GET), path, handler.into_handler())
	}

	/// Match `PUT` requests on an exact path.
	pub fn put<M>(&self, path: &str, handler: impl IntoHandler<M>) -> &Self {
		self.add(RouteKind::Method, Some(Method::PUT), path, handler.into_handler())
	}

	/// Match `POST` requests on an exact path.
	pub fn post<M>(&self, path: &str, handler: impl IntoHandler<M>) -> &Self {
		self.add(RouteKind::Method, Some(Method::POST), path, handler.into_handler())
	}

	/// Match `DELETE` requests on an exact path.
	pub fn delete<M>(&self, path: &str, handler: impl IntoHandler<M>) -> &Self {
		self.add(RouteKind::Method, Some(Method::DELETE), path, handler.into_handler())
	}

	/// Register a handler fired the first time the named path parameter is
	/// captured for a request.
	pub fn param<F>(&self, name: &str, handler: F) -> &Self
	where
		F: Fn(&Request, &Response, &Next, &str) + Send + Sync + 'static,
	{
		write(&self.inner.params).insert(name.to_owned(), Box::new(handler));
		self
	}

	/// Register an error handler, consulted in registration order whenever a
	/// handler in this router signals or raises an error.
	pub fn on_error<F>(&self, handler: F) -> &Self
	where
		F: Fn(&Error, &Request, &Response, &Next) + Send + Sync + 'static,
	{
		write(&self.inner.errors).push(Box::new(handler));
		self
	}

	/// Run the request through this router's routes in registration order.
	///
	/// Every matching route consumes its matched prefix from `req` and is
	/// invoked under the [`Next::guarded`] discipline: a handler that does
	/// not signal continuation ends dispatch, a carried error is routed to
	/// this router's own error handlers, and dispatch falls through silently
	/// once the route list is exhausted. Errors left carried by a nested
	/// router are picked up here after the nested dispatch returns, which is
	/// the sole escalation mechanism.
	pub fn dispatch(&self, req: &mut Request, resp: &Response, next: &Next) {
		let routes = read(&self.inner.routes);

		for route in routes.iter() {
			let matched = match route.matches(req) {
				Some(matched) => matched,
				None => continue,
			};

			let prefix = req.path()[..matched].to_owned();
			debug!(method = %req.method(), path = %req.path(), prefix = %prefix, "route matched");

			// Descend: shrink the remaining path by the consumed prefix. A
			// one-byte match is the bare `/` mount and consumes nothing.
			req.set_base_url(&prefix);
			if matched > 1 {
				let remainder = req.path()[matched..].to_owned();
				req.set_path(if remainder.is_empty() {
					"/".to_owned()
				} else {
					remainder
				});
			}

			for (name, value) in route.pattern().extract(&prefix) {
				if !req.insert_param(&name, &value) {
					continue;
				}

				let params = read(&self.inner.params);
				if let Some(handler) = params.get(&name) {
					if !next.guarded(|| handler(&*req, resp, next, &value)) {
						return;
					}
					if next.err().is_some() {
						self.handle_error(req, resp, next);
						return;
					}
				}
			}

			if !next.guarded(|| route.handler().invoke(req, resp, next)) {
				return;
			}
			if next.err().is_some() {
				self.handle_error(req, resp, next);
				return;
			}
		}
	}

	/// Walk this router's own error handlers in registration order. Each
	/// handler sees the currently carried error and may replace it via
	/// [`Next::fail`] or leave it for an enclosing router by continuing
	/// without clearing it.
	fn handle_error(&self, req: &Request, resp: &Response, next: &Next) {
		let errors = read(&self.inner.errors);
		debug!(handlers = errors.len(), "dispatch carried an error");

		for handler in errors.iter() {
			let err = match next.err() {
				Some(err) => err,
				None => break,
			};
			if !next.guarded(|| handler(&err, req, resp, next)) {
				break;
			}
		}
	}
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
	lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
	lock.write().unwrap_or_else(PoisonError::into_inner)
}
