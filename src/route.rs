use crate::{Next, PathPattern, Request, Response, Router};
use http::Method;

/// A plain handler: receives the request and response, no continuation.
pub type PlainFn = dyn Fn(&Request, &Response) + Send + Sync;

/// A continuation-aware handler: responsible for eventually calling the
/// [`Next`] token (possibly from another task).
pub type NextFn = dyn Fn(&Request, &Response, &Next) + Send + Sync;

/// The three shapes a route can dispatch into.
pub enum Handler {
	Plain(Box<PlainFn>),
	WithNext(Box<NextFn>),
	Router(Router),
}

impl Handler {
	pub(crate) fn invoke(&self, req: &mut Request, resp: &Response, next: &Next) {
		match self {
			Self::Plain(handler) => handler(&*req, resp),
			Self::WithNext(handler) => handler(&*req, resp, next),
			Self::Router(router) => router.dispatch(req, resp, next),
		}
	}
}

/// Conversion into a [`Handler`], parameterised over a marker type so that
/// both closure arities, nested routers and prebuilt handlers can be passed
/// to the same registration methods.
pub trait IntoHandler<M> {
	fn into_handler(self) -> Handler;
}

impl<F> IntoHandler<fn(&Request, &Response)> for F
where
	F: Fn(&Request, &Response) + Send + Sync + 'static,
{
	fn into_handler(self) -> Handler {
		Handler::Plain(Box::new(self))
	}
}

impl<F> IntoHandler<fn(&Request, &Response, &Next)> for F
where
	F: Fn(&Request, &Response, &Next) + Send + Sync + 'static,
{
	fn into_handler(self) -> Handler {
		Handler::WithNext(Box::new(self))
	}
}

impl IntoHandler<Router> for Router {
	fn into_handler(self) -> Handler {
		Handler::Router(self)
	}
}

impl IntoHandler<Handler> for Handler {
	fn into_handler(self) -> Handler {
		self
	}
}

/// The match discipline of a registered route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
	/// Matches a path prefix, consuming only the matched part before
	/// descending into the handler.
	Mount,
	/// Requires the pattern to consume the entire remaining path.
	Exact,
	/// Like [`RouteKind::Exact`], additionally restricted to one verb.
	Method,
}

/// A registered route: a match discipline, an optional verb, a compiled
/// pattern and a handler. Routes are matched in registration order.
pub struct Route {
	kind: RouteKind,
	verb: Option<Method>,
	pattern: PathPattern,
	handler: Handler,
}

impl Route {
	pub(crate) fn new(kind: RouteKind, verb: Option<Method>, path: &str, handler: Handler) -> Self {
		Self {
			kind,
			verb,
			pattern: PathPattern::new(path),
			handler,
		}
	}

	pub fn kind(&self) -> RouteKind {
		self.kind
	}

	pub fn pattern(&self) -> &PathPattern {
		&self.pattern
	}

	pub(crate) fn handler(&self) -> &Handler {
		&self.handler
	}

	/// Match against the *remaining* path of the request. Returns the
	/// matched prefix length, used both to decide a hit and to compute the
	/// consumed path for descent.
	pub fn matches(&self, req: &Request) -> Option<usize> {
		if self.kind == RouteKind::Method && self.verb.as_ref() != Some(req.method()) {
			return None;
		}

		let matched = self.pattern.match_len(req.path())?;
		if self.kind != RouteKind::Mount && matched != req.path().len() {
			// Non-mount routes must consume the whole remaining path.
			return None;
		}

		Some(matched)
	}
}
