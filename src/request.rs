use http::{HeaderMap, Method};
use std::collections::HashMap;

/// An incoming request, created once per accepted connection.
///
/// The `(base_url, path)` pair is progressively consumed as routers descend
/// into mounted sub-routers: `path` always holds the part of the target that
/// is still unmatched, `base_url` the prefix the innermost matching route
/// consumed. Handlers see the request read-only; only dispatch mutates it.
pub struct Request {
	method: Method,
	original_url: String,
	headers: HeaderMap,
	base_url: String,
	path: String,
	params: HashMap<String, String>,
}

impl Request {
	/// Build a request from its parsed parts. The initial remaining path is
	/// the target with any query string stripped.
	pub fn new(method: Method, target: impl Into<String>, headers: HeaderMap) -> Self {
		let original_url = target.into();
		let path = match original_url.split_once('?') {
			Some((path, _query)) => path.to_owned(),
			None => original_url.clone(),
		};

		Self {
			method,
			original_url,
			headers,
			base_url: String::new(),
			path,
			params: HashMap::new(),
		}
	}

	/// The HTTP method of the request.
	pub fn method(&self) -> &Method {
		&self.method
	}

	/// The original request target, untouched by routing.
	pub fn original_url(&self) -> &str {
		&self.original_url
	}

	/// The url prefix on which the innermost matching route was mounted.
	pub fn base_url(&self) -> &str {
		&self.base_url
	}

	/// The remaining, not yet consumed part of the path.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Named path parameters captured so far. A name, once captured, is
	/// never overwritten by a later route matching the same name.
	pub fn params(&self) -> &HashMap<String, String> {
		&self.params
	}

	/// A single named path parameter.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	/// Case-insensitive header lookup. Returns `None` for missing headers
	/// and for values that are not valid utf-8.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.headers.get(name).and_then(|value| value.to_str().ok())
	}

	/// All request headers.
	pub fn headers(&self) -> &HeaderMap {
		&self.headers
	}

	pub(crate) fn set_base_url(&mut self, base_url: &str) {
		self.base_url.clear();
		self.base_url.push_str(base_url);
	}

	pub(crate) fn set_path(&mut self, path: String) {
		self.path = path;
	}

	/// Insert a captured parameter, keeping any existing value. Returns
	/// whether the insertion took place.
	pub(crate) fn insert_param(&mut self, name: &str, value: &str) -> bool {
		use std::collections::hash_map::Entry;

		match self.params.entry(name.to_owned()) {
			Entry::Vacant(entry) => {
				entry.insert(value.to_owned());
				true
			}
			Entry::Occupied(_) => false,
		}
	}
}
