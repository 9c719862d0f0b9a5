//! Static file serving, modeled as an ordinary continuation-aware handler:
//! it either terminates the response with file content or calls the token
//! to fall through to later routes. The router knows nothing about it.

use crate::{mime, Error, Handler, IntoHandler, Next, Request, Response};
use http::{header, Method};
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Options for [`StaticFiles`].
pub struct StaticFilesOptions {
	/// Directory index file sent for directory paths. `None` disables
	/// directory indexing.
	pub index: Option<String>,
	/// Hook for setting headers before a file is sent. Defaults to setting
	/// `Content-Type` from the [`mime`] table.
	pub set_headers: Box<dyn Fn(&Response, &Path) + Send + Sync>,
}

impl Default for StaticFilesOptions {
	fn default() -> Self {
		Self {
			index: Some("index.html".to_owned()),
			set_headers: Box::new(|resp, path| {
				resp.set(header::CONTENT_TYPE.as_str(), mime::resolve(path));
			}),
		}
	}
}

/// Serves `GET` requests from a directory root, falling through to later
/// routes when the method does not match or no file is found.
pub struct StaticFiles {
	root: PathBuf,
	options: StaticFilesOptions,
}

impl StaticFiles {
	pub fn new(root: impl Into<PathBuf>) -> Self {
		Self::with_options(root, StaticFilesOptions::default())
	}

	pub fn with_options(root: impl Into<PathBuf>, options: StaticFilesOptions) -> Self {
		Self {
			root: root.into(),
			options,
		}
	}

	fn call(&self, req: &Request, resp: &Response, next: &Next) {
		if *req.method() != Method::GET {
			next.proceed();
			return;
		}

		let relative = match sanitize(req.path()) {
			Some(relative) => relative,
			None => {
				debug!(path = %req.path(), "rejecting traversal outside the root");
				next.proceed();
				return;
			}
		};

		let mut file = self.root.join(relative);
		if file.is_dir() {
			match &self.options.index {
				Some(index) => file.push(index),
				None => {
					next.proceed();
					return;
				}
			}
		}

		if !file.is_file() {
			next.proceed();
			return;
		}

		(self.options.set_headers)(resp, &file);
		if let Err(err) = resp.send_file(&file) {
			next.fail(Error::new(err));
		}
	}
}

impl IntoHandler<StaticFiles> for StaticFiles {
	fn into_handler(self) -> Handler {
		Handler::WithNext(Box::new(move |req: &Request, resp: &Response, next: &Next| {
			self.call(req, resp, next)
		}))
	}
}

/// Re-root the remaining request path, refusing anything that would escape.
fn sanitize(path: &str) -> Option<PathBuf> {
	let mut clean = PathBuf::new();
	for component in Path::new(path.trim_start_matches('/')).components() {
		match component {
			Component::Normal(part) => clean.push(part),
			Component::CurDir => {}
			_ => return None,
		}
	}
	Some(clean)
}
