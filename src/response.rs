use http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use std::{
	path::Path,
	sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tracing::warn;

/// The finalized form of a response, handed to the transport on send.
#[derive(Debug)]
pub struct Outgoing {
	pub status: StatusCode,
	pub headers: HeaderMap,
	pub body: Vec<u8>,
}

/// The opaque connection handle: a one-shot sink that transmits the
/// finalized response back over whatever accepted the request.
pub type Transport = Box<dyn FnOnce(Outgoing) + Send>;

struct Inner {
	status: Option<StatusCode>,
	headers: HeaderMap,
	body: Vec<u8>,
	sent: bool,
	transport: Option<Transport>,
}

/// The outgoing side of a request, created alongside the [`Request`].
///
/// A cheap cloneable handle; a handler that completes asynchronously keeps a
/// clone and sends later. There is one logical response per request and
/// sending twice is a caller error: the second send is a no-op on the wire.
///
/// [`Request`]: crate::Request
#[derive(Clone)]
pub struct Response {
	inner: Arc<Mutex<Inner>>,
}

impl Response {
	/// Create a response writing to the given transport sink.
	pub fn new(transport: impl FnOnce(Outgoing) + Send + 'static) -> Self {
		Self {
			inner: Arc::new(Mutex::new(Inner {
				status: None,
				headers: HeaderMap::new(),
				body: Vec::new(),
				sent: false,
				transport: Some(Box::new(transport)),
			})),
		}
	}

	/// Set the HTTP status for the response. Left unset, it defaults to
	/// `200 OK` at send time.
	pub fn status(&self, code: u16) -> &Self {
		match StatusCode::from_u16(code) {
			Ok(status) => self.lock().status = Some(status),
			Err(_) => warn!(code, "ignoring invalid status code"),
		}
		self
	}

	/// The status currently set, if any.
	pub fn status_code(&self) -> Option<StatusCode> {
		self.lock().status
	}

	/// Set a header field value, replacing any other instance of the field.
	pub fn set(&self, name: &str, value: &str) -> &Self {
		let name = match HeaderName::from_bytes(name.as_bytes()) {
			Ok(name) => name,
			Err(_) => {
				warn!(name, "ignoring invalid header name");
				return self;
			}
		};
		match HeaderValue::from_str(value) {
			Ok(value) => {
				self.lock().headers.insert(name, value);
			}
			Err(_) => warn!(%name, "ignoring invalid header value"),
		}
		self
	}

	/// Append content to the body without sending.
	pub fn write(&self, chunk: impl AsRef<[u8]>) -> &Self {
		self.lock().body.extend_from_slice(chunk.as_ref());
		self
	}

	/// Send the response with a body, setting `Content-Length`.
	pub fn send(&self, body: impl AsRef<[u8]>) {
		let length = {
			let mut inner = self.lock();
			inner.body.extend_from_slice(body.as_ref());
			inner.body.len()
		};
		self.set(header::CONTENT_LENGTH.as_str(), &length.to_string());
		self.end();
	}

	/// Send the contents of a file as the response body. The content type
	/// is whatever has been set on the response already.
	pub fn send_file(&self, path: &Path) -> std::io::Result<()> {
		let contents = std::fs::read(path)?;
		self.send(contents);
		Ok(())
	}

	/// Finalize the response and hand it to the transport. Corresponds to
	/// `end()` in express.
	pub fn end(&self) {
		let (outgoing, transport) = {
			let mut inner = self.lock();
			let transport = inner.transport.take();
			if transport.is_none() {
				warn!("response already sent; dropping duplicate send");
			}

			let outgoing = Outgoing {
				status: inner.status.unwrap_or(StatusCode::OK),
				headers: std::mem::take(&mut inner.headers),
				body: std::mem::take(&mut inner.body),
			};
			inner.sent = true;
			(outgoing, transport)
		};

		if let Some(transport) = transport {
			transport(outgoing);
		}
	}

	/// Whether the response was queued for sending already.
	pub fn sent(&self) -> bool {
		self.lock().sent
	}

	/// Set the `Location` header to the given path.
	pub fn location(&self, path: &str) -> &Self {
		self.set(header::LOCATION.as_str(), path)
	}

	/// Redirect to the url derived from `path` with `302 Found`.
	pub fn redirect(&self, path: &str) {
		self.redirect_with(302, path);
	}

	/// Redirect with an explicit status code.
	pub fn redirect_with(&self, code: u16, path: &str) {
		self.location(path);
		self.status(code).end();
	}

	fn lock(&self) -> MutexGuard<'_, Inner> {
		self.inner.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

/// A response writing into a channel, for driving dispatch without a server.
#[cfg(test)]
pub(crate) fn capture() -> (Response, std::sync::mpsc::Receiver<Outgoing>) {
	let (tx, rx) = std::sync::mpsc::channel();
	let resp = Response::new(move |outgoing| {
		let _ = tx.send(outgoing);
	});
	(resp, rx)
}

#[cfg(test)]
mod test {
	use super::capture;
	use http::StatusCode;

	#[test]
	fn send_sets_content_length_and_body() {
		let (resp, rx) = capture();
		resp.set("content-type", "text/plain");
		resp.send("tweet-tweet");

		let outgoing = rx.try_recv().expect("response was sent");
		assert_eq!(outgoing.status, StatusCode::OK);
		assert_eq!(outgoing.body, b"tweet-tweet");
		assert_eq!(outgoing.headers["content-length"], "11");
		assert_eq!(outgoing.headers["content-type"], "text/plain");
		assert!(resp.sent());
	}

	#[test]
	fn status_defaults_to_ok_only_at_send_time() {
		let (resp, rx) = capture();
		assert_eq!(resp.status_code(), None);

		resp.status(404);
		resp.end();
		assert_eq!(rx.try_recv().expect("sent").status, StatusCode::NOT_FOUND);
	}

	#[test]
	fn double_send_reaches_the_transport_once() {
		let (resp, rx) = capture();
		resp.send("first");
		resp.send("second");

		assert!(rx.try_recv().is_ok());
		assert!(rx.try_recv().is_err());
	}

	#[test]
	fn redirect_sets_location_and_status() {
		let (resp, rx) = capture();
		resp.redirect("/elsewhere");

		let outgoing = rx.try_recv().expect("sent");
		assert_eq!(outgoing.status, StatusCode::FOUND);
		assert_eq!(outgoing.headers["location"], "/elsewhere");
	}

	#[test]
	fn unsent_response_reports_unsent() {
		let (resp, _rx) = capture();
		assert!(!resp.sent());
	}
}
