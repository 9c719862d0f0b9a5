use std::{
	fmt::{self, Debug, Display, Formatter},
	sync::Arc,
};

/// The error value carried by a [`Next`](crate::Next) token.
///
/// Wraps an [`anyhow::Error`] in an `Arc` so that the exact same error
/// instance can be observed by every frame of a dispatch chain: the handler
/// that raised it, the local error handlers, and any enclosing router the
/// error bubbles out to.
#[derive(Clone)]
pub struct Error {
	pub(crate) inner: Arc<anyhow::Error>,
}

impl Error {
	/// Create an error from any std error type.
	pub fn new<E>(err: E) -> Self
	where
		E: std::error::Error + Send + Sync + 'static,
	{
		Self {
			inner: Arc::new(anyhow::Error::new(err)),
		}
	}

	/// Create an error from a printable message.
	pub fn msg<M>(message: M) -> Self
	where
		M: Display + Debug + Send + Sync + 'static,
	{
		Self {
			inner: Arc::new(anyhow::Error::msg(message)),
		}
	}

	/// The underlying error chain.
	pub fn source(&self) -> &anyhow::Error {
		&self.inner
	}
}

impl Display for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Display::fmt(&self.inner, f)
	}
}

impl Debug for Error {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		Debug::fmt(&self.inner, f)
	}
}

impl From<anyhow::Error> for Error {
	fn from(err: anyhow::Error) -> Self {
		Self {
			inner: Arc::new(err),
		}
	}
}

impl From<String> for Error {
	fn from(message: String) -> Self {
		Self::msg(message)
	}
}

impl From<&'static str> for Error {
	fn from(message: &'static str) -> Self {
		Self::msg(message)
	}
}
