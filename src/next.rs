use crate::Error;
use std::{
	any::Any,
	panic::{self, AssertUnwindSafe},
	sync::{Arc, Mutex, PoisonError},
};

#[derive(Default)]
struct State {
	proceeding: bool,
	error: Option<Error>,
}

/// The continuation token threaded through a dispatch chain.
///
/// Every handler invoked while processing one request observes and mutates
/// the same underlying `{proceeding, error}` cell, so the token is a cheap
/// cloneable handle. A handler that wants to complete asynchronously may
/// clone it and call [`proceed`](Next::proceed) from another task later.
///
/// Note that [`proceed`](Next::proceed) does not clear a previously carried
/// error. An error handler that continues without replacing the error leaves
/// it attached, which is how an exhausted inner router hands the error to
/// the enclosing router's error chain.
#[derive(Clone, Default)]
pub struct Next {
	state: Arc<Mutex<State>>,
}

impl Next {
	pub fn new() -> Self {
		Self::default()
	}

	/// Signal that dispatch should continue past the current handler.
	pub fn proceed(&self) {
		self.lock().proceeding = true;
	}

	/// Signal continuation with an error attached, routing the request to
	/// the nearest error handler chain.
	pub fn fail(&self, err: impl Into<Error>) {
		let mut state = self.lock();
		state.proceeding = true;
		state.error = Some(err.into());
	}

	/// The currently carried error, if any.
	pub fn err(&self) -> Option<Error> {
		self.lock().error.clone()
	}

	/// Run `f` with the proceeding flag reset, translating any panic into
	/// a carried error. Returns whether `f` signaled continuation.
	pub fn guarded<F: FnOnce()>(&self, f: F) -> bool {
		self.lock().proceeding = false;

		if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(f)) {
			self.fail(Error::msg(panic_message(payload)));
		}

		self.lock().proceeding
	}

	fn lock(&self) -> std::sync::MutexGuard<'_, State> {
		self.state.lock().unwrap_or_else(PoisonError::into_inner)
	}
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
	if let Some(message) = payload.downcast_ref::<&str>() {
		(*message).to_owned()
	} else if let Some(message) = payload.downcast_ref::<String>() {
		message.clone()
	} else {
		"unknown error".to_owned()
	}
}

#[cfg(test)]
mod test {
	use super::Next;

	#[test]
	fn guarded_reports_continuation() {
		let next = Next::new();
		assert!(next.guarded(|| next.proceed()));
		assert!(!next.guarded(|| {}));
	}

	#[test]
	fn guarded_catches_panics() {
		let next = Next::new();
		let proceeded = next.guarded(|| panic!("handler exploded"));

		// A panic counts as continuation with an error attached.
		assert!(proceeded);
		assert_eq!(next.err().map(|e| e.to_string()), Some("handler exploded".into()));
	}

	#[test]
	fn guarded_translates_opaque_panics() {
		let next = Next::new();
		next.guarded(|| std::panic::panic_any(42_u8));
		assert_eq!(next.err().map(|e| e.to_string()), Some("unknown error".into()));
	}

	#[test]
	fn proceed_does_not_clear_error() {
		let next = Next::new();
		next.fail("original");
		next.proceed();
		assert_eq!(next.err().map(|e| e.to_string()), Some("original".into()));
	}

	#[test]
	fn fail_replaces_error() {
		let next = Next::new();
		next.fail("first");
		next.fail("second");
		assert_eq!(next.err().map(|e| e.to_string()), Some("second".into()));
	}

	#[test]
	fn clones_share_state() {
		let next = Next::new();
		let other = next.clone();
		other.fail("shared");
		assert!(next.err().is_some());
	}
}
