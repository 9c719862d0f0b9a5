use crate::{Next, Outgoing, Request, Response, Router};
use anyhow::Result;
use hyper::{
	service::{make_service_fn, service_fn},
	Body,
};
use std::{convert::Infallible, net::SocketAddr};
use tokio::sync::oneshot;
use tracing::{debug, info};

/// Serve a router on the given address.
///
/// This is the transport collaborator: hyper parses requests off the wire,
/// each one is dispatched through the router, and whatever the response
/// handle's sink receives goes back out. If every handle is dropped without
/// sending, the connection gets an empty `404`.
pub async fn serve(router: Router, addr: SocketAddr) -> Result<()> {
	let make_svc = make_service_fn(move |_conn| {
		let router = router.clone();
		async move { Ok::<_, Infallible>(service_fn(move |req| handle(router.clone(), req))) }
	});

	let server = hyper::Server::bind(&addr).serve(make_svc);
	info!(%addr, "listening");
	server.await?;
	Ok(())
}

async fn handle(
	router: Router,
	incoming: hyper::Request<Body>,
) -> Result<hyper::Response<Body>, Infallible> {
	let (parts, _body) = incoming.into_parts();
	let mut req = Request::new(parts.method, parts.uri.to_string(), parts.headers);

	let (tx, rx) = oneshot::channel();
	let resp = Response::new(move |outgoing| {
		let _ = tx.send(outgoing);
	});

	router.dispatch(&mut req, &resp, &Next::new());

	// Release our handle so an unsent response resolves the channel; a
	// handler that kept a clone for deferred completion keeps it open.
	drop(resp);

	match rx.await {
		Ok(outgoing) => Ok(into_hyper(outgoing)),
		Err(_) => {
			debug!(url = %req.original_url(), "no handler sent a response");
			Ok(hyper::Response::builder()
				.status(404)
				.body(Body::empty())
				.unwrap())
		}
	}
}

fn into_hyper(outgoing: Outgoing) -> hyper::Response<Body> {
	let mut builder = hyper::Response::builder().status(outgoing.status);
	if let Some(headers) = builder.headers_mut() {
		*headers = outgoing.headers;
	}
	builder.body(Body::from(outgoing.body)).unwrap()
}

#[cfg(test)]
mod test {
	use super::handle;
	use crate::{Next, Request, Response, Router};
	use hyper::Body;

	fn incoming(method: &str, uri: &str) -> hyper::Request<Body> {
		hyper::Request::builder()
			.method(method)
			.uri(uri)
			.body(Body::empty())
			.unwrap()
	}

	#[tokio::test]
	async fn answers_with_the_handler_response() {
		let router = Router::new();
		router.get("/users/:id", |req: &Request, resp: &Response| {
			let id = req.param("id").unwrap_or_default().to_owned();
			resp.set("content-type", "text/plain").send(id);
		});

		let response = handle(router, incoming("GET", "/users/7")).await.unwrap();
		assert_eq!(response.status(), 200);
		assert_eq!(response.headers()["content-type"], "text/plain");

		let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
		assert_eq!(&body[..], b"7");
	}

	#[tokio::test]
	async fn unrouted_requests_get_a_404() {
		let router = Router::new();
		router.get("/only", |_: &Request, resp: &Response| resp.send("x"));

		let response = handle(router, incoming("GET", "/missing")).await.unwrap();
		assert_eq!(response.status(), 404);
	}

	#[tokio::test]
	async fn deferred_send_completes_the_request() {
		let router = Router::new();
		router.get("/slow", |_: &Request, resp: &Response, _: &Next| {
			let resp = resp.clone();
			tokio::spawn(async move {
				resp.send("eventually");
			});
		});

		let response = handle(router, incoming("GET", "/slow")).await.unwrap();
		let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
		assert_eq!(&body[..], b"eventually");
	}

	#[tokio::test]
	async fn query_strings_do_not_break_matching() {
		let router = Router::new();
		router.get("/search", |req: &Request, resp: &Response| {
			resp.send(req.original_url().to_owned());
		});

		let response = handle(router, incoming("GET", "/search?q=birds")).await.unwrap();
		assert_eq!(response.status(), 200);

		let body = hyper::body::to_bytes(response.into_body()).await.unwrap();
		assert_eq!(&body[..], b"/search?q=birds");
	}
}
