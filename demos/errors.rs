use mortar::{Error, Next, Request, Response, Router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt::init();

	let app = Router::new();
	let errors = Router::new();

	// Match on /errors/unexpected
	errors.get("/unexpected", |_req: &Request, _resp: &Response| {
		panic!("index out of range");
	});

	// Match on /errors/expected
	errors.get("/expected", |_req: &Request, _resp: &Response, next: &Next| {
		next.fail("expected failure");
	});

	errors.on_error(|err: &Error, _req: &Request, _resp: &Response, next: &Next| {
		println!("oops, got: {}", err);
		next.proceed(); // defer to the parent error handler
	});

	app.on_error(|err: &Error, _req: &Request, resp: &Response, _next: &Next| {
		resp.status(503).send(err.to_string());
	});

	app.mount("/errors", errors);

	mortar::serve(app, ([127, 0, 0, 1], 8080).into()).await
}
