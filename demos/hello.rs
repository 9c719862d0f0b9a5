use mortar::{Request, Response, Router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt::init();

	let app = Router::new();

	app.get("/", |_req: &Request, resp: &Response| {
		resp.send("Hello World!");
	});

	// Default handler when no route matched.
	app.middleware(|_req: &Request, resp: &Response| {
		resp.status(404).end();
	});

	mortar::serve(app, ([127, 0, 0, 1], 8080).into()).await
}
