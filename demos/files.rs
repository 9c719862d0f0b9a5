use mortar::{Request, Response, Router, StaticFiles};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt::init();

	let app = Router::new();

	app.middleware(StaticFiles::new("public"));

	app.middleware(|_req: &Request, resp: &Response| {
		resp.status(404).send("not found");
	});

	mortar::serve(app, ([127, 0, 0, 1], 8080).into()).await
}
