use mortar::{Next, Request, Response, Router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
	tracing_subscriber::fmt::init();

	let app = Router::new();
	let birds = Router::new();

	// Match on /birds/tweet
	birds.get("/tweet", |_req: &Request, resp: &Response| {
		resp.send("tweet-tweet");
	});

	// Match on /birds/search
	birds.get("/search", |_req: &Request, resp: &Response| {
		resp.redirect("https://www.google.com/search?q=birds");
	});

	// Always match on any request
	app.middleware(|req: &Request, _resp: &Response, next: &Next| {
		println!("Got a request: {} {}", req.method(), req.original_url());
		next.proceed();
	});

	// Look for any uri starting with "/birds"
	app.mount("/birds", birds);

	mortar::serve(app, ([127, 0, 0, 1], 8080).into()).await
}
