use uniweb::{Router, Server, handler_fn};

async fn hello_world() -> &'static str {
    "hello world"
}

#[tokio::main]
async fn main() {
    let router = Router::builder().route("/", handler_fn(hello_world)).build();

    Server::builder().router(router).address("127.0.0.1:3000").build().unwrap().start().await.unwrap();
}
