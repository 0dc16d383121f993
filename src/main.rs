#[tokio::main]
async fn main() {
    conduit::start_server().await;
}
