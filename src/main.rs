#[tokio::main]
async fn main() {
    creamery::start_server().await;
}
