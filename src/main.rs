#[tokio::main]
async fn main() {
    tours_backend::run().await;
}
