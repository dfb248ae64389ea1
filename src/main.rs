#[tokio::main]
async fn main() {
    if let Err(e) = beer_rate::start_server().await {
        tracing::error!("Server failed: {}", e);
        std::process::exit(1);
    }
}
