#[tokio::main]
async fn main() {
    if let Err(e) = cardbox_server::run().await {
        log::error!(target: "cardbox.server", "Fatal: {}", e);
        std::process::exit(1);
    }
}
