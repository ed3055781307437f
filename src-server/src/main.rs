//! Queue Server Entry Point

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = queue_server::config::load_settings();
    queue_server::run(settings).await
}
