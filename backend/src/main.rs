#[tokio::main]
async fn main() -> anyhow::Result<()> {
    frame::start_server().await
}
