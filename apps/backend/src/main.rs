#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cardoon_backend::run().await
}
