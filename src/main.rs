#[tokio::main]
async fn main() -> anyhow::Result<()> {
    scholarhub::bootstrapper::run().await
}
