//! gpbridge - GlobalPay chat agent bridge

use anyhow::Result;

use globalpay_bridge::adapters::cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (API keys go here, not in bridge.toml)
    dotenvy::dotenv().ok();

    let app = cli::init();
    cli::execute(app).await
}
