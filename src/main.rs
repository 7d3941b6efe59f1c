use anyhow::Result;

use reckie::run_server;

#[tokio::main]
async fn main() -> Result<()> {
    run_server().await
}
