use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    repodoc_cli::main_entry().await
}
