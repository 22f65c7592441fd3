//! Run with: cargo run --bin check_connection

use movielist::config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    println!("Connecting to MongoDB...");
    let db = config::database::connect().await?;
    println!("✓ Connected to database '{}'", db.name());

    let status = db.check_health().await;
    if !status.healthy {
        anyhow::bail!(
            "ping failed after {}ms: {}",
            status.response_time_ms,
            status.message.unwrap_or_default()
        );
    }
    println!("✓ Ping answered in {}ms", status.response_time_ms);

    println!("\nCollections:");
    let collections = db.list_collection_names().await?;
    for name in collections {
        println!("  - {}", name);
    }

    Ok(())
}
