//! Basic usage example for the Signal Ocean connection
//!
//! This example demonstrates:
//! - Creating a connection from the environment
//! - A GET with query parameters
//! - A POST with a JSON body
//! - Converting a returned figure to an exact decimal

use signal_ocean::{as_decimal, Connection, QueryParameters, Quantity};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Key and host come from SIGNAL_OCEAN_API_KEY / SIGNAL_OCEAN_API_HOST
    let connection = Connection::default();
    println!("Using gateway {}", connection.host());

    println!("\n=== GET ===");
    let params = QueryParameters::new().with("imo", 9_436_018);
    let response = connection
        .get("vessels-api/v1/vessels", Some(&params))
        .await?;
    println!("Status: {}", response.status());
    let body: serde_json::Value = match response.json().await {
        Ok(body) => body,
        Err(e) => {
            eprintln!("Response was not JSON: {e}");
            serde_json::Value::Null
        }
    };

    if let Some(quantity) = body.get("deadWeight").and_then(Quantity::from_json) {
        if let Some(dead_weight) = as_decimal(Some(quantity))? {
            println!("Deadweight: {dead_weight}");
        }
    }

    println!("\n=== POST ===");
    let params = QueryParameters::new()
        .with("vesselClass", "Aframax")
        .with("loadPort", "Rotterdam");
    let response = connection.post("voyages-api/v2/search", Some(&params)).await?;
    println!("Status: {}", response.status());

    Ok(())
}
