use state_weather::{DashboardError, WeatherDashboard};
use std::env;

#[tokio::main]
async fn main() -> Result<(), DashboardError> {
    // Reads BLOB_BASE_URL and friends, from a .env file if present.
    let dashboard = WeatherDashboard::from_env()?;
    let location_id = env::args().nth(1).unwrap_or_else(|| "missouri".to_string());

    let locations = dashboard.locations().await?;
    println!("--- {} locations ---", locations.len());
    for location in &locations {
        println!("{:<24} {:<20} {}", location.id, location.state_name, location.timezone);
    }

    match dashboard.location_data(&location_id).await? {
        Some(view) => match view.to_json() {
            Ok(json) => println!("\n--- {} ---\n{}", view.location.state_name, json),
            Err(e) => eprintln!("Failed to render view: {}", e),
        },
        None => println!("No locations available"),
    }

    Ok(())
}
