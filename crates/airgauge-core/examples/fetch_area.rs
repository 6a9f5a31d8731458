//! Example: Querying Sensors Around a Point
//!
//! This example fetches every Sensor.Community reading within a radius of
//! a coordinate, lists the sensors found and prints the AQI of the one the
//! resolver would pick.
//!
//! Run with: `cargo run --example fetch_area -- <LAT> <LON> [RADIUS_KM] [SENSOR_ID]`

use std::env;

use airgauge_core::{SensorCommunityClient, classify, combined_aqi, distance_km, extract, resolve};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <LAT> <LON> [RADIUS_KM] [SENSOR_ID]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} 40.1811 44.5136 2", args[0]);
        std::process::exit(1);
    }

    let lat: f64 = args[1].parse()?;
    let lon: f64 = args[2].parse()?;
    let radius: f64 = args.get(3).map(|s| s.parse()).transpose()?.unwrap_or(2.0);
    let sensor_id: Option<i64> = args.get(4).map(|s| s.parse()).transpose()?;

    let client = SensorCommunityClient::new(SensorCommunityClient::DEFAULT_ENDPOINT)?;
    println!("Querying {}", client.area_url(lat, lon, radius));

    let readings = client.fetch_area(lat, lon, radius).await?;
    println!("Found {} readings", readings.len());
    println!();

    for reading in &readings {
        let sample = extract(reading);
        let distance = reading
            .coordinates()
            .map(|(rlat, rlon)| format!("{:.2} km", distance_km(lat, lon, rlat, rlon)))
            .unwrap_or_else(|| "?".to_string());
        println!(
            "  sensor {:>8}  {:>9}  PM2.5={:<7} PM10={:<7} {}",
            reading
                .sensor_id()
                .map_or_else(|| "-".to_string(), |id| id.to_string()),
            distance,
            sample.pm25.map_or_else(|| "-".to_string(), |v| v.to_string()),
            sample.pm10.map_or_else(|| "-".to_string(), |v| v.to_string()),
            reading.timestamp().unwrap_or("-"),
        );
    }
    println!();

    match resolve(&readings, lat, lon, sensor_id) {
        Some(reading) => {
            let sample = extract(reading);
            match combined_aqi(sample.pm25, sample.pm10) {
                Some(aqi) => {
                    let (category, color) = classify(aqi);
                    println!(
                        "Selected sensor {:?}: AQI {} ({}, color {})",
                        reading.sensor_id(),
                        aqi,
                        category,
                        color
                    );
                }
                None => println!("Selected sensor {:?}: No data", reading.sensor_id()),
            }
        }
        None => println!("No eligible sensor"),
    }

    Ok(())
}
