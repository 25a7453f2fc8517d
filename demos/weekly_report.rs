//! Reads a week of observations from CSV and prints the advisory report.

use agroweather::{AdvisoryResponse, ObservationLoader, OutputFormat, WeatherAdvisor};
use std::error::Error;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let csv = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/data/august_week.csv");
    let frame = ObservationLoader::read_csv(&csv).await?;

    let advisor = WeatherAdvisor::builder()
        .region("North Field")
        .default_format(OutputFormat::Weather)
        .build();

    // --- Whole week ---
    let report = advisor.process_frame(&frame)?;
    println!("{}", serde_json::to_string_pretty(&report)?);

    // --- One day, display shape ---
    let days = frame.get_at("2025-08-17")?.collect_observations()?;
    if let Some(day) = days.first() {
        if let AdvisoryResponse::Weather(display) = advisor.analyze((*day).into()).call()? {
            println!("{}: {}", display.date, display.summary);
        }
    }
    Ok(())
}
