//! CLI caller for the advisory orchestrator
//!
//! Stands in for the excluded web layer: takes the advisory form
//! fields as plain arguments and prints the structured result as
//! JSON.
//!
//! Usage: advisory-recommend <location> <soil_ph> <nitrogen> <phosphorus> <potassium> <season>

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crop_advisory_engine::services::AdvisoryService;
use crop_advisory_engine::{AppError, Config};
use shared::{parse_numeric_field, AdvisoryRequest, SoilSample};

fn parse_request(args: &[String]) -> Result<AdvisoryRequest, AppError> {
    let [location, soil_ph, nitrogen, phosphorus, potassium, season] = args else {
        return Err(AppError::InvalidInput(
            "expected: <location> <soil_ph> <nitrogen> <phosphorus> <potassium> <season>"
                .to_string(),
        ));
    };

    let soil = SoilSample {
        nitrogen: parse_numeric_field("nitrogen", nitrogen)?,
        phosphorus: parse_numeric_field("phosphorus", phosphorus)?,
        potassium: parse_numeric_field("potassium", potassium)?,
        ph: parse_numeric_field("soil_ph", soil_ph)?,
    };

    Ok(AdvisoryRequest {
        location: location.trim().to_string(),
        soil,
        season: season.clone(),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "advisory_recommend=info,crop_advisory_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();
    let config = Config::load()?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let request = parse_request(&args)?;

    let service = AdvisoryService::new(&config);
    let advisory = service.recommend(&request).await?;

    println!("{}", serde_json::to_string_pretty(&advisory)?);
    Ok(())
}
