use clap::Args;
use serde_json::json;

use crate::cli::client::{ApiClient, DEFAULT_API_URL};
use crate::cli::{utils::output_success, OutputFormat};

#[derive(Args)]
pub struct HealthArgs {
    #[arg(long, env = "AGENCY_API_URL", default_value = DEFAULT_API_URL, help = "API base URL")]
    pub url: String,
}

pub async fn handle(args: HealthArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(&args.url, None)?;
    let data = client.get("/health", &[]).await?;

    let status = data["status"].as_str().unwrap_or("unknown").to_string();
    output_success(
        &output_format,
        &format!("{} is {}", args.url, status),
        Some(json!({ "url": args.url, "health": data })),
    )
}
