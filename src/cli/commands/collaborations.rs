use clap::Args;

use crate::cli::client::{ApiClient, DEFAULT_API_URL};
use crate::cli::utils::format_collaboration_line;
use crate::cli::OutputFormat;

#[derive(Args)]
pub struct CollaborationsArgs {
    #[arg(long, env = "AGENCY_API_URL", default_value = DEFAULT_API_URL, help = "API base URL")]
    pub url: String,

    #[arg(long, env = "AGENCY_API_TOKEN", help = "Bearer token (see `agencyctl token`)")]
    pub token: String,

    #[arg(long, help = "requested, negotiating, in_progress, completed, declined")]
    pub status: Option<String>,

    #[arg(long, help = "Title search term")]
    pub search: Option<String>,

    #[arg(long, conflicts_with = "status", help = "Only overdue collaborations")]
    pub overdue: bool,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    #[arg(long)]
    pub limit: Option<u32>,
}

impl CollaborationsArgs {
    fn query(&self) -> Vec<(&'static str, String)> {
        let mut query = vec![("page", self.page.to_string())];
        if self.overdue {
            query.push(("status", "overdue".to_string()));
        } else if let Some(status) = &self.status {
            query.push(("status", status.clone()));
        }
        if let Some(search) = &self.search {
            query.push(("search", search.clone()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        query
    }
}

pub async fn handle(args: CollaborationsArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = ApiClient::new(&args.url, Some(args.token.clone()))?;
    let data = client.get("/api/collaborations", &args.query()).await?;

    match output_format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&data)?),
        OutputFormat::Text => {
            let items = data["items"].as_array().cloned().unwrap_or_default();
            if items.is_empty() {
                println!("No collaborations found");
            }
            for collab in &items {
                println!("{}", format_collaboration_line(collab));
            }
            let pagination = &data["pagination"];
            println!(
                "Page {} of {} ({} total)",
                pagination["page"],
                pagination["totalPages"],
                pagination["total"]
            );
        }
    }
    Ok(())
}
