use serde_json::{json, Value};

use crate::cli::OutputFormat;

/// Output a success message in the appropriate format
pub fn output_success(output_format: &OutputFormat, message: &str, data: Option<Value>) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            let mut response = json!({
                "success": true,
                "message": message
            });
            if let Some(Value::Object(extra)) = data {
                if let Some(object) = response.as_object_mut() {
                    object.extend(extra);
                }
            }
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
        OutputFormat::Text => {
            println!("✓ {}", message);
        }
    }
    Ok(())
}

/// One line per collaboration: status, deadline, title, company, influencer
pub fn format_collaboration_line(collab: &Value) -> String {
    let text = |v: &Value| v.as_str().unwrap_or("-").to_string();
    let deadline = collab["deadline"].as_str().map(|d| d.get(..10).unwrap_or(d)).unwrap_or("-");
    let overdue = if collab["is_overdue"].as_bool().unwrap_or(false) { " (overdue)" } else { "" };

    format!(
        "{:<12} {:<10} {} | {} | {}{}",
        text(&collab["status"]),
        deadline,
        text(&collab["title"]),
        text(&collab["company"]["name"]),
        text(&collab["assigned_influencer"]["full_name"]),
        overdue
    )
}
