use axum::response::Json;
use serde_json::{json, Value};

/// GET / - service information
pub async fn get() -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Agency Collaboration API",
            "version": env!("CARGO_PKG_VERSION"),
            "description": "Companies, contacts, influencer collaborations and briefings for agencies",
            "endpoints": {
                "health": "/health (public)",
                "me": "/api/me (protected)",
                "users": "/api/users (protected, agency admin)",
                "dashboard": "/api/dashboard (protected)",
                "companies": "/api/companies[/:id[/contacts]] (protected)",
                "contacts": "/api/contacts/:id (protected)",
                "collaborations": "/api/collaborations[/:id[/status|/briefing]] (protected)",
                "templates": "/api/briefing-templates[/:id] (protected, agency admin)"
            }
        }
    }))
}
