use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::config;
use crate::handlers::{protected, public};
use crate::middleware::{jwt_auth_middleware, profile_middleware};

/// Full application router: public routes plus the protected `/api` tree
pub fn app() -> Router {
    let router = Router::new()
        .route("/", get(public::root_get))
        .route("/health", get(public::health_get))
        .merge(api_routes())
        .layer(cors_layer());

    if config::config().api.enable_request_logging {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

fn api_routes() -> Router {
    use protected::{briefings, collaborations, companies, contacts, dashboard, me, templates, users};

    Router::new()
        .route("/api/me", get(me::get))
        .route("/api/users", get(users::list))
        .route("/api/dashboard", get(dashboard::get))
        // Companies and contacts
        .route("/api/companies", get(companies::list).post(companies::create))
        .route(
            "/api/companies/:id",
            get(companies::get).put(companies::update).delete(companies::delete),
        )
        .route("/api/companies/:id/contacts", get(contacts::list).post(contacts::create))
        .route("/api/contacts/:id", put(contacts::update).delete(contacts::delete))
        // Collaborations
        .route("/api/collaborations", get(collaborations::list).post(collaborations::create))
        .route("/api/collaborations/options", get(collaborations::options))
        .route(
            "/api/collaborations/:id",
            get(collaborations::get)
                .put(collaborations::update)
                .delete(collaborations::delete),
        )
        .route("/api/collaborations/:id/status", patch(collaborations::update_status))
        // Briefings
        .route(
            "/api/collaborations/:id/briefing",
            get(briefings::get)
                .post(briefings::create)
                .put(briefings::update)
                .delete(briefings::delete),
        )
        .route(
            "/api/collaborations/:id/briefing/from-template/:template_id",
            post(briefings::create_from_template),
        )
        // Briefing templates
        .route("/api/briefing-templates", get(templates::list).post(templates::create))
        .route("/api/briefing-templates/:id", put(templates::update).delete(templates::delete))
        // Layers run bottom-up: JWT first, then the profile lookup
        .layer(from_fn(profile_middleware))
        .layer(from_fn(jwt_auth_middleware))
}

fn cors_layer() -> CorsLayer {
    let origins = &config::config().security.cors_origins;

    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| match HeaderValue::from_str(o) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                None
            }
        }))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}

/// Binds the configured port and serves until the process stops
pub async fn serve() -> anyhow::Result<()> {
    let port = config::config().api.port;
    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    tracing::info!("Agency collaboration API listening on http://{}", bind_addr);
    axum::serve(listener, app()).await?;
    Ok(())
}
