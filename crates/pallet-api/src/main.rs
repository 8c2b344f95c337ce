use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use pallet_core::render::render_svg;
use pallet_core::{PackError, PackOutcome, PackReport, PackRequest, Tournament};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "0.0.0.0:3000";
const OPENAPI_SPEC: &str = include_str!("../../../openapi.yaml");
const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Pallet Loading Calculator</title>
</head>
<body>
    <h1>Pallet Loading Calculator API</h1>
    <h2>API Endpoints:</h2>
    <ul>
        <li>GET /api/health - Health check</li>
        <li>POST /api/pack - Find the fullest layout for a pallet</li>
        <li>POST /api/render/svg - Render a layout as SVG</li>
        <li>GET /docs - Interactive API documentation</li>
    </ul>
</body>
</html>"#;
const SWAGGER_UI_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>Pallet API Docs</title>
    <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script>
        window.onload = () => {
            SwaggerUIBundle({
                url: '/openapi.yaml',
                dom_id: '#swagger-ui',
                presets: [SwaggerUIBundle.presets.apis],
                layout: 'BaseLayout',
            });
        };
    </script>
</body>
</html>"#;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Starting Pallet Loading API");

    let addr = std::env::var("PALLET_API_ADDR").unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Try: curl http://{}/api/health", addr);

    axum::serve(listener, app()).await?;

    Ok(())
}

fn app() -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/health", get(health_check))
        .route("/api/pack", post(pack))
        .route("/api/render/svg", post(generate_svg))
        .route("/openapi.yaml", get(serve_openapi_spec))
        .route("/docs", get(serve_swagger_ui))
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "healthy",
        "service": "pallet-api",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Runs the heuristic tournament. An infeasible request answers 422 with the
/// unmet priority quantities in the body; an unreadable body answers 400.
async fn pack(payload: Result<Json<PackRequest>, JsonRejection>) -> Result<Response, AppError> {
    let Json(request) = payload?;
    info!(
        "Received pack request with {} box types on a {} x {} pallet",
        request.items.len(),
        request.bin.width,
        request.bin.length
    );

    let tournament = Tournament::new(request)?;
    let outcome = tokio::task::spawn_blocking(move || tournament.run()).await??;

    let status = match &outcome {
        PackOutcome::Packed(report) => {
            info!(
                "Packing complete: {} boxes with {}, {:.2}% waste",
                report.total_placed, report.winning_combo, report.summary.waste_percentage
            );
            StatusCode::OK
        }
        PackOutcome::Infeasible(report) => {
            warn!(
                "No layout meets the priority quantities of {} box types",
                report.unmet_priority.len()
            );
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };

    Ok((status, Json(outcome)).into_response())
}

/// Generate SVG visualization
async fn generate_svg(Json(report): Json<PackReport>) -> Result<Response, AppError> {
    info!("Generating SVG for {} boxes", report.placements.len());

    let svg = render_svg(&report)?;

    Ok((StatusCode::OK, [("Content-Type", "image/svg+xml")], svg).into_response())
}

/// Application error type
struct AppError(anyhow::Error);

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request error: {}", self.0);

        let status = match self.0.downcast_ref::<PackError>() {
            Some(PackError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            _ if self.0.is::<JsonRejection>() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(json!({
                "error": self.0.to_string(),
            })),
        )
            .into_response()
    }
}

async fn serve_index() -> impl IntoResponse {
    Html(INDEX_HTML)
}

async fn serve_openapi_spec() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("Content-Type", "application/yaml")],
        OPENAPI_SPEC,
    )
}

async fn serve_swagger_ui() -> impl IntoResponse {
    Html(SWAGGER_UI_HTML)
}
