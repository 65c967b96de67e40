use axum::{
    extract::{Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::document::{QuoteDocument, QuoteSequence};
use crate::domain::{QuoteRequest, QuoteResult};
use crate::observability::metrics::TimingGuard;
use crate::observability::MetricsRegistry;
use crate::pricing::PricingRules;
use crate::quote::{calculate_quote, QuoteError};

use super::request::{DocumentFormat, DocumentQuery, DocumentRequest};
use super::response::{
    CatalogResponse, ErrorResponse, HealthResponse, LedgerResponse, ReadyResponse,
};

/// Shared application state.
pub struct AppState {
    /// Current pricing rules (updated via watch channel)
    pub rules_rx: watch::Receiver<Arc<PricingRules>>,

    pub metrics: Arc<MetricsRegistry>,

    /// Application start time
    pub start_time: Instant,

    /// Application version
    pub version: String,

    /// Days an issued quote stays valid
    pub validity_days: u32,

    /// Per-day quote number allocator
    pub document_sequence: QuoteSequence,
}

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    // The quote form is served from a different origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/v1/quote", post(handle_quote))
        .route("/v1/quote/document", post(handle_document))
        .route("/v1/rules", get(handle_rules))
        .route("/health", get(handle_health))
        .route("/ready", get(handle_ready))
        .route("/metrics", get(handle_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(cors)
        .with_state(state)
}

/// Run the engine against the current rule set, recording metrics.
///
/// Returns the rule set used so callers label the quote with the same rules
/// that priced it.
fn price(
    state: &AppState,
    req: &QuoteRequest,
) -> (Arc<PricingRules>, Result<QuoteResult, QuoteError>) {
    let _timing = TimingGuard::new(&state.metrics);
    let rules = state.rules_rx.borrow().clone();

    let result = calculate_quote(req, &rules);
    match &result {
        Ok(quote) => {
            state.metrics.record_quote();
            info!(
                language_pair = %quote.language_pair(),
                domain = %quote.domain(),
                total = quote.total(),
                "Quote issued"
            );
        }
        Err(e) => {
            state.metrics.record_rejection(e);
            warn!(code = e.code(), error = %e, "Quote rejected");
        }
    }

    (rules, result)
}

fn rejection(err: &QuoteError) -> Response {
    (StatusCode::UNPROCESSABLE_ENTITY, Json(ErrorResponse::from(err))).into_response()
}

/// Handle quote calculation requests.
async fn handle_quote(
    State(state): State<Arc<AppState>>,
    Json(req): Json<QuoteRequest>,
) -> Response {
    match price(&state, &req) {
        (_, Ok(quote)) => (StatusCode::OK, Json(quote)).into_response(),
        (_, Err(e)) => rejection(&e),
    }
}

/// Handle quote document requests.
async fn handle_document(
    State(state): State<Arc<AppState>>,
    Query(query): Query<DocumentQuery>,
    Json(req): Json<DocumentRequest>,
) -> Response {
    if req.client_name.trim().is_empty() || req.client_email.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::bad_request(
                "client_name and client_email are required",
            )),
        )
            .into_response();
    }

    let (rules, quote) = match price(&state, &req.quote) {
        (rules, Ok(quote)) => (rules, quote),
        (_, Err(e)) => return rejection(&e),
    };

    let issued_on = Local::now().date_naive();
    let sequence = req
        .sequence
        .unwrap_or_else(|| state.document_sequence.next(issued_on));

    let document = QuoteDocument::build(
        &quote,
        &rules,
        req.client(),
        issued_on,
        state.validity_days,
        sequence,
    );
    state.metrics.record_document();

    let ledger = LedgerResponse::from(&document);
    info!(
        quote_number = %document.quote_number,
        ledger = %ledger.row.join("\t"),
        "Quote document issued"
    );

    match query.format() {
        DocumentFormat::Text => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            document.render_text(rules.vat_rate()),
        )
            .into_response(),
        DocumentFormat::Ledger => (StatusCode::OK, Json(ledger)).into_response(),
        DocumentFormat::Json => (StatusCode::OK, Json(document)).into_response(),
    }
}

/// Rule catalog for the quote form.
async fn handle_rules(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rules = state.rules_rx.borrow().clone();
    Json(CatalogResponse::from_rules(&rules))
}

/// Health check endpoint.
async fn handle_health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rules = state.rules_rx.borrow().clone();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: state.version.clone(),
        rules_fingerprint: rules.fingerprint().to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

/// Readiness check endpoint.
///
/// Rules are validated before the server starts, so a running server is
/// always ready; the response reports what is loaded.
async fn handle_ready(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let rules = state.rules_rx.borrow().clone();

    (
        StatusCode::OK,
        Json(ReadyResponse {
            ready: true,
            rules_fingerprint: rules.fingerprint().to_string(),
            language_pairs: rules.language_pairs().count(),
            surcharges: rules.surcharges().len(),
        }),
    )
}

/// Metrics endpoint (Prometheus format).
async fn handle_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let metrics = format!(
        r#"# HELP transquote_uptime_seconds Application uptime in seconds
# TYPE transquote_uptime_seconds counter
transquote_uptime_seconds {}

{}"#,
        state.start_time.elapsed().as_secs(),
        state.metrics.to_prometheus(),
    );

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        metrics,
    )
}
