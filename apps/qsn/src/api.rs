//! # HTTP API
//!
//! Read-mostly JSON preview of the tier catalog, resolver, selection and
//! metric panels.
//!
//! Endpoints:
//! - `GET  /health`
//! - `GET  /tiers`, `GET /tiers/{level}`
//! - `GET  /resolve/{level}`
//! - `GET  /compare`
//! - `GET  /selection`, `POST /selection`, `POST /selection/upgrade`
//! - `GET  /metrics`
//! - `GET  /checkout/{level}` (303 to the plan's checkout target)
//!
//! Every route except `/health` is rate limited with the selected tier's
//! advertised API limit. There is no authentication.

use crate::config::ServerConfig;
use crate::ticker::{seeded_jitter, spawn_ticker};
use axum::{
    Json, Router,
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use qsn_core::{
    CheckoutTarget, ComparisonRow, FeatureSet, MetricsBoard, MetricsSnapshot, Resolution,
    SecurityTier, TierProfile, TierResolver, TierSelection, comparison_table,
};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

// =============================================================================
// STATE
// =============================================================================

/// Shared server state.
pub struct AppState {
    selection: RwLock<TierSelection>,
    board: Arc<RwLock<MetricsBoard>>,
    limiter: RwLock<Arc<DefaultDirectRateLimiter>>,
}

impl AppState {
    /// Fresh state with `tier` selected and an empty metric board.
    pub fn new(tier: SecurityTier) -> Self {
        Self {
            selection: RwLock::new(TierSelection::from_tier(tier)),
            board: Arc::new(RwLock::new(MetricsBoard::new())),
            limiter: RwLock::new(Arc::new(limiter_for(tier))),
        }
    }

    /// Handle to the metric board for the ticker.
    pub fn board(&self) -> Arc<RwLock<MetricsBoard>> {
        Arc::clone(&self.board)
    }

    /// Currently selected tier.
    pub async fn current_tier(&self) -> SecurityTier {
        self.selection.read().await.current()
    }

    async fn replace_limiter(&self, tier: SecurityTier) {
        *self.limiter.write().await = Arc::new(limiter_for(tier));
    }
}

/// Rate limiter matching the tier's advertised API limit.
fn limiter_for(tier: SecurityTier) -> DefaultDirectRateLimiter {
    let limit = tier.profile().rate_limit;
    let per_minute = NonZeroU32::new(limit.requests_per_minute).unwrap_or(NonZeroU32::MIN);
    let burst = NonZeroU32::new(limit.burst).unwrap_or(NonZeroU32::MIN);
    RateLimiter::direct(Quota::per_minute(per_minute).allow_burst(burst))
}

// =============================================================================
// ERRORS
// =============================================================================

/// Errors returned by handlers.
#[derive(Debug)]
pub enum ApiError {
    Conflict(String),
    RateLimited,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error) = match self {
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                String::from("rate limit exceeded for the selected tier"),
            ),
        };
        (status, Json(ErrorBody { error })).into_response()
    }
}

// =============================================================================
// RESPONSE TYPES
// =============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub level: i64,
}

/// A tier profile with its derived labels.
#[derive(Debug, Serialize)]
pub struct TierView {
    #[serde(flatten)]
    pub profile: &'static TierProfile,
    pub level: i64,
    pub capabilities: FeatureSet,
    pub price_label: String,
    pub rate_limit_label: String,
    pub checkout: CheckoutView,
    /// Level of the next tier up, if any.
    pub upgrade_to: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub href: String,
    pub external: bool,
}

impl From<&CheckoutTarget> for CheckoutView {
    fn from(target: &CheckoutTarget) -> Self {
        Self {
            href: target.href().to_string(),
            external: target.is_external(),
        }
    }
}

impl TierView {
    pub fn new(tier: SecurityTier) -> Self {
        let profile = tier.profile();
        Self {
            profile,
            level: tier.level(),
            capabilities: tier.capabilities(),
            price_label: profile.price.label(),
            rate_limit_label: profile.rate_limit.label(),
            checkout: CheckoutView::from(&profile.price.checkout_target()),
            upgrade_to: tier.next().map(SecurityTier::level),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SelectionView {
    pub level: i64,
    pub name: &'static str,
    pub features: FeatureSet,
    pub changes: u64,
}

impl From<&TierSelection> for SelectionView {
    fn from(selection: &TierSelection) -> Self {
        Self {
            level: selection.level(),
            name: selection.current().name(),
            features: selection.features(),
            changes: selection.changes(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    pub level: i64,
}

// =============================================================================
// HANDLERS
// =============================================================================

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: String::from("ok"),
        version: env!("CARGO_PKG_VERSION").to_string(),
        level: state.current_tier().await.level(),
    })
}

async fn list_tiers() -> Json<Vec<TierView>> {
    Json(SecurityTier::ALL.into_iter().map(TierView::new).collect())
}

async fn get_tier(Path(level): Path<i64>) -> Json<TierView> {
    Json(TierView::new(SecurityTier::clamp(level)))
}

async fn resolve_level(Path(level): Path<i64>) -> Json<Resolution> {
    Json(TierResolver::resolve_detailed(level))
}

async fn compare() -> Json<Vec<ComparisonRow>> {
    Json(comparison_table())
}

async fn get_selection(State(state): State<Arc<AppState>>) -> Json<SelectionView> {
    Json(SelectionView::from(&*state.selection.read().await))
}

async fn post_selection(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SelectRequest>,
) -> Json<SelectionView> {
    let mut selection = state.selection.write().await;
    let before = selection.current();
    let tier = selection.select(body.level);

    if tier != before {
        state.replace_limiter(tier).await;
        info!(
            requested = body.level,
            from = before.level(),
            to = tier.level(),
            "tier selected"
        );
    }

    Json(SelectionView::from(&*selection))
}

async fn post_upgrade(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SelectRequest>,
) -> Result<Json<SelectionView>, ApiError> {
    let mut selection = state.selection.write().await;
    let before = selection.current();
    let tier = selection.upgrade(body.level).map_err(|err| {
        warn!(requested = body.level, error = %err, "upgrade rejected");
        ApiError::Conflict(err.to_string())
    })?;

    state.replace_limiter(tier).await;
    info!(from = before.level(), to = tier.level(), "tier upgraded");

    Ok(Json(SelectionView::from(&*selection)))
}

async fn metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    let tier = state.current_tier().await;
    Json(state.board.read().await.snapshot(tier))
}

async fn checkout(Path(level): Path<i64>) -> Redirect {
    let tier = SecurityTier::clamp(level);
    let target = tier.profile().price.checkout_target();
    info!(level = tier.level(), href = %target, "checkout redirect");
    Redirect::to(target.href())
}

async fn rate_limit(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let limiter = Arc::clone(&*state.limiter.read().await);
    if limiter.check().is_err() {
        warn!(path = %request.uri().path(), "rate limited");
        return Err(ApiError::RateLimited);
    }
    Ok(next.run(request).await)
}

// =============================================================================
// ROUTER + SERVER
// =============================================================================

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/tiers", get(list_tiers))
        .route("/tiers/{level}", get(get_tier))
        .route("/resolve/{level}", get(resolve_level))
        .route("/compare", get(compare))
        .route("/selection", get(get_selection).post(post_selection))
        .route("/selection/upgrade", post(post_upgrade))
        .route("/metrics", get(metrics))
        .route("/checkout/{level}", get(checkout))
        .route_layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            rate_limit,
        ))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Run the preview server until Ctrl-C.
pub async fn serve(config: ServerConfig) -> std::io::Result<()> {
    let state = Arc::new(AppState::new(config.tier));

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let ticker = spawn_ticker(
        state.board(),
        config.tick,
        seeded_jitter(config.seed),
        shutdown_rx,
    );

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!(
        addr = %config.addr,
        level = config.tier.level(),
        tick_ms = config.tick.as_millis() as u64,
        "QSN preview server listening"
    );

    let served = axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await;

    shutdown_tx.send(true).ok();
    if let Err(err) = ticker.await {
        warn!(error = %err, "metric ticker ended abnormally");
    }

    info!("QSN preview server stopped");
    served
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
