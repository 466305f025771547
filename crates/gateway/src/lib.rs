//! HTTP API gateway for Numina.
//!
//! Exposes the assistant proxy (`POST /api/chat`), the chatbot, finance and
//! preference APIs under `/v1`, and a health check.
//!
//! Built on Axum.

pub mod api_v1;
pub mod proxy;

use axum::extract::DefaultBodyLimit;
use axum::{
    Router,
    extract::State,
    http::{HeaderValue, Method, StatusCode, header},
    middleware::{self, Next},
    response::Json,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::{info, warn};

use numina_chatbot::{Chatbot, HistoryWindow};
use numina_config::{AppConfig, GatewayConfig, PreferenceStore};
use numina_core::AssistantGateway;
use numina_finance::{BudgetPlan, DemoFinances, FinanceRepository};

/// Request bodies above this size are rejected.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Shared application state.
pub struct AppState {
    /// Backend used by the `/api/chat` proxy
    pub assistant: Arc<dyn AssistantGateway>,
    /// One turn at a time, typing delay included
    pub chatbot: Mutex<Chatbot>,
    pub preferences: RwLock<PreferenceStore>,
    pub finance: Arc<dyn FinanceRepository>,
    pub budget: RwLock<BudgetPlan>,
    /// History filter when a request names none
    pub default_window: HistoryWindow,
    pub start_time: chrono::DateTime<chrono::Utc>,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(
        assistant: Arc<dyn AssistantGateway>,
        chatbot: Chatbot,
        preferences: PreferenceStore,
        finance: Arc<dyn FinanceRepository>,
    ) -> Self {
        let budget = BudgetPlan::from_repository(finance.as_ref());
        Self {
            assistant,
            chatbot: Mutex::new(chatbot),
            preferences: RwLock::new(preferences),
            finance,
            budget: RwLock::new(budget),
            default_window: HistoryWindow::default(),
            start_time: chrono::Utc::now(),
        }
    }

    pub fn with_default_window(mut self, window: HistoryWindow) -> Self {
        self.default_window = window;
        self
    }

    /// Wire the gateway, chatbot, preferences and demo finances from config.
    pub fn from_config(config: &AppConfig) -> Result<Self, numina_core::GatewayError> {
        let assistant = numina_providers::build_from_config(config)?;
        let chatbot = Chatbot::from_config(&config.chatbot, assistant.clone());
        let preferences = PreferenceStore::load(config.preferences_path());
        let window = config
            .chatbot
            .history_window
            .parse::<HistoryWindow>()
            .unwrap_or_default();
        Ok(Self::new(
            assistant,
            chatbot,
            preferences,
            Arc::new(DemoFinances),
        )
        .with_default_window(window))
    }
}

/// Build the full router.
///
/// Layers applied:
/// - CORS for the configured origin
/// - Request body size limit (64 KiB)
/// - In-memory rate limiting per client (`/health` exempt)
/// - HTTP trace logging
pub fn build_router(state: SharedState, config: &GatewayConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin(&config.allowed_origin))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(3600));

    let rate_limiter = Arc::new(RateLimiter::new(
        config.rate_limit_per_minute as usize,
        Duration::from_secs(60),
    ));

    Router::new()
        .route("/health", get(health_handler))
        .route("/api/chat", post(proxy::chat_proxy_handler))
        .with_state(state.clone())
        .nest("/v1", api_v1::v1_router(state))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware::from_fn(move |req, next| {
            let limiter = rate_limiter.clone();
            rate_limit_middleware(limiter, req, next)
        }))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

fn allowed_origin(origin: &str) -> AllowOrigin {
    match HeaderValue::from_str(origin) {
        Ok(value) => AllowOrigin::exact(value),
        Err(_) => {
            warn!(origin = %origin, "Invalid CORS origin, cross-origin requests disabled");
            AllowOrigin::list(Vec::<HeaderValue>::new())
        }
    }
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let state = Arc::new(AppState::from_config(&config)?);
    info!(
        assistant = state.assistant.name(),
        free_text = %config.chatbot.free_text,
        "Chatbot ready"
    );

    let app = build_router(state, &config.gateway);

    info!(addr = %addr, "Gateway starting");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Rate Limiter ---

/// Simple in-memory sliding-window rate limiter.
///
/// Tracks request timestamps per client key.
/// Thread-safe via `std::sync::Mutex` (non-async, held briefly).
struct RateLimiter {
    max_requests: usize,
    window: Duration,
    clients: std::sync::Mutex<HashMap<String, Vec<Instant>>>,
}

impl RateLimiter {
    fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            clients: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` if the client is within limits. A limit of 0 allows all.
    fn check(&self, client_key: &str) -> bool {
        if self.max_requests == 0 {
            return true;
        }

        let now = Instant::now();
        let mut clients = self.clients.lock().unwrap_or_else(|e| e.into_inner());

        // Evict idle clients once the map gets large
        if clients.len() > 10_000 {
            clients.retain(|_, timestamps| {
                timestamps
                    .last()
                    .is_some_and(|t| now.duration_since(*t) < self.window)
            });
        }

        let timestamps = clients.entry(client_key.to_string()).or_default();
        timestamps.retain(|t| now.duration_since(*t) < self.window);

        if timestamps.len() >= self.max_requests {
            return false;
        }

        timestamps.push(now);
        true
    }
}

/// Keys clients by `X-Forwarded-For`, else "anonymous". Returns 429 when
/// the limit is exceeded. `/health` is exempt.
async fn rate_limit_middleware(
    limiter: Arc<RateLimiter>,
    req: axum::extract::Request,
    next: Next,
) -> Result<axum::response::Response, StatusCode> {
    if req.uri().path() == "/health" {
        return Ok(next.run(req).await);
    }

    let client_key = req
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "anonymous".to_string());

    if !limiter.check(&client_key) {
        warn!(client = %client_key.chars().take(40).collect::<String>(), "Rate limit exceeded");
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    Ok(next.run(req).await)
}

// --- Handlers ---

#[derive(Serialize, Deserialize)]
struct HealthResponse {
    status: String,
    version: String,
    uptime_secs: u64,
}

async fn health_handler(State(state): State<SharedState>) -> Json<HealthResponse> {
    let uptime = chrono::Utc::now()
        .signed_duration_since(state.start_time)
        .num_seconds()
        .max(0) as u64;
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        uptime_secs: uptime,
    })
}

/// Shared doubles for the router tests in this crate.
#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use async_trait::async_trait;
    use numina_chatbot::TypingDelay;
    use numina_core::{AssistantReply, AssistantRequest, GatewayError};

    /// Echoes the message back, or fails with a fixed error.
    pub struct MockGateway {
        pub failure: Option<GatewayError>,
    }

    #[async_trait]
    impl AssistantGateway for MockGateway {
        fn name(&self) -> &str {
            "gateway_mock"
        }

        async fn send(&self, request: AssistantRequest) -> Result<AssistantReply, GatewayError> {
            match &self.failure {
                Some(e) => Err(e.clone()),
                None => Ok(AssistantReply {
                    reply: format!("Mock reply to: {}", request.message),
                    session_id: request.session_id,
                }),
            }
        }
    }

    pub fn state_with(gateway: MockGateway, dir: &std::path::Path) -> SharedState {
        let gateway: Arc<dyn AssistantGateway> = Arc::new(gateway);
        let chatbot = Chatbot::new(
            Arc::new(numina_chatbot::LocalRuleStrategy::new()),
            Arc::new(numina_chatbot::RemoteGatewayStrategy::new(gateway.clone())),
            TypingDelay::none(),
        );
        let preferences = PreferenceStore::load(dir.join("preferences.json"));
        Arc::new(AppState::new(
            gateway,
            chatbot,
            preferences,
            Arc::new(DemoFinances),
        ))
    }

    pub fn test_state(dir: &std::path::Path) -> SharedState {
        state_with(MockGateway { failure: None }, dir)
    }

    pub fn state_with_window(dir: &std::path::Path, window: HistoryWindow) -> SharedState {
        let gateway: Arc<dyn AssistantGateway> = Arc::new(MockGateway { failure: None });
        let chatbot = Chatbot::local_only(TypingDelay::none());
        let preferences = PreferenceStore::load(dir.join("preferences.json"));
        Arc::new(
            AppState::new(gateway, chatbot, preferences, Arc::new(DemoFinances))
                .with_default_window(window),
        )
    }
}
