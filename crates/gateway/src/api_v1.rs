//! HTTP API v1: chatbot, finance and preference endpoints.
//!
//! Endpoints:
//!
//! - `POST  /v1/chat/quick-reply`: Select a quick reply
//! - `POST  /v1/chat/message`: Send typed text
//! - `GET   /v1/chat/transcript`: Visible messages
//! - `POST  /v1/chat/disclaimer/dismiss`: Hide the disclaimer
//! - `GET   /v1/conversations?window=`: Saved conversations
//! - `POST  /v1/conversations`: Start a new conversation
//! - `POST  /v1/conversations/{id}/activate`: Switch conversation
//! - `GET   /v1/accounts`, `/v1/transactions`, `/v1/goals`, `/v1/spending`
//! - `GET   /v1/accounts/{id}`: Ledger and goal breakdown for one account
//! - `GET   /v1/accounts/{id}/export`: Account ledger as a CSV download
//! - `GET   /v1/budget`, `PUT /v1/budget/income`
//! - `GET   /v1/preferences`, `PATCH /v1/preferences/theme`
//! - `POST  /v1/preferences/theme/preset/{name}`, `/theme/reset`, `/consent`

use axum::{
    Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Json},
    routing::{get, patch, post, put},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use numina_chatbot::HistoryWindow;
use numina_config::{ConsentRecord, PreferenceError, Preferences, ThemeColors, ThemePatch};
use numina_core::{ConversationId, Message, QuickReply};
use numina_finance::{
    Account, AccountDetails, Activity, BudgetCategory, BudgetPlan, Goal, GoalProgress,
    SpendingSummary, Transaction, total_balance,
};

use crate::SharedState;

/// Build the v1 API router. Nest this under "/v1" in the main router.
pub fn v1_router(state: SharedState) -> Router {
    Router::new()
        .route("/chat/quick-reply", post(quick_reply_handler))
        .route("/chat/message", post(message_handler))
        .route("/chat/transcript", get(transcript_handler))
        .route("/chat/disclaimer/dismiss", post(dismiss_disclaimer_handler))
        .route("/conversations", get(list_conversations_handler))
        .route("/conversations", post(create_conversation_handler))
        .route("/conversations/{id}/activate", post(activate_conversation_handler))
        .route("/accounts", get(accounts_handler))
        .route("/accounts/{id}", get(account_details_handler))
        .route("/accounts/{id}/export", get(account_export_handler))
        .route("/transactions", get(transactions_handler))
        .route("/goals", get(goals_handler))
        .route("/spending", get(spending_handler))
        .route("/budget", get(budget_handler))
        .route("/budget/income", put(set_income_handler))
        .route("/preferences", get(get_preferences_handler))
        .route("/preferences/theme", patch(update_theme_handler))
        .route("/preferences/theme/preset/{name}", post(apply_preset_handler))
        .route("/preferences/theme/reset", post(reset_theme_handler))
        .route("/preferences/consent", post(consent_handler))
        .with_state(state)
}

// ── Request / Response types ──────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

fn preference_error(e: PreferenceError) -> ApiError {
    error!(error = %e, "Failed to persist preferences");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}

#[derive(Deserialize)]
struct QuickReplyRequest {
    value: String,
}

#[derive(Deserialize)]
struct MessageRequest {
    message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: Message,
    pub messages_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptResponse {
    pub conversation_id: String,
    pub messages: Vec<Message>,
    pub disclaimer_visible: bool,
    pub quick_replies: Vec<QuickReply>,
}

#[derive(Deserialize)]
struct HistoryQuery {
    #[serde(default)]
    window: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationSummaryDto {
    pub id: String,
    pub preview: String,
    pub message_count: usize,
    pub started_at: String,
    pub last_updated_at: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationListResponse {
    pub window: String,
    pub conversations: Vec<ConversationSummaryDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ConversationResponse {
    pub id: String,
    pub messages_count: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccountsResponse {
    pub accounts: Vec<Account>,
    pub total_balance: f64,
    pub recent_activity: Vec<Activity>,
}

#[derive(Deserialize)]
struct TransactionQuery {
    #[serde(default)]
    account: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionListResponse {
    pub transactions: Vec<Transaction>,
    pub count: usize,
}

#[derive(Debug, Serialize)]
pub struct GoalDto {
    #[serde(flatten)]
    pub goal: Goal,
    pub progress: GoalProgress,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BudgetSplit {
    pub needs: f64,
    pub wants: f64,
    pub savings: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BudgetResponse {
    pub income: f64,
    pub categories: Vec<BudgetCategory>,
    pub total_allocated: f64,
    pub total_spent: f64,
    pub remaining_income: f64,
    pub over_budget: Vec<String>,
    pub split: BudgetSplit,
}

impl From<&BudgetPlan> for BudgetResponse {
    fn from(plan: &BudgetPlan) -> Self {
        let (needs, wants, savings) = plan.fifty_thirty_twenty();
        Self {
            income: plan.income(),
            categories: plan.categories().to_vec(),
            total_allocated: plan.total_allocated(),
            total_spent: plan.total_spent(),
            remaining_income: plan.remaining_income(),
            over_budget: plan.over_budget().iter().map(|c| c.name.clone()).collect(),
            split: BudgetSplit {
                needs,
                wants,
                savings,
            },
        }
    }
}

#[derive(Deserialize)]
struct IncomeRequest {
    income: f64,
}

// ── Chat handlers ─────────────────────────────────────────────────────────

async fn quick_reply_handler(
    State(state): State<SharedState>,
    Json(req): Json<QuickReplyRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let mut chatbot = state.chatbot.lock().await;
    let reply = chatbot.quick_reply(&req.value).await.map_err(|e| {
        error!(error = %e, "Quick reply failed");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    Ok(Json(ChatResponse {
        reply,
        messages_count: chatbot.transcript().len(),
    }))
}

async fn message_handler(
    State(state): State<SharedState>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let mut chatbot = state.chatbot.lock().await;
    let reply = chatbot
        .submit(&req.message)
        .await
        .map_err(|e| {
            error!(error = %e, "Message handling failed");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        })?
        .ok_or_else(|| api_error(StatusCode::BAD_REQUEST, "Message must not be empty"))?;

    Ok(Json(ChatResponse {
        reply,
        messages_count: chatbot.transcript().len(),
    }))
}

async fn transcript_handler(State(state): State<SharedState>) -> Json<TranscriptResponse> {
    let chatbot = state.chatbot.lock().await;
    Json(TranscriptResponse {
        conversation_id: chatbot.session().active_id().to_string(),
        messages: chatbot.visible_messages().into_iter().cloned().collect(),
        disclaimer_visible: chatbot.session().disclaimer_visible(),
        quick_replies: chatbot.pending_quick_replies().to_vec(),
    })
}

async fn dismiss_disclaimer_handler(State(state): State<SharedState>) -> StatusCode {
    state.chatbot.lock().await.dismiss_disclaimer();
    StatusCode::NO_CONTENT
}

// ── Conversation handlers ─────────────────────────────────────────────────

async fn list_conversations_handler(
    State(state): State<SharedState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ConversationListResponse>, ApiError> {
    let window = match query.window.as_deref() {
        Some(w) => w
            .parse::<HistoryWindow>()
            .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?,
        None => state.default_window,
    };

    let chatbot = state.chatbot.lock().await;
    let mut conversations: Vec<ConversationSummaryDto> = chatbot
        .history(window)
        .into_iter()
        .map(|c| ConversationSummaryDto {
            id: c.id.to_string(),
            preview: c.preview(),
            message_count: c.messages.len(),
            started_at: c.started_at.to_rfc3339(),
            last_updated_at: c.last_updated_at.to_rfc3339(),
        })
        .collect();

    conversations.sort_by(|a, b| b.last_updated_at.cmp(&a.last_updated_at));

    Ok(Json(ConversationListResponse {
        window: window.to_string(),
        conversations,
    }))
}

async fn create_conversation_handler(
    State(state): State<SharedState>,
) -> (StatusCode, Json<ConversationResponse>) {
    let mut chatbot = state.chatbot.lock().await;
    let id = chatbot.start_new();

    (
        StatusCode::CREATED,
        Json(ConversationResponse {
            id: id.to_string(),
            messages_count: chatbot.transcript().len(),
        }),
    )
}

async fn activate_conversation_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<ConversationResponse>, ApiError> {
    let mut chatbot = state.chatbot.lock().await;
    chatbot
        .switch_to(&ConversationId::from(id.as_str()))
        .map_err(|e| api_error(StatusCode::NOT_FOUND, e.to_string()))?;

    Ok(Json(ConversationResponse {
        id,
        messages_count: chatbot.transcript().len(),
    }))
}

// ── Finance handlers ──────────────────────────────────────────────────────

async fn accounts_handler(State(state): State<SharedState>) -> Json<AccountsResponse> {
    let accounts = state.finance.accounts();
    Json(AccountsResponse {
        total_balance: total_balance(&accounts),
        accounts,
        recent_activity: state.finance.recent_activity(),
    })
}

fn account_details(state: &SharedState, id: &str) -> Result<AccountDetails, ApiError> {
    AccountDetails::load(state.finance.as_ref(), id)
        .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("Account not found: {id}")))
}

async fn account_details_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<AccountDetails>, ApiError> {
    Ok(Json(account_details(&state, &id)?))
}

async fn account_export_handler(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let details = account_details(&state, &id)?;
    let file_name = details.csv_file_name(chrono::Local::now().date_naive());
    debug!(account = %details.account.name, rows = details.transactions.len(), "Exporting ledger");

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        details.to_csv(),
    ))
}

async fn transactions_handler(
    State(state): State<SharedState>,
    Query(query): Query<TransactionQuery>,
) -> Json<TransactionListResponse> {
    let transactions = match query.account.as_deref() {
        Some(account) => state.finance.transactions_for(account),
        None => state.finance.transactions(),
    };
    Json(TransactionListResponse {
        count: transactions.len(),
        transactions,
    })
}

async fn goals_handler(State(state): State<SharedState>) -> Json<Vec<GoalDto>> {
    let today = chrono::Local::now().date_naive();
    Json(
        state
            .finance
            .goals()
            .into_iter()
            .map(|goal| GoalDto {
                progress: GoalProgress::compute(&goal, today),
                goal,
            })
            .collect(),
    )
}

async fn spending_handler(State(state): State<SharedState>) -> Json<SpendingSummary> {
    Json(SpendingSummary::from_categories(
        &state.finance.spending_categories(),
    ))
}

async fn budget_handler(State(state): State<SharedState>) -> Json<BudgetResponse> {
    let plan = state.budget.read().await;
    Json(BudgetResponse::from(&*plan))
}

async fn set_income_handler(
    State(state): State<SharedState>,
    Json(req): Json<IncomeRequest>,
) -> Result<Json<BudgetResponse>, ApiError> {
    let mut plan = state.budget.write().await;
    if !plan.set_income(req.income) {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Income must be a positive number",
        ));
    }
    info!(income = req.income, "Monthly income updated");
    Ok(Json(BudgetResponse::from(&*plan)))
}

// ── Preference handlers ───────────────────────────────────────────────────

async fn get_preferences_handler(State(state): State<SharedState>) -> Json<Preferences> {
    Json(state.preferences.read().await.get().clone())
}

async fn update_theme_handler(
    State(state): State<SharedState>,
    Json(patch): Json<ThemePatch>,
) -> Result<Json<ThemeColors>, ApiError> {
    let mut store = state.preferences.write().await;
    store.update_theme(patch).map_err(preference_error)?;
    Ok(Json(store.theme().clone()))
}

async fn apply_preset_handler(
    State(state): State<SharedState>,
    Path(name): Path<String>,
) -> Result<Json<ThemeColors>, ApiError> {
    let mut store = state.preferences.write().await;
    if !store.apply_preset(&name).map_err(preference_error)? {
        return Err(api_error(
            StatusCode::NOT_FOUND,
            format!("Unknown theme preset: {name}"),
        ));
    }
    Ok(Json(store.theme().clone()))
}

async fn reset_theme_handler(
    State(state): State<SharedState>,
) -> Result<Json<ThemeColors>, ApiError> {
    let mut store = state.preferences.write().await;
    store.reset_theme().map_err(preference_error)?;
    Ok(Json(store.theme().clone()))
}

async fn consent_handler(
    State(state): State<SharedState>,
) -> Result<Json<ConsentRecord>, ApiError> {
    let mut store = state.preferences.write().await;
    let record = store
        .grant_consent(chrono::Utc::now())
        .map_err(preference_error)?
        .clone();
    Ok(Json(record))
}
