use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use chrono::Utc;
use shawarma_core::{Delivery, JournalEntry, Order, Role, User};
use shawarma_engine::{EngineError, Marketplace, RiderRegistration};
use shawarma_platform::{
    AcceptDeliveryRequest, AssignRiderRequest, CategoryQuery, DeliveryStatusRequest,
    DeliveryTransitionResponse, LoginRequest, OpenDeliveryRequest, OrderStatusRequest,
    SelectPageRequest, SendMessageRequest, SendMessageResponse, SessionResponse, TopUpRequest,
    WorkspaceResponse,
};
use shawarma_support::{ChatError, ChatSession, ChatThread, CompletionService, SendOutcome};
use shawarma_views::{
    CapabilityTable, Navigation, PageContext, RenderedPage, RouterError, ViewRouter,
};
use shawarma_wallet::{WalletError, request_top_up};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

const MAX_WORKSPACES: usize = 10_000;

/// One client's UI state: who is logged in, where each role's menu stands,
/// and the support conversation.
struct Workspace {
    actor: Option<User>,
    router: ViewRouter,
    chat: Arc<ChatSession>,
}

#[derive(Clone)]
pub struct AppState {
    market: Arc<Marketplace>,
    capabilities: Arc<CapabilityTable>,
    completion: Arc<dyn CompletionService>,
    completion_timeout: Duration,
    workspaces: Arc<RwLock<HashMap<Uuid, Workspace>>>,
    workspace_limit: usize,
}

impl AppState {
    pub fn new(
        market: Arc<Marketplace>,
        completion: Arc<dyn CompletionService>,
        completion_timeout: Duration,
    ) -> Self {
        Self {
            market,
            capabilities: Arc::new(CapabilityTable::standard()),
            completion,
            completion_timeout,
            workspaces: Arc::new(RwLock::new(HashMap::new())),
            workspace_limit: MAX_WORKSPACES,
        }
    }

    pub fn with_workspace_limit(mut self, limit: usize) -> Self {
        self.workspace_limit = limit;
        self
    }

    fn new_workspace(&self) -> Workspace {
        Workspace {
            actor: None,
            router: ViewRouter::new(Arc::clone(&self.capabilities)),
            chat: Arc::new(ChatSession::new(
                Arc::clone(&self.completion),
                self.completion_timeout,
            )),
        }
    }

    /// Actor, router and chat handle, copied out so no lock is held while rendering.
    async fn logged_in(
        &self,
        workspace_id: Uuid,
    ) -> Result<(User, ViewRouter, Arc<ChatSession>), (StatusCode, String)> {
        let workspaces = self.workspaces.read().await;
        let workspace = workspaces
            .get(&workspace_id)
            .ok_or_else(|| workspace_not_found(workspace_id))?;
        let actor = workspace.actor.clone().ok_or_else(not_logged_in)?;
        Ok((actor, workspace.router.clone(), Arc::clone(&workspace.chat)))
    }

    async fn vendor_chat(
        &self,
        workspace_id: Uuid,
    ) -> Result<Arc<ChatSession>, (StatusCode, String)> {
        let (actor, _, chat) = self.logged_in(workspace_id).await?;
        if actor.role() != Role::Vendor {
            return Err((
                StatusCode::FORBIDDEN,
                "support chat is only available to vendors".to_string(),
            ));
        }
        Ok(chat)
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/workspaces", post(create_workspace))
        .route("/workspaces/{workspace_id}", delete(delete_workspace))
        .route("/workspaces/{workspace_id}/login", post(login))
        .route("/workspaces/{workspace_id}/riders", post(register_rider))
        .route("/workspaces/{workspace_id}/logout", post(logout))
        .route("/workspaces/{workspace_id}/navigation", get(navigation))
        .route("/workspaces/{workspace_id}/pages/{role}", put(select_page))
        .route("/workspaces/{workspace_id}/view", get(current_view))
        .route(
            "/workspaces/{workspace_id}/support/messages",
            get(support_messages).post(send_support_message),
        )
        .route("/orders/{order_id}/rider", post(assign_rider))
        .route("/orders/{order_id}/status", post(set_order_status))
        .route("/orders/{order_id}/delivery", post(open_delivery))
        .route("/deliveries/{delivery_id}/accept", post(accept_delivery))
        .route("/deliveries/{delivery_id}/status", post(advance_delivery))
        .route("/wallet/top-up", post(top_up))
        .route("/activity", get(activity))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn create_workspace(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<WorkspaceResponse>), (StatusCode, String)> {
    let workspace_id = Uuid::new_v4();
    let mut workspaces = state.workspaces.write().await;
    if workspaces.len() >= state.workspace_limit {
        warn!(open = workspaces.len(), "workspace limit reached");
        return Err((
            StatusCode::SERVICE_UNAVAILABLE,
            "too many open workspaces".to_string(),
        ));
    }
    workspaces.insert(workspace_id, state.new_workspace());
    info!(%workspace_id, "workspace created");

    Ok((
        StatusCode::CREATED,
        Json(WorkspaceResponse {
            workspace_id,
            created_at: Utc::now(),
        }),
    ))
}

async fn delete_workspace(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    let workspace = state
        .workspaces
        .write()
        .await
        .remove(&workspace_id)
        .ok_or_else(|| workspace_not_found(workspace_id))?;
    workspace.chat.reset();
    info!(%workspace_id, "workspace closed");

    Ok(StatusCode::NO_CONTENT)
}

async fn login(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    let user = state
        .market
        .first_user_with_role(payload.role)
        .await
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("no {} account is available", payload.role),
            )
        })?;

    let mut workspaces = state.workspaces.write().await;
    let workspace = workspaces
        .get_mut(&workspace_id)
        .ok_or_else(|| workspace_not_found(workspace_id))?;
    workspace.actor = Some(user.clone());
    info!(%workspace_id, user_id = %user.id, role = %payload.role, "logged in");

    Ok(Json(SessionResponse {
        workspace_id,
        actor: Some(user),
    }))
}

async fn register_rider(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    Json(payload): Json<RiderRegistration>,
) -> Result<(StatusCode, Json<SessionResponse>), (StatusCode, String)> {
    if !state.workspaces.read().await.contains_key(&workspace_id) {
        return Err(workspace_not_found(workspace_id));
    }

    let rider = state
        .market
        .register_rider(payload)
        .await
        .map_err(engine_error)?;

    let mut workspaces = state.workspaces.write().await;
    let workspace = workspaces
        .get_mut(&workspace_id)
        .ok_or_else(|| workspace_not_found(workspace_id))?;
    workspace.actor = Some(rider.clone());

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            workspace_id,
            actor: Some(rider),
        }),
    ))
}

async fn logout(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, (StatusCode, String)> {
    let mut workspaces = state.workspaces.write().await;
    let workspace = workspaces
        .get_mut(&workspace_id)
        .ok_or_else(|| workspace_not_found(workspace_id))?;
    let previous = std::mem::replace(workspace, state.new_workspace());
    previous.chat.reset();
    info!(%workspace_id, "logged out");

    Ok(Json(SessionResponse {
        workspace_id,
        actor: None,
    }))
}

async fn navigation(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<Json<Navigation>, (StatusCode, String)> {
    let (actor, router, _) = state.logged_in(workspace_id).await?;
    let navigation = router.navigation(actor.role()).map_err(router_error)?;
    Ok(Json(navigation))
}

async fn select_page(
    State(state): State<AppState>,
    Path((workspace_id, role)): Path<(Uuid, Role)>,
    Json(payload): Json<SelectPageRequest>,
) -> Result<Json<Navigation>, (StatusCode, String)> {
    let page = payload.page.trim();
    if page.is_empty() {
        return Err(invalid_request("page is required"));
    }

    let mut workspaces = state.workspaces.write().await;
    let workspace = workspaces
        .get_mut(&workspace_id)
        .ok_or_else(|| workspace_not_found(workspace_id))?;
    workspace
        .router
        .select_page(role, page)
        .map_err(router_error)?;
    let navigation = workspace.router.navigation(role).map_err(router_error)?;

    Ok(Json(navigation))
}

async fn current_view(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    Query(query): Query<CategoryQuery>,
) -> Result<Json<RenderedPage>, (StatusCode, String)> {
    let (actor, router, chat) = state.logged_in(workspace_id).await?;
    let market = state.market.snapshot().await;
    let actor = market.user(&actor.id).cloned().unwrap_or(actor);

    let support = match actor.role() {
        Role::Vendor => Some(chat.thread()),
        _ => None,
    };

    let page = router
        .render(&PageContext {
            actor: &actor,
            market: &market,
            support: support.as_ref(),
            category: query.category,
        })
        .map_err(router_error)?;

    Ok(Json(page))
}

async fn support_messages(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
) -> Result<Json<ChatThread>, (StatusCode, String)> {
    let chat = state.vendor_chat(workspace_id).await?;
    Ok(Json(chat.thread()))
}

async fn send_support_message(
    State(state): State<AppState>,
    Path(workspace_id): Path<Uuid>,
    Json(payload): Json<SendMessageRequest>,
) -> Result<Json<SendMessageResponse>, (StatusCode, String)> {
    let chat = state.vendor_chat(workspace_id).await?;

    // Detached so the in-flight flag is always cleared, even if the client goes away.
    let outcome = tokio::spawn({
        let chat = Arc::clone(&chat);
        async move { chat.send_message(&payload.text).await }
    })
    .await
    .map_err(internal_error)?
    .map_err(chat_error)?;

    let (outcome, reply) = match outcome {
        SendOutcome::Replied(message) => ("replied", Some(message)),
        SendOutcome::Degraded(message) => ("degraded", Some(message)),
        SendOutcome::Discarded => ("discarded", None),
    };

    Ok(Json(SendMessageResponse {
        outcome: outcome.to_string(),
        reply,
        messages: chat.messages(),
    }))
}

async fn assign_rider(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(payload): Json<AssignRiderRequest>,
) -> Result<Json<Delivery>, (StatusCode, String)> {
    let delivery = state
        .market
        .assign_rider(&order_id, payload.rider_id.trim())
        .await
        .map_err(engine_error)?;
    Ok(Json(delivery))
}

async fn set_order_status(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(payload): Json<OrderStatusRequest>,
) -> Result<Json<Order>, (StatusCode, String)> {
    let order = state
        .market
        .set_order_status(&order_id, payload.status)
        .await
        .map_err(engine_error)?;
    Ok(Json(order))
}

async fn open_delivery(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
    Json(payload): Json<OpenDeliveryRequest>,
) -> Result<(StatusCode, Json<Delivery>), (StatusCode, String)> {
    if payload.pickup_address.trim().is_empty() || payload.delivery_address.trim().is_empty() {
        return Err(invalid_request(
            "pickup_address and delivery_address are required",
        ));
    }

    let delivery = state
        .market
        .open_delivery(
            &order_id,
            payload.pickup_address.trim(),
            payload.delivery_address.trim(),
        )
        .await
        .map_err(engine_error)?;
    Ok((StatusCode::CREATED, Json(delivery)))
}

async fn accept_delivery(
    State(state): State<AppState>,
    Path(delivery_id): Path<String>,
    Json(payload): Json<AcceptDeliveryRequest>,
) -> Result<Json<Delivery>, (StatusCode, String)> {
    let delivery = state
        .market
        .accept_delivery(&delivery_id, payload.rider_id.trim())
        .await
        .map_err(engine_error)?;
    Ok(Json(delivery))
}

async fn advance_delivery(
    State(state): State<AppState>,
    Path(delivery_id): Path<String>,
    Json(payload): Json<DeliveryStatusRequest>,
) -> Result<Json<DeliveryTransitionResponse>, (StatusCode, String)> {
    let (delivery, order) = state
        .market
        .advance_delivery_status(&delivery_id, payload.status)
        .await
        .map_err(engine_error)?;
    Ok(Json(DeliveryTransitionResponse { delivery, order }))
}

async fn top_up(Json(payload): Json<TopUpRequest>) -> (StatusCode, String) {
    let Err(err) = request_top_up(payload.amount);
    match err {
        WalletError::InvalidAmount => invalid_request(err),
        WalletError::TopUpUnavailable => {
            warn!(amount = %payload.amount, "wallet top-up requested");
            (StatusCode::NOT_IMPLEMENTED, err.to_string())
        }
    }
}

async fn activity(
    State(state): State<AppState>,
) -> Result<Json<Vec<JournalEntry>>, (StatusCode, String)> {
    let entries = state
        .market
        .journal()
        .entries()
        .await
        .map_err(internal_error)?;
    Ok(Json(entries))
}

fn workspace_not_found(workspace_id: Uuid) -> (StatusCode, String) {
    (
        StatusCode::NOT_FOUND,
        format!("workspace {workspace_id} not found"),
    )
}

fn not_logged_in() -> (StatusCode, String) {
    (StatusCode::UNAUTHORIZED, "no user is logged in".to_string())
}

fn engine_error(err: EngineError) -> (StatusCode, String) {
    let status = if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_conflict() {
        StatusCode::CONFLICT
    } else if matches!(err, EngineError::InvalidRegistration(_)) {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    (status, err.to_string())
}

fn router_error(err: RouterError) -> (StatusCode, String) {
    let status = match err {
        RouterError::RoleNotConfigured(_) => StatusCode::NOT_FOUND,
        RouterError::MissingDashboard(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, err.to_string())
}

fn chat_error(err: ChatError) -> (StatusCode, String) {
    match err {
        ChatError::EmptyMessage => invalid_request(err),
        ChatError::Busy => (StatusCode::CONFLICT, err.to_string()),
    }
}

fn invalid_request<E: std::fmt::Display>(err: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, err.to_string())
}

fn internal_error<E: std::fmt::Display>(err: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
}
