//! Custom-action webhook spoken by the dialogue manager.
//!
//! `POST /webhook` carries the action name and a tracker snapshot; the answer
//! lists slot events and bot responses. `GET /actions` advertises what is
//! registered here.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shopassist_agent::{ActionOutcome, AgentRuntime, TurnInput};
use shopassist_core::{ApplicationError, ConversationContext, InterfaceError};
use tracing::warn;
use uuid::Uuid;

#[derive(Clone)]
pub struct WebhookState {
    runtime: Arc<AgentRuntime>,
}

impl WebhookState {
    pub fn new(runtime: Arc<AgentRuntime>) -> Self {
        Self { runtime }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct ActionCall {
    pub next_action: String,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub tracker: TrackerSnapshot,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct TrackerSnapshot {
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(default)]
    pub slots: BTreeMap<String, Value>,
    #[serde(default)]
    pub latest_message: LatestMessage,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct LatestMessage {
    #[serde(default)]
    pub text: Option<String>,
}

impl ActionCall {
    fn turn(&self) -> TurnInput {
        TurnInput::new(
            self.tracker.latest_message.text.clone().unwrap_or_default(),
            ConversationContext::from_slots(&self.tracker.slots),
        )
    }

    fn sender(&self) -> &str {
        self.sender_id.as_deref().or(self.tracker.sender_id.as_deref()).unwrap_or("unknown")
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ActionResponse {
    pub events: Vec<SlotEvent>,
    pub responses: Vec<BotResponse>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SlotEvent {
    pub event: &'static str,
    pub timestamp: Option<f64>,
    pub name: &'static str,
    pub value: Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BotResponse {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<&'static str>,
}

impl From<ActionOutcome> for ActionResponse {
    fn from(outcome: ActionOutcome) -> Self {
        let parse_mode = outcome.reply.is_markdown().then_some("markdown");
        let events = outcome
            .context_update
            .iter()
            .map(|update| SlotEvent {
                event: "slot",
                timestamp: None,
                name: update.slot_name(),
                value: update.value(),
            })
            .collect();

        Self { events, responses: vec![BotResponse { text: outcome.reply.text, parse_mode }] }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ActionDescriptor {
    pub name: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    action_name: Option<String>,
    correlation_id: String,
}

#[derive(Debug)]
pub struct WebhookError {
    error: InterfaceError,
    action_name: Option<String>,
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = match self.error {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
        };
        let body = ErrorBody {
            error: self.error.message().to_string(),
            action_name: self.action_name,
            correlation_id: self.error.correlation_id().to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub fn router(state: WebhookState) -> Router {
    Router::new()
        .route("/webhook", post(run_action))
        .route("/actions", get(list_actions))
        .with_state(state)
}

pub async fn run_action(
    State(state): State<WebhookState>,
    payload: Result<Json<ActionCall>, JsonRejection>,
) -> Result<Json<ActionResponse>, WebhookError> {
    let correlation_id = Uuid::new_v4().to_string();

    let Json(call) = payload.map_err(|rejection| {
        warn!(
            event_name = "server.webhook.malformed",
            correlation_id = %correlation_id,
            error = %rejection,
            "rejected malformed action call"
        );
        WebhookError {
            error: ApplicationError::MalformedTurn(rejection.body_text())
                .into_interface(&correlation_id),
            action_name: None,
        }
    })?;

    let turn = call.turn();
    tracing::debug!(
        event_name = "server.webhook.received",
        correlation_id = %correlation_id,
        sender_id = call.sender(),
        action = %call.next_action,
        "action call received"
    );

    match state.runtime.handle_turn(&call.next_action, &turn, &correlation_id) {
        Ok(outcome) => Ok(Json(ActionResponse::from(outcome))),
        Err(error) => {
            warn!(
                event_name = "server.webhook.unknown_action",
                correlation_id = %correlation_id,
                action = %call.next_action,
                error = %error,
                "action call failed"
            );
            Err(WebhookError {
                error: error.into_interface(&correlation_id),
                action_name: Some(call.next_action),
            })
        }
    }
}

pub async fn list_actions(State(state): State<WebhookState>) -> Json<Vec<ActionDescriptor>> {
    Json(
        state
            .runtime
            .registry()
            .names()
            .into_iter()
            .map(|name| ActionDescriptor { name })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        Router,
    };
    use serde_json::{json, Value};
    use shopassist_agent::AgentRuntime;
    use shopassist_core::{CatalogStore, MatchingConfig};
    use tower::ServiceExt;

    use super::{router, WebhookState};

    const ARTIFACT: &str = r#"{
        "recommender": {"p1": ["p2"]},
        "item_info": {
            "p1": {"name": "iPhone 11", "price": 400, "keywords": "iphone 11 apple phone"},
            "p2": {"name": "Dell Vostro laptop", "price": 600, "keywords": "dell vostro laptop"}
        }
    }"#;

    fn app() -> Router {
        let store = CatalogStore::from_json(ARTIFACT).expect("fixture artifact parses");
        let runtime = AgentRuntime::new(Arc::new(store), MatchingConfig::default());
        router(WebhookState::new(Arc::new(runtime)))
    }

    async fn post_json(app: Router, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/webhook")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("request");
        let response = app.oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn product_info_call_returns_markdown_reply_and_slot_event() {
        let (status, body) = post_json(
            app(),
            json!({
                "next_action": "action_get_product_info",
                "sender_id": "shopper-1",
                "tracker": {
                    "sender_id": "shopper-1",
                    "slots": {"last_product_id": null},
                    "latest_message": {"text": "Tell me about iPhone 11"}
                },
                "domain": {},
                "version": "3.6.0"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["events"],
            json!([{"event": "slot", "timestamp": null, "name": "last_product_id", "value": "p1"}])
        );
        let text = body["responses"][0]["text"].as_str().expect("text");
        assert!(text.contains("$400"));
        assert!(text.contains("Dell Vostro laptop ($600)"));
        assert_eq!(body["responses"][0]["parse_mode"], "markdown");
    }

    #[tokio::test]
    async fn follow_up_call_reads_slot_without_writing_it() {
        let (status, body) = post_json(
            app(),
            json!({
                "next_action": "action_get_last_product_details",
                "tracker": {"slots": {"last_product_id": "p2"}, "latest_message": {"text": "more?"}}
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["events"], json!([]));
        let text = body["responses"][0]["text"].as_str().expect("text");
        assert!(text.starts_with("*Dell Vostro laptop*"));
    }

    #[tokio::test]
    async fn missing_text_gets_clarification_without_parse_mode() {
        let (status, body) = post_json(
            app(),
            json!({"next_action": "action_get_product_info", "tracker": {"latest_message": {"text": null}}}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["responses"],
            json!([{"text": "Could you tell me what you're looking for?"}])
        );
    }

    #[tokio::test]
    async fn unknown_action_is_not_found() {
        let (status, body) =
            post_json(app(), json!({"next_action": "action_greet", "tracker": {}})).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["action_name"], "action_greet");
        assert!(body["error"].as_str().expect("error").contains("action_greet"));
    }

    #[tokio::test]
    async fn malformed_payload_is_bad_request() {
        let (status, body) = post_json(app(), json!({"tracker": {}})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().expect("error").starts_with("malformed turn payload"));
    }

    #[tokio::test]
    async fn lists_registered_actions() {
        let request = Request::builder().uri("/actions").body(Body::empty()).expect("request");
        let response = app().oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("json body");
        assert_eq!(
            body,
            json!([{"name": "action_get_product_info"}, {"name": "action_get_last_product_details"}])
        );
    }
}
