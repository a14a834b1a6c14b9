//! In-memory stand-in for the Siren platform API.
//!
//! Answers with the same envelope (`{data, error, errors, meta}`) and legacy
//! shapes as the real service so the SDK can be exercised end to end.
//! Everything lives in one `RwLock`ed store that is dropped with the router.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateVersion {
    pub id: String,
    pub version: i64,
    pub status: String,
    pub published_at: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub variables: Vec<Value>,
    pub tags: Vec<String>,
    pub draft_version: Option<TemplateVersion>,
    pub published_version: Option<TemplateVersion>,
    pub template_versions: Vec<TemplateVersion>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelTemplate {
    pub id: String,
    pub channel: String,
    pub configuration: Value,
    pub template_version_id: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub tag_names: Option<Vec<String>>,
    pub variables: Option<Vec<Value>>,
    pub configurations: Option<Map<String, Value>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    pub url: String,
    pub verification_key: String,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub text: String,
    pub thread_ts: String,
    pub user: String,
    pub ts: String,
}

#[derive(Clone, Debug)]
pub struct Message {
    pub status: String,
    pub replies: Vec<Reply>,
}

#[derive(Default)]
pub struct Store {
    pub templates: HashMap<String, Template>,
    pub channel_templates: Vec<ChannelTemplate>,
    pub users: HashMap<String, Map<String, Value>>,
    pub webhook: Option<WebhookConfig>,
    pub inbound_webhook: Option<WebhookConfig>,
    pub messages: HashMap<String, Message>,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    let v1 = Router::new()
        .route("/template", get(list_templates).post(create_template))
        .route("/template/{id}", put(update_template).delete(delete_template))
        .route("/template/{id}/publish", patch(publish_template))
        .route("/template/{id}/channel-templates", post(create_channel_templates))
        .route("/template/versions/{version_id}/channel-templates", get(list_channel_templates))
        .route("/send-messages", post(send_message))
        .route("/send-awesome-messages", post(send_awesome_message))
        .route("/message-status/{id}", get(message_status))
        .route("/get-reply/{id}", get(message_replies))
        .route("/users", post(upsert_user))
        .route("/users/{unique_id}", put(update_user).delete(delete_user))
        .route("/webhooks", put(configure_webhooks))
        .route("/schedules", post(create_schedule));
    let v2 = Router::new()
        .route("/workflows/trigger", post(trigger_workflow))
        .route("/workflows/trigger/bulk", post(trigger_bulk_workflow));

    Router::new()
        .nest("/api/v1/public", v1)
        .nest("/api/v2", v2)
        .fallback(|| async { (StatusCode::NOT_FOUND, "Not Found") })
        .layer(middleware::from_fn(require_bearer))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn envelope(status: StatusCode, data: Value) -> Response {
    let body = json!({"data": data, "error": null, "errors": null, "meta": null});
    (status, Json(body)).into_response()
}

fn ok(data: impl Serialize) -> Response {
    envelope(StatusCode::OK, json!(data))
}

fn fail(status: StatusCode, code: &str, message: &str) -> Response {
    let detail = json!({"errorCode": code, "message": message});
    let body = json!({"data": null, "error": detail, "errors": [detail], "meta": null});
    (status, Json(body)).into_response()
}

fn new_id(prefix: &str) -> String {
    format!("{prefix}_{}", Uuid::new_v4().simple())
}

fn now() -> String {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_secs()).unwrap_or_default();
    secs.to_string()
}

fn blank(value: Option<&Value>) -> bool {
    value.and_then(Value::as_str).map_or(true, |s| s.trim().is_empty())
}

/// Rejects requests without a bearer token using the bare error shape.
async fn require_bearer(request: Request, next: Next) -> Response {
    let authorized = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .is_some_and(|key| !key.trim().is_empty() && key != "invalid");
    if !authorized {
        let body = json!({"errorCode": "UNAUTHORISED", "message": "Invalid API Key"});
        return (StatusCode::UNAUTHORIZED, Json(body)).into_response();
    }
    next.run(request).await
}

// --- templates ---

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateFilter {
    pub tag_names: Option<String>,
    pub search: Option<String>,
    pub page: Option<usize>,
    pub size: Option<usize>,
}

async fn list_templates(State(db): State<Db>, Query(filter): Query<TemplateFilter>) -> Response {
    let store = db.read().await;
    let mut matching: Vec<Template> = store
        .templates
        .values()
        .filter(|t| filter.tag_names.as_ref().map_or(true, |tag| t.tags.contains(tag)))
        .filter(|t| filter.search.as_ref().map_or(true, |s| t.name.contains(s.as_str())))
        .cloned()
        .collect();
    matching.sort_by(|a, b| a.name.cmp(&b.name));

    let total = matching.len();
    let size = filter.size.unwrap_or(10).max(1);
    let page = filter.page.unwrap_or(0);
    let content: Vec<Template> = matching.into_iter().skip(page * size).take(size).collect();
    ok(json!({"content": content, "totalElements": total}))
}

async fn create_template(State(db): State<Db>, Json(input): Json<TemplateInput>) -> Response {
    let Some(name) = input.name.filter(|n| !n.trim().is_empty()) else {
        return fail(StatusCode::BAD_REQUEST, "BAD_REQUEST", "Template name is required");
    };
    let draft = TemplateVersion {
        id: new_id("ver"),
        version: 1,
        status: "DRAFT".to_string(),
        published_at: None,
    };
    let template = Template {
        id: new_id("tpl"),
        name,
        description: input.description,
        variables: input.variables.unwrap_or_default(),
        tags: input.tag_names.unwrap_or_default(),
        draft_version: Some(draft.clone()),
        published_version: None,
        template_versions: vec![draft.clone()],
    };

    let mut store = db.write().await;
    let created: Vec<ChannelTemplate> = input
        .configurations
        .unwrap_or_default()
        .into_iter()
        .map(|(channel, configuration)| ChannelTemplate {
            id: new_id("ct"),
            channel,
            configuration,
            template_version_id: draft.id.clone(),
        })
        .collect();
    store.channel_templates.extend(created.iter().cloned());
    store.templates.insert(template.id.clone(), template.clone());

    ok(json!({
        "templateId": template.id,
        "templateName": template.name,
        "draftVersionId": draft.id,
        "channelTemplateList": created,
    }))
}

async fn update_template(State(db): State<Db>, Path(id): Path<String>, Json(input): Json<TemplateInput>) -> Response {
    let mut store = db.write().await;
    let Some(template) = store.templates.get_mut(&id) else {
        return fail(StatusCode::NOT_FOUND, "NOT_FOUND", "Template not found");
    };
    if let Some(name) = input.name {
        template.name = name;
    }
    if let Some(description) = input.description {
        template.description = Some(description);
    }
    if let Some(tags) = input.tag_names {
        template.tags = tags;
    }
    if let Some(variables) = input.variables {
        template.variables = variables;
    }
    ok(template.clone())
}

async fn delete_template(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let mut store = db.write().await;
    match store.templates.remove(&id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => fail(StatusCode::NOT_FOUND, "NOT_FOUND", "Template not found"),
    }
}

async fn publish_template(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let mut store = db.write().await;
    let Some(template) = store.templates.get_mut(&id) else {
        return fail(StatusCode::NOT_FOUND, "NOT_FOUND", "Template not found");
    };
    let Some(mut version) = template.draft_version.take() else {
        return fail(StatusCode::BAD_REQUEST, "NOTHING_TO_PUBLISH", "Template has no draft version");
    };
    version.status = "PUBLISHED_LATEST".to_string();
    version.published_at = Some(now());
    for v in template.template_versions.iter_mut() {
        if v.id == version.id {
            *v = version.clone();
        } else if v.status == "PUBLISHED_LATEST" {
            v.status = "PUBLISHED".to_string();
        }
    }
    template.published_version = Some(version);
    ok(template.clone())
}

async fn create_channel_templates(
    State(db): State<Db>,
    Path(id): Path<String>,
    Json(channels): Json<Map<String, Value>>,
) -> Response {
    let mut store = db.write().await;
    let Some(template) = store.templates.get(&id) else {
        return fail(StatusCode::NOT_FOUND, "NOT_FOUND", "Template not found");
    };
    let Some(version_id) = template
        .draft_version
        .as_ref()
        .or(template.published_version.as_ref())
        .map(|v| v.id.clone())
    else {
        return fail(StatusCode::BAD_REQUEST, "BAD_REQUEST", "Template has no version");
    };
    if channels.is_empty() {
        return fail(StatusCode::BAD_REQUEST, "BAD_REQUEST", "At least one channel template is required");
    }

    let mut created = Vec::new();
    for (channel, configuration) in channels {
        store
            .channel_templates
            .retain(|ct| !(ct.template_version_id == version_id && ct.channel == channel));
        let ct = ChannelTemplate {
            id: new_id("ct"),
            channel,
            configuration,
            template_version_id: version_id.clone(),
        };
        store.channel_templates.push(ct.clone());
        created.push(ct);
    }
    ok(created)
}

#[derive(Deserialize)]
pub struct ChannelFilter {
    pub channel: Option<String>,
}

async fn list_channel_templates(
    State(db): State<Db>,
    Path(version_id): Path<String>,
    Query(filter): Query<ChannelFilter>,
) -> Response {
    let store = db.read().await;
    let list: Vec<&ChannelTemplate> = store
        .channel_templates
        .iter()
        .filter(|ct| ct.template_version_id == version_id)
        .filter(|ct| filter.channel.as_ref().map_or(true, |c| &ct.channel == c))
        .collect();
    ok(list)
}

// --- messaging ---

async fn record_message(db: &Db, channel: &str) -> String {
    let id = new_id("msg");
    let replies = if channel.eq_ignore_ascii_case("SLACK") {
        vec![Reply {
            text: "Thanks, received.".to_string(),
            thread_ts: "1718000000.000100".to_string(),
            user: "U0MOCKUSER".to_string(),
            ts: "1718000000.000200".to_string(),
        }]
    } else {
        Vec::new()
    };
    db.write().await.messages.insert(
        id.clone(),
        Message {
            status: "DELIVERED".to_string(),
            replies,
        },
    );
    id
}

async fn send_message(State(db): State<Db>, Json(payload): Json<Value>) -> Response {
    if blank(payload.pointer("/recipient/value")) || blank(payload.get("channel")) {
        return fail(StatusCode::BAD_REQUEST, "BAD_REQUEST", "Recipient and channel are required");
    }
    let has_body = !blank(payload.get("body"));
    let has_template = !blank(payload.pointer("/template/name"));
    if has_body == has_template {
        return fail(StatusCode::BAD_REQUEST, "BAD_REQUEST", "Exactly one of body or template is required");
    }
    let channel = payload["channel"].as_str().unwrap_or_default().to_string();
    let id = record_message(&db, &channel).await;
    ok(json!({"notificationId": id}))
}

async fn send_awesome_message(State(db): State<Db>, Json(payload): Json<Value>) -> Response {
    if blank(payload.pointer("/recipient/value")) || blank(payload.get("templateIdentifier")) {
        return fail(StatusCode::BAD_REQUEST, "BAD_REQUEST", "Recipient and template identifier are required");
    }
    let identifier = payload["templateIdentifier"].as_str().unwrap_or_default();
    if !identifier.starts_with("awesome-templates/") {
        return fail(StatusCode::NOT_FOUND, "TEMPLATE_NOT_FOUND", "No such awesome template");
    }
    let channel = payload["channel"].as_str().unwrap_or_default().to_string();
    let id = record_message(&db, &channel).await;
    ok(json!({"notificationId": id}))
}

async fn message_status(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let store = db.read().await;
    match store.messages.get(&id) {
        Some(message) => ok(json!({"status": message.status})),
        None => fail(StatusCode::NOT_FOUND, "NOT_FOUND", "Message not found"),
    }
}

/// Legacy endpoint: answers with a bare list, no envelope.
async fn message_replies(State(db): State<Db>, Path(id): Path<String>) -> Response {
    let store = db.read().await;
    match store.messages.get(&id) {
        Some(message) => Json(message.replies.clone()).into_response(),
        None => fail(StatusCode::NOT_FOUND, "NOT_FOUND", "Message not found"),
    }
}

// --- users ---

fn merge(target: &mut Map<String, Value>, patch: Map<String, Value>) {
    for (key, value) in patch {
        if !value.is_null() {
            target.insert(key, value);
        }
    }
    target.insert("updatedAt".to_string(), Value::String(now()));
}

async fn upsert_user(State(db): State<Db>, Json(payload): Json<Map<String, Value>>) -> Response {
    if blank(payload.get("uniqueId")) {
        return fail(StatusCode::BAD_REQUEST, "BAD_REQUEST", "uniqueId is required");
    }
    let unique_id = payload["uniqueId"].as_str().unwrap_or_default().to_string();
    let mut store = db.write().await;
    let user = store.users.entry(unique_id).or_insert_with(|| {
        let mut user = Map::new();
        user.insert("id".to_string(), Value::String(new_id("usr")));
        user.insert("createdAt".to_string(), Value::String(now()));
        user
    });
    merge(user, payload);
    ok(user.clone())
}

async fn update_user(
    State(db): State<Db>,
    Path(unique_id): Path<String>,
    Json(payload): Json<Map<String, Value>>,
) -> Response {
    let mut store = db.write().await;
    let Some(user) = store.users.get_mut(&unique_id) else {
        return fail(StatusCode::NOT_FOUND, "NOT_FOUND", "User not found");
    };
    merge(user, payload);
    user.insert("uniqueId".to_string(), Value::String(unique_id));
    ok(user.clone())
}

async fn delete_user(State(db): State<Db>, Path(unique_id): Path<String>) -> Response {
    let mut store = db.write().await;
    match store.users.remove(&unique_id) {
        Some(_) => StatusCode::NO_CONTENT.into_response(),
        None => fail(StatusCode::NOT_FOUND, "NOT_FOUND", "User not found"),
    }
}

// --- webhooks ---

/// Keeps the verification key when the URL is unchanged.
fn upsert_webhook(slot: &mut Option<WebhookConfig>, url: &str) -> WebhookConfig {
    match slot {
        Some(existing) if existing.url == url => existing.clone(),
        _ => {
            let config = WebhookConfig {
                url: url.to_string(),
                verification_key: Uuid::new_v4().simple().to_string(),
            };
            *slot = Some(config.clone());
            config
        }
    }
}

async fn configure_webhooks(State(db): State<Db>, Json(payload): Json<Value>) -> Response {
    let notifications = payload.pointer("/webhookConfig/url").and_then(Value::as_str);
    let inbound = payload.pointer("/inboundWebhookConfig/url").and_then(Value::as_str);
    if notifications.is_none() && inbound.is_none() {
        return fail(StatusCode::BAD_REQUEST, "BAD_REQUEST", "No webhook configuration given");
    }
    if notifications
        .into_iter()
        .chain(inbound)
        .any(|url| !(url.starts_with("http://") || url.starts_with("https://")))
    {
        // Legacy bare error shape.
        let body = json!({"error": "Bad Request", "message": "Invalid URL"});
        return (StatusCode::BAD_REQUEST, Json(body)).into_response();
    }

    let mut store = db.write().await;
    if let Some(url) = notifications {
        upsert_webhook(&mut store.webhook, url);
    }
    if let Some(url) = inbound {
        upsert_webhook(&mut store.inbound_webhook, url);
    }
    ok(json!({
        "id": "wh_default",
        "webhookConfig": store.webhook,
        "inboundWebhookConfig": store.inbound_webhook,
    }))
}

// --- workflows ---

async fn trigger_workflow(Json(payload): Json<Value>) -> Response {
    if blank(payload.get("workflowName")) {
        return fail(StatusCode::BAD_REQUEST, "BAD_REQUEST", "workflowName is required");
    }
    ok(json!({"requestId": new_id("req"), "workflowExecutionId": new_id("exec")}))
}

async fn trigger_bulk_workflow(Json(payload): Json<Value>) -> Response {
    if blank(payload.get("workflowName")) {
        return fail(StatusCode::BAD_REQUEST, "BAD_REQUEST", "workflowName is required");
    }
    let Some(notify) = payload.get("notify").and_then(Value::as_array).filter(|n| !n.is_empty()) else {
        return fail(StatusCode::BAD_REQUEST, "BAD_REQUEST", "notify must be a non-empty list");
    };
    let ids: Vec<String> = notify.iter().map(|_| new_id("exec")).collect();
    ok(json!({"requestId": new_id("req"), "workflowExecutionIds": ids}))
}

async fn create_schedule(Json(payload): Json<Map<String, Value>>) -> Response {
    const REQUIRED: [&str; 6] = ["name", "type", "startDate", "scheduleTime", "timezoneId", "workflowId"];
    if let Some(missing) = REQUIRED.iter().find(|key| blank(payload.get(**key))) {
        return fail(StatusCode::BAD_REQUEST, "BAD_REQUEST", &format!("{missing} is required"));
    }
    let mut schedule = payload;
    schedule.insert("id".to_string(), Value::String(new_id("sch")));
    schedule.insert("createdAt".to_string(), Value::String(now()));
    ok(schedule)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_serializes_with_wire_names() {
        let template = Template {
            id: "tpl_1".to_string(),
            name: "Welcome".to_string(),
            description: None,
            variables: Vec::new(),
            tags: vec!["welcome".to_string()],
            draft_version: None,
            published_version: None,
            template_versions: Vec::new(),
        };
        let json = serde_json::to_value(&template).unwrap();
        assert_eq!(json["id"], "tpl_1");
        assert!(json.get("templateVersions").is_some());
        assert!(json.get("draftVersion").is_some());
    }

    #[test]
    fn webhook_upsert_keeps_key_for_same_url() {
        let mut slot = None;
        let first = upsert_webhook(&mut slot, "https://example.com/hook");
        let second = upsert_webhook(&mut slot, "https://example.com/hook");
        assert_eq!(first, second);

        let moved = upsert_webhook(&mut slot, "https://example.com/other");
        assert_ne!(moved.verification_key, first.verification_key);
    }

    #[test]
    fn merge_skips_nulls_and_stamps_update() {
        let mut user = Map::new();
        user.insert("firstName".to_string(), json!("John"));
        let mut patch = Map::new();
        patch.insert("firstName".to_string(), Value::Null);
        patch.insert("lastName".to_string(), json!("Doe"));
        merge(&mut user, patch);
        assert_eq!(user["firstName"], "John");
        assert_eq!(user["lastName"], "Doe");
        assert!(user.contains_key("updatedAt"));
    }

    #[test]
    fn blank_detects_missing_and_whitespace() {
        assert!(blank(None));
        assert!(blank(Some(&json!("  "))));
        assert!(blank(Some(&json!(3))));
        assert!(!blank(Some(&json!("x"))));
    }
}
