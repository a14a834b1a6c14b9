//! End-to-end test of the blocking client against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every domain
//! operation over real HTTP through `SirenClient` and its `ureq` transport.
//! The core's payload shaping and response interpretation are checked
//! against the same wire shapes the platform uses.

use std::net::SocketAddr;

use serde_json::{json, Map, Value};
use siren::models::{
    ChannelTemplateQuery, CreateChannelTemplatesRequest, CreateTemplateRequest, ProviderCode, ProviderIntegration,
    Recipient, ScheduleType, ScheduleWorkflowRequest, SendAwesomeTemplateRequest, SendMessageRequest, TemplateQuery,
    TemplateRef, TemplateVariable, TriggerBulkWorkflowRequest, TriggerWorkflowRequest, UpdateTemplateRequest,
    UserRequest,
};
use siren::{ClientConfig, SdkErrorKind, SirenClient, SirenError};

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

fn client_for(addr: SocketAddr, api_key: &str) -> SirenClient {
    let config = ClientConfig::builder()
        .api_key(api_key)
        .base_url(format!("http://{addr}"))
        .build_with(|_| None)
        .unwrap();
    SirenClient::new(&config)
}

fn obj(value: Value) -> Map<String, Value> {
    value.as_object().cloned().unwrap()
}

#[test]
fn template_lifecycle() {
    let client = client_for(start_server(), "test_api_key");
    let templates = client.templates();

    // Step 1: create a template with one channel configuration.
    let mut request = CreateTemplateRequest::new("Welcome");
    request.tag_names = Some(vec!["welcome".to_string()]);
    request.variables = Some(vec![TemplateVariable::with_default("user_name", "Guest")]);
    request.configurations = Some([("EMAIL".to_string(), json!({"subject": "Hello", "channel": "EMAIL"}))].into());
    let created = templates.create(&request).unwrap();
    assert_eq!(created.template_name, "Welcome");
    assert_eq!(created.channel_template_list.len(), 1);

    // Step 2: it shows up in a filtered listing.
    let query = TemplateQuery {
        tag_names: Some("welcome".to_string()),
        page: Some(0),
        size: Some(10),
        ..TemplateQuery::default()
    };
    let listed = templates.list(&query).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].variables[0].default_value.as_deref(), Some("Guest"));

    // Step 3: update the description.
    let update = UpdateTemplateRequest {
        description: Some("Sent on signup".to_string()),
        ..UpdateTemplateRequest::default()
    };
    let updated = templates.update(&created.template_id, &update).unwrap();
    assert_eq!(updated.description.as_deref(), Some("Sent on signup"));

    // Step 4: add an SMS channel template and list by channel.
    let channels = CreateChannelTemplatesRequest::default().channel("SMS", json!({"body": "Hi", "channel": "SMS"}));
    let added = templates.create_channel_templates(&created.template_id, &channels).unwrap();
    assert_eq!(added[0].channel, "SMS");
    let sms = templates
        .channel_templates(
            &created.draft_version_id,
            &ChannelTemplateQuery {
                channel: Some("SMS".to_string()),
                ..ChannelTemplateQuery::default()
            },
        )
        .unwrap();
    assert_eq!(sms.len(), 1);
    assert_eq!(sms[0].configuration["body"], "Hi");

    // Step 5: publish.
    let published = templates.publish(&created.template_id).unwrap();
    assert_eq!(published.published_version.unwrap().id, created.draft_version_id);

    // Step 6: delete, then delete again.
    assert!(templates.delete(&created.template_id).unwrap());
    let err = templates.delete(&created.template_id).unwrap_err();
    assert_eq!(err.error_code(), Some("NOT_FOUND"));
    assert_eq!(err.status(), Some(404));
}

#[test]
fn messaging_round_trip() {
    let client = client_for(start_server(), "test_api_key");
    let messages = client.messages();

    let id = messages
        .send(&SendMessageRequest {
            recipient: Recipient::direct("U01UBCD06BB"),
            channel: "SLACK".to_string(),
            body: None,
            template: Some(TemplateRef {
                name: "test_template".to_string(),
            }),
            template_variables: Some(obj(json!({"name": "John Doe"}))),
        })
        .unwrap();
    assert!(id.starts_with("msg_"));

    assert_eq!(messages.status(&id).unwrap(), "DELIVERED");

    // The replies endpoint answers with a bare list.
    let replies = messages.replies(&id).unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0].thread_ts.as_deref(), Some("1718000000.000100"));

    let awesome = messages
        .send_awesome_template(&SendAwesomeTemplateRequest {
            recipient: Recipient::direct("someone@example.com"),
            channel: "EMAIL".to_string(),
            template_identifier: "awesome-templates/customer-support/escalation_required/official/casual.yaml"
                .to_string(),
            template_variables: None,
            provider_integration: ProviderIntegration::pair(
                Some("py-sdk-test-mailgun".to_string()),
                Some(ProviderCode::EmailMailgun),
            )
            .unwrap(),
        })
        .unwrap();
    assert!(messages.replies(&awesome).unwrap().is_empty());

    let err = messages.status("msg_unknown").unwrap_err();
    assert!(err.is_api());
    assert_eq!(err.error_code(), Some("NOT_FOUND"));
}

#[test]
fn validation_failures_are_never_sent() {
    let client = client_for(start_server(), "test_api_key");
    let err = client
        .messages()
        .send(&SendMessageRequest {
            recipient: Recipient::user_id("user_1"),
            channel: "EMAIL".to_string(),
            body: None,
            template: None,
            template_variables: None,
        })
        .unwrap_err();
    let SirenError::Sdk(sdk) = err else {
        panic!("expected SDK error");
    };
    assert_eq!(sdk.kind, SdkErrorKind::Validation);
    assert!(!sdk.was_sent());
}

#[test]
fn user_lifecycle() {
    let client = client_for(start_server(), "test_api_key");
    let users = client.users();

    let mut request = UserRequest::new("user_123");
    request.first_name = Some("John".to_string());
    request.email = Some("john.doe@example.com".to_string());
    request.attributes = Some(obj(json!({"plan": "pro"})));
    let added = users.add(&request).unwrap();
    assert_eq!(added.unique_id, "user_123");
    assert!(added.id.is_some());

    let update = UserRequest {
        last_name: Some("Doe".to_string()),
        active: Some(false),
        ..UserRequest::new("user_123")
    };
    let updated = users.update("user_123", &update).unwrap();
    assert_eq!(updated.first_name.as_deref(), Some("John"));
    assert_eq!(updated.last_name.as_deref(), Some("Doe"));
    assert_eq!(updated.active, Some(false));

    assert!(users.delete("user_123").unwrap());
    let err = users.update("user_123", &update).unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[test]
fn webhook_configuration_is_idempotent() {
    let client = client_for(start_server(), "test_api_key");
    let webhooks = client.webhooks();

    let first = webhooks.configure_notifications("https://example.com/hook").unwrap();
    let second = webhooks.configure_notifications("https://example.com/hook").unwrap();
    assert_eq!(first, second);
    assert!(first.verification_key.is_some());

    let inbound = webhooks.configure_inbound("https://example.com/inbound").unwrap();
    assert_eq!(inbound.url, "https://example.com/inbound");
}

#[test]
fn workflows() {
    let client = client_for(start_server(), "test_api_key");
    let workflows = client.workflows();

    let execution = workflows
        .trigger(&TriggerWorkflowRequest {
            workflow_name: "test_otp_workflow".to_string(),
            data: Some(obj(json!({"subject": "otp verification"}))),
            notify: Some(obj(json!({"notificationType": "email", "recipient": "example@example.com"}))),
        })
        .unwrap();
    assert!(!execution.workflow_execution_id.is_empty());

    let bulk = workflows
        .trigger_bulk(&TriggerBulkWorkflowRequest {
            workflow_name: "test_otp_workflow".to_string(),
            notify: vec![obj(json!({"email": "a@example.com"})), obj(json!({"email": "b@example.com"}))],
            data: Some(obj(json!({"subject": "otp verification"}))),
        })
        .unwrap();
    assert_eq!(bulk.workflow_execution_ids.len(), 2);

    let schedule = workflows
        .schedule(&ScheduleWorkflowRequest {
            name: "sampleWorkflow123".to_string(),
            schedule_type: ScheduleType::Once,
            input_data: Some(obj(json!({"type": "order_reminder"}))),
            start_date: "2025-08-01".to_string(),
            end_date: None,
            schedule_time: "10:00:00".to_string(),
            timezone_id: "Asia/Kolkata".to_string(),
            workflow_id: "acd59a55-1072-41a7-90d9-5554b21aef1b".to_string(),
        })
        .unwrap();
    assert!(schedule.id.starts_with("sch_"));
    assert_eq!(schedule.schedule_type, ScheduleType::Once);
}

#[test]
fn rejected_api_key_is_api_error() {
    let client = client_for(start_server(), "invalid");
    let err = client.templates().list(&TemplateQuery::default()).unwrap_err();
    let SirenError::Api(api) = err else {
        panic!("expected API error");
    };
    assert_eq!(api.error_code, "UNAUTHORISED");
    assert_eq!(api.status, 401);
    assert_eq!(api.human_message(), "Invalid API Key");
}

#[test]
fn connection_refused_is_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let client = client_for(addr, "test_api_key");
    let err = client.messages().status("msg_1").unwrap_err();
    let SirenError::Sdk(sdk) = err else {
        panic!("expected SDK error");
    };
    assert_eq!(sdk.kind, SdkErrorKind::Transport);
    assert!(sdk.was_sent());
    client.close();
}
