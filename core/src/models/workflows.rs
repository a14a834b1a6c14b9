use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use validator::Validate;

use crate::schema::rules;

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TriggerWorkflowRequest {
    #[validate(custom(function = "rules::not_blank"))]
    pub workflow_name: String,
    /// Common data for the execution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
    /// Execution-specific data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify: Option<Map<String, Value>>,
}

/// One execution per `notify` entry, all sharing `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct TriggerBulkWorkflowRequest {
    #[validate(custom(function = "rules::not_blank"))]
    pub workflow_name: String,
    #[validate(length(min = 1, message = "bulk trigger needs at least one notify entry"))]
    pub notify: Vec<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowExecution {
    pub request_id: String,
    pub workflow_execution_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkWorkflowExecution {
    pub request_id: String,
    #[serde(default)]
    pub workflow_execution_ids: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum ScheduleType {
    Once,
    Daily,
    Weekly,
    Monthly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleWorkflowRequest {
    #[validate(custom(function = "rules::not_blank"))]
    pub name: String,
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_data: Option<Map<String, Value>>,
    #[validate(custom(function = "rules::not_blank"))]
    pub start_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[validate(custom(function = "rules::not_blank"))]
    pub schedule_time: String,
    #[validate(custom(function = "rules::not_blank"))]
    pub timezone_id: String,
    #[validate(custom(function = "rules::not_blank"))]
    pub workflow_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSchedule {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub schedule_type: ScheduleType,
    #[serde(default)]
    pub input_data: Option<Map<String, Value>>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    pub schedule_time: String,
    pub timezone_id: String,
    pub workflow_id: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn trigger_minimal_payload() {
        let req = TriggerWorkflowRequest {
            workflow_name: "test_otp_workflow".to_string(),
            data: None,
            notify: None,
        };
        assert_eq!(serde_json::to_value(&req).unwrap(), json!({"workflowName": "test_otp_workflow"}));
    }

    #[test]
    fn bulk_requires_notify_entries() {
        let req = TriggerBulkWorkflowRequest {
            workflow_name: "wf".to_string(),
            notify: Vec::new(),
            data: None,
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn bulk_payload_keeps_notify_and_data() {
        let req = TriggerBulkWorkflowRequest {
            workflow_name: "wf".to_string(),
            notify: vec![obj(json!({"email": "a@example.com"})), obj(json!({"email": "b@example.com"}))],
            data: Some(obj(json!({"template": "welcome"}))),
        };
        assert!(req.validate().is_ok());
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["notify"].as_array().unwrap().len(), 2);
        assert_eq!(json["data"], json!({"template": "welcome"}));
    }

    #[test]
    fn schedule_payload_shape() {
        let req = ScheduleWorkflowRequest {
            name: "sampleWorkflow123".to_string(),
            schedule_type: ScheduleType::Daily,
            input_data: Some(obj(json!({"type": "daily_summary"}))),
            start_date: "2024-06-11".to_string(),
            end_date: None,
            schedule_time: "21:31:00".to_string(),
            timezone_id: "Asia/Kolkata".to_string(),
            workflow_id: "acd59a55-1072-41a7-90d9-5554b21aef1b".to_string(),
        };
        assert!(req.validate().is_ok());
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "name": "sampleWorkflow123",
                "type": "DAILY",
                "inputData": {"type": "daily_summary"},
                "startDate": "2024-06-11",
                "scheduleTime": "21:31:00",
                "timezoneId": "Asia/Kolkata",
                "workflowId": "acd59a55-1072-41a7-90d9-5554b21aef1b"
            })
        );
    }

    #[test]
    fn schedule_type_parses_case_insensitively() {
        assert_eq!("daily".parse::<ScheduleType>().unwrap(), ScheduleType::Daily);
        assert_eq!("ONCE".parse::<ScheduleType>().unwrap(), ScheduleType::Once);
        assert!("HOURLY".parse::<ScheduleType>().is_err());
    }
}
