use crate::endpoint::{Endpoint, BULK_TIMEOUT, V1_PREFIX, V2_PREFIX};
use crate::error::Result;
use crate::executor::{Call, RequestExecutor};
use crate::models::{
    BulkWorkflowExecution, ScheduleWorkflowRequest, TriggerBulkWorkflowRequest, TriggerWorkflowRequest,
    WorkflowExecution, WorkflowSchedule,
};

#[derive(Debug, Clone, Copy)]
pub struct WorkflowCalls<'a> {
    exec: &'a RequestExecutor,
}

impl<'a> WorkflowCalls<'a> {
    pub fn new(exec: &'a RequestExecutor) -> Self {
        Self { exec }
    }

    pub fn trigger(&self, request: &TriggerWorkflowRequest) -> Result<Call<WorkflowExecution>> {
        self.exec
            .prepare(Endpoint::post(format!("{V2_PREFIX}/workflows/trigger")), Some(request))
    }

    /// Fan out one execution per `notify` entry. Uses the longer bulk timeout.
    pub fn trigger_bulk(&self, request: &TriggerBulkWorkflowRequest) -> Result<Call<BulkWorkflowExecution>> {
        let endpoint = Endpoint::post(format!("{V2_PREFIX}/workflows/trigger/bulk")).timeout(BULK_TIMEOUT);
        self.exec.prepare(endpoint, Some(request))
    }

    pub fn schedule(&self, request: &ScheduleWorkflowRequest) -> Result<Call<WorkflowSchedule>> {
        self.exec
            .prepare(Endpoint::post(format!("{V1_PREFIX}/schedules")), Some(request))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use super::*;
    use crate::api::testing::{body, executor, ok};
    use crate::endpoint::DEFAULT_TIMEOUT;
    use crate::error::SdkErrorKind;
    use crate::models::ScheduleType;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn trigger_uses_v2_and_default_timeout() {
        let exec = executor();
        let request = TriggerWorkflowRequest {
            workflow_name: "test_otp_workflow".to_string(),
            data: Some(obj(json!({"subject": "otp verification"}))),
            notify: Some(obj(json!({"notificationType": "email", "recipient": "example@example.com"}))),
        };
        let call = exec.workflows().trigger(&request).unwrap();
        assert_eq!(call.request().url, "https://api.dev.trysiren.io/api/v2/workflows/trigger");
        assert_eq!(call.request().timeout, DEFAULT_TIMEOUT);
        let execution = call
            .finish(ok(json!({"requestId": "req_1", "workflowExecutionId": "exec_1"})))
            .unwrap();
        assert_eq!(execution.workflow_execution_id, "exec_1");
    }

    #[test]
    fn bulk_trigger_uses_bulk_timeout() {
        let exec = executor();
        let request = TriggerBulkWorkflowRequest {
            workflow_name: "wf".to_string(),
            notify: vec![obj(json!({"email": "a@example.com"})), obj(json!({"email": "b@example.com"}))],
            data: Some(obj(json!({"common": true}))),
        };
        let call = exec.workflows().trigger_bulk(&request).unwrap();
        assert_eq!(call.request().url, "https://api.dev.trysiren.io/api/v2/workflows/trigger/bulk");
        assert_eq!(call.request().timeout, BULK_TIMEOUT);
        let sent = body(call.request());
        assert_eq!(sent["workflowName"], "wf");
        assert_eq!(sent["notify"].as_array().unwrap().len(), 2);
        assert_eq!(sent["data"], json!({"common": true}));
        let result = call
            .finish(ok(json!({"requestId": "req_2", "workflowExecutionIds": ["e1", "e2"]})))
            .unwrap();
        assert_eq!(result.workflow_execution_ids, vec!["e1", "e2"]);
    }

    #[test]
    fn schedule_rejects_blank_timezone() {
        let exec = executor();
        let request = ScheduleWorkflowRequest {
            name: "nightly".to_string(),
            schedule_type: ScheduleType::Daily,
            input_data: None,
            start_date: "2024-06-11".to_string(),
            end_date: None,
            schedule_time: "21:31:00".to_string(),
            timezone_id: " ".to_string(),
            workflow_id: "wf_1".to_string(),
        };
        let err = exec.workflows().schedule(&request).unwrap_err();
        assert_eq!(err.sdk_kind(), Some(SdkErrorKind::Validation));

        let request = ScheduleWorkflowRequest {
            timezone_id: "Asia/Kolkata".to_string(),
            ..request
        };
        let call = exec.workflows().schedule(&request).unwrap();
        assert_eq!(call.request().url, "https://api.dev.trysiren.io/api/v1/public/schedules");
        let schedule = call
            .finish(ok(json!({
                "id": "sch_1",
                "name": "nightly",
                "type": "DAILY",
                "startDate": "2024-06-11",
                "scheduleTime": "21:31:00",
                "timezoneId": "Asia/Kolkata",
                "workflowId": "wf_1"
            })))
            .unwrap();
        assert_eq!(schedule.schedule_type, ScheduleType::Daily);
    }
}
