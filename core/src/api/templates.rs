use crate::endpoint::{segment, Endpoint, V1_PREFIX};
use crate::error::Result;
use crate::executor::{Call, RequestExecutor};
use crate::models::{
    ChannelTemplate, ChannelTemplateQuery, CreateChannelTemplatesRequest, CreateTemplateRequest, CreatedTemplate,
    Template, TemplateListing, TemplateQuery, UpdateTemplateRequest,
};

/// Template CRUD, publishing and channel templates.
#[derive(Debug, Clone, Copy)]
pub struct TemplateCalls<'a> {
    exec: &'a RequestExecutor,
}

impl<'a> TemplateCalls<'a> {
    pub fn new(exec: &'a RequestExecutor) -> Self {
        Self { exec }
    }

    pub fn list(&self, query: &TemplateQuery) -> Result<Call<Vec<Template>>> {
        let endpoint = Endpoint::get(format!("{V1_PREFIX}/template"))
            .query_opt("tagNames", query.tag_names.as_deref())
            .query_opt("search", query.search.as_deref())
            .query_opt("sort", query.sort.as_deref())
            .query_opt("page", query.page)
            .query_opt("size", query.size);
        Ok(self
            .exec
            .prepare_empty::<TemplateListing>(endpoint)?
            .map(TemplateListing::into_templates))
    }

    pub fn create(&self, request: &CreateTemplateRequest) -> Result<Call<CreatedTemplate>> {
        self.exec
            .prepare(Endpoint::post(format!("{V1_PREFIX}/template")), Some(request))
    }

    pub fn update(&self, template_id: &str, request: &UpdateTemplateRequest) -> Result<Call<Template>> {
        let endpoint = Endpoint::put(format!("{V1_PREFIX}/template/{}", segment(template_id)));
        self.exec.prepare(endpoint, Some(request))
    }

    /// Resolves to `true` once the service confirms the deletion.
    pub fn delete(&self, template_id: &str) -> Result<Call<bool>> {
        let endpoint = Endpoint::delete(format!("{V1_PREFIX}/template/{}", segment(template_id))).expect_no_content(204);
        Ok(self.exec.prepare_confirmation(endpoint)?.map(|_| true))
    }

    pub fn publish(&self, template_id: &str) -> Result<Call<Template>> {
        let endpoint = Endpoint::patch(format!("{V1_PREFIX}/template/{}/publish", segment(template_id)));
        self.exec.prepare_empty(endpoint)
    }

    pub fn create_channel_templates(
        &self,
        template_id: &str,
        request: &CreateChannelTemplatesRequest,
    ) -> Result<Call<Vec<ChannelTemplate>>> {
        let endpoint = Endpoint::post(format!("{V1_PREFIX}/template/{}/channel-templates", segment(template_id)));
        self.exec.prepare(endpoint, Some(request))
    }

    pub fn channel_templates(&self, version_id: &str, query: &ChannelTemplateQuery) -> Result<Call<Vec<ChannelTemplate>>> {
        let endpoint = Endpoint::get(format!(
            "{V1_PREFIX}/template/versions/{}/channel-templates",
            segment(version_id)
        ))
        .query_opt("channel", query.channel.as_deref())
        .query_opt("search", query.search.as_deref())
        .query_opt("sort", query.sort.as_deref())
        .query_opt("page", query.page)
        .query_opt("size", query.size);
        self.exec.prepare_empty(endpoint)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::testing::{body, executor, ok};
    use crate::error::SdkErrorKind;
    use crate::http::{HttpMethod, HttpResponse};

    #[test]
    fn list_sends_only_given_filters() {
        let exec = executor();
        let query = TemplateQuery {
            tag_names: Some("welcome".to_string()),
            page: Some(0),
            size: Some(10),
            ..TemplateQuery::default()
        };
        let call = exec.templates().list(&query).unwrap();
        assert_eq!(
            call.request().url,
            "https://api.dev.trysiren.io/api/v1/public/template?tagNames=welcome&page=0&size=10"
        );
        let templates = call
            .finish(ok(json!({"content": [{"id": "tpl_1", "name": "Welcome"}], "totalElements": 1})))
            .unwrap();
        assert_eq!(templates[0].id, "tpl_1");
    }

    #[test]
    fn create_posts_payload() {
        let exec = executor();
        let call = exec.templates().create(&CreateTemplateRequest::new("Welcome")).unwrap();
        assert_eq!(call.request().method, HttpMethod::Post);
        assert_eq!(body(call.request()), json!({"name": "Welcome"}));
        let created = call
            .finish(ok(json!({
                "templateId": "tpl_1",
                "templateName": "Welcome",
                "draftVersionId": "ver_1",
                "channelTemplateList": []
            })))
            .unwrap();
        assert_eq!(created.draft_version_id, "ver_1");
    }

    #[test]
    fn delete_yields_true_on_204() {
        let exec = executor();
        let call = exec.templates().delete("tpl_1").unwrap();
        assert_eq!(call.request().method, HttpMethod::Delete);
        assert!(call.request().body.is_none());
        assert!(call.finish(HttpResponse::new(204, "")).unwrap());
    }

    #[test]
    fn publish_is_patch_without_body() {
        let exec = executor();
        let call = exec.templates().publish("tpl_1").unwrap();
        assert_eq!(call.request().method, HttpMethod::Patch);
        assert_eq!(call.request().url, "https://api.dev.trysiren.io/api/v1/public/template/tpl_1/publish");
        assert_eq!(call.request().header("content-type"), None);
        let template = call
            .finish(ok(json!({"id": "tpl_1", "name": "Welcome", "publishedVersion": {"id": "ver_1"}})))
            .unwrap();
        assert_eq!(template.published_version.unwrap().id, "ver_1");
    }

    #[test]
    fn channel_template_calls() {
        let exec = executor();
        let request = CreateChannelTemplatesRequest::default().channel("SMS", json!({"body": "Hi", "channel": "SMS"}));
        let call = exec.templates().create_channel_templates("tpl_1", &request).unwrap();
        assert_eq!(
            call.request().url,
            "https://api.dev.trysiren.io/api/v1/public/template/tpl_1/channel-templates"
        );
        assert_eq!(body(call.request())["SMS"]["body"], "Hi");

        let query = ChannelTemplateQuery {
            channel: Some("EMAIL".to_string()),
            ..ChannelTemplateQuery::default()
        };
        let call = exec.templates().channel_templates("ver_1", &query).unwrap();
        assert_eq!(
            call.request().url,
            "https://api.dev.trysiren.io/api/v1/public/template/versions/ver_1/channel-templates?channel=EMAIL"
        );
        let list = call
            .finish(ok(json!([{"id": "ct_1", "channel": "EMAIL", "configuration": {"subject": "Hello"}}])))
            .unwrap();
        assert_eq!(list[0].configuration["subject"], "Hello");
    }

    #[test]
    fn empty_channel_templates_are_rejected_locally() {
        let exec = executor();
        let err = exec
            .templates()
            .create_channel_templates("tpl_1", &CreateChannelTemplatesRequest::default())
            .unwrap_err();
        assert_eq!(err.sdk_kind(), Some(SdkErrorKind::Validation));
    }
}
