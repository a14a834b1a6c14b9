use crate::endpoint::{segment, Endpoint, V1_PREFIX};
use crate::error::Result;
use crate::executor::{Call, RequestExecutor};
use crate::models::{User, UserRequest};

#[derive(Debug, Clone, Copy)]
pub struct UserCalls<'a> {
    exec: &'a RequestExecutor,
}

impl<'a> UserCalls<'a> {
    pub fn new(exec: &'a RequestExecutor) -> Self {
        Self { exec }
    }

    /// Create the user, or update it when `unique_id` already exists.
    pub fn add(&self, request: &UserRequest) -> Result<Call<User>> {
        self.exec.prepare(Endpoint::post(format!("{V1_PREFIX}/users")), Some(request))
    }

    /// Update the user addressed by `unique_id`. The id travels both in the
    /// path and in the body.
    pub fn update(&self, unique_id: &str, request: &UserRequest) -> Result<Call<User>> {
        let endpoint = Endpoint::put(format!("{V1_PREFIX}/users/{}", segment(unique_id)));
        self.exec.prepare(endpoint, Some(request))
    }

    pub fn delete(&self, unique_id: &str) -> Result<Call<bool>> {
        let endpoint = Endpoint::delete(format!("{V1_PREFIX}/users/{}", segment(unique_id))).expect_no_content(204);
        Ok(self.exec.prepare_confirmation(endpoint)?.map(|_| true))
    }
}
