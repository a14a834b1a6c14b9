//! Request and response schema handling.
//!
//! # Design
//! Every outbound payload is a struct deriving `Serialize` and
//! `validator::Validate`. Its serde attributes are the per-endpoint rule
//! table: `rename`/`rename_all` give the wire name of each field and
//! `skip_serializing_if = "Option::is_none"` keeps absent optional fields off
//! the wire. Required fields are plain (non-`Option`) fields. Cross-field
//! rules are `#[validate(schema(...))]` functions.
//!
//! Response models derive `Deserialize` with the same alias attributes, so
//! decoding renames wire to local names exactly once.

use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::error::{SdkError, SdkErrorKind};

/// Validate `payload` and encode it as a JSON request body.
///
/// Validation runs first; a rejected payload never reaches the encoder, let
/// alone the network.
pub fn validate_and_serialize<P>(payload: &P) -> Result<String, SdkError>
where
    P: Serialize + Validate,
{
    if let Err(errors) = payload.validate() {
        tracing::debug!(%errors, "payload rejected before send");
        return Err(errors.into());
    }
    serde_json::to_string(payload).map_err(|e| {
        SdkError::new(SdkErrorKind::Serialization, format!("failed to encode payload: {e}"))
            .with_source(e)
    })
}

/// Decode the `data` member of a response into a typed result.
pub fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, SdkError> {
    serde_json::from_value(value).map_err(|e| {
        SdkError::new(SdkErrorKind::Decode, format!("response did not match the expected shape: {e}"))
            .with_source(e)
    })
}

/// Helpers for `#[validate(schema(function = ...))]` and custom field rules.
pub(crate) mod rules {
    use std::borrow::Cow;

    use validator::ValidationError;

    pub fn fail(code: &'static str, message: &'static str) -> ValidationError {
        let mut err = ValidationError::new(code);
        err.message = Some(Cow::Borrowed(message));
        err
    }

    pub fn not_blank(value: &str) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            return Err(fail("blank", "must not be blank"));
        }
        Ok(())
    }
}
