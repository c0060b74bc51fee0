//! ActionClient trait, the only API boundary between the UI core and the backend.
//! The UI depends on this crate, never on reqwest directly.

pub mod busy;
pub mod error;
pub mod http;

use std::sync::Arc;

use async_trait::async_trait;
use permit_types::{
    Ack, ActionRequest, InitialDataResponse, LoginResponse, ObservationDraft,
    OpenPermitsResponse, PermitDraft, SearchFilters, SearchResponse, UserInfo,
};
use serde::de::DeserializeOwned;

pub use busy::{BusyGuard, BusyIndicator, NoBusyIndicator};
pub use error::{excerpt, ActionError};
pub use http::{interpret_response, HttpActionClient};

pub type Result<T> = std::result::Result<T, ActionError>;

#[async_trait]
pub trait ActionClient: Send + Sync {
    /// Send one action and return the backend's JSON answer.
    ///
    /// Issues exactly one request and completes exactly once. A response
    /// reporting `status: "error"` comes back as [`ActionError::Application`].
    async fn call(&self, request: &ActionRequest) -> Result<serde_json::Value>;
}

#[async_trait]
impl<C: ActionClient + ?Sized> ActionClient for Arc<C> {
    async fn call(&self, request: &ActionRequest) -> Result<serde_json::Value> {
        (**self).call(request).await
    }
}

/// Typed wrappers, one per catalog entry.
#[async_trait]
pub trait ActionClientExt: ActionClient {
    async fn check_login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let request = ActionRequest::CheckLogin {
            username: username.to_string(),
            password: password.to_string(),
        };
        decode(self.call(&request).await?)
    }

    async fn get_initial_data(&self, user_info: &UserInfo) -> Result<InitialDataResponse> {
        let request = ActionRequest::GetInitialData {
            user_info: user_info.clone(),
        };
        decode(self.call(&request).await?)
    }

    async fn save_permit(&self, permit: &PermitDraft, user_info: &UserInfo) -> Result<Ack> {
        let request = ActionRequest::SavePermit {
            permit_object: permit.clone(),
            user_info: user_info.clone(),
        };
        decode(self.call(&request).await?)
    }

    async fn save_observation(
        &self,
        observation: &ObservationDraft,
        user_info: &UserInfo,
    ) -> Result<Ack> {
        let request = ActionRequest::SaveObservation {
            observation_object: observation.clone(),
            user_info: user_info.clone(),
        };
        decode(self.call(&request).await?)
    }

    async fn get_open_permits(&self, user_info: &UserInfo) -> Result<OpenPermitsResponse> {
        let request = ActionRequest::GetOpenPermits {
            user_info: user_info.clone(),
        };
        decode(self.call(&request).await?)
    }

    async fn close_permit(&self, permit_id: &str) -> Result<Ack> {
        let request = ActionRequest::ClosePermit {
            permit_id: permit_id.to_string(),
        };
        decode(self.call(&request).await?)
    }

    async fn search_permits(
        &self,
        filters: &SearchFilters,
        user_info: &UserInfo,
    ) -> Result<SearchResponse> {
        let request = ActionRequest::SearchPermits {
            filters: filters.clone(),
            user_info: user_info.clone(),
        };
        decode(self.call(&request).await?)
    }
}

impl<C: ActionClient + ?Sized> ActionClientExt for C {}

/// Decode a successful answer into the action's typed response.
///
/// A well-formed JSON body of the wrong shape is a malformed response too.
pub fn decode<T: DeserializeOwned>(value: serde_json::Value) -> Result<T> {
    let raw = value.to_string();
    serde_json::from_value(value).map_err(|e| {
        tracing::warn!("Response did not match the expected shape: {}", e);
        ActionError::MalformedResponse {
            excerpt: excerpt(&raw),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use permit_types::{Ack, SearchResponse};
    use serde_json::json;

    #[test]
    fn test_decode_typed_response() {
        let ack: Ack = decode(json!({"status": "success", "message": "Saved."})).unwrap();
        assert_eq!(ack.message.as_deref(), Some("Saved."));
    }

    struct Canned(serde_json::Value);

    #[async_trait]
    impl ActionClient for Canned {
        async fn call(&self, _request: &ActionRequest) -> Result<serde_json::Value> {
            Ok(self.0.clone())
        }
    }

    #[tokio::test]
    async fn test_typed_wrapper_decodes_login() {
        let client = Canned(json!({
            "status": "success",
            "userInfo": {"username": "amal", "role": "HSE", "sections": "ALL", "email": "a@x"}
        }));
        let response = client.check_login("amal", "pw").await.unwrap();
        let user = response.user_info.unwrap();
        assert_eq!(user.sections, "ALL");
        assert_eq!(user.extra["email"], "a@x");
    }

    #[test]
    fn test_decode_wrong_shape_is_malformed() {
        let err = decode::<SearchResponse>(json!({"status": "success", "permits": 7}))
            .unwrap_err();
        assert!(matches!(err, ActionError::MalformedResponse { .. }));
    }
}
