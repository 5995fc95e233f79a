//! Typed client for the clinic REST backend.
//!
//! `ApiClient` owns a [`Transport`] and reads the bearer token from the
//! shared [`SessionStore`] on every call, so a login or logout takes effect
//! on the next request without rebuilding the client. Endpoint wrappers live
//! in [`endpoints`], grouped by the role that calls them.

pub mod endpoints;
pub mod error;
pub mod transport;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub use endpoints::auth::{LoginRequest, LoginResponse, RegisterRequest};
pub use error::ApiError;
pub use transport::{ApiRequest, ApiResponse, HttpTransport, Method, MockTransport, Transport};

use crate::config::AppConfig;
use crate::models::MessageResponse;
use crate::session::SessionStore;

/// Whether a call carries the session's bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Auth {
    Bearer,
    Public,
}

pub struct ApiClient {
    transport: Arc<dyn Transport>,
    session: Arc<SessionStore>,
}

impl ApiClient {
    pub fn new(transport: Arc<dyn Transport>, session: Arc<SessionStore>) -> Self {
        Self { transport, session }
    }

    /// Client talking HTTP to `config.api_base_url`.
    pub fn from_config(config: &AppConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let transport = HttpTransport::new(&config.api_base_url, config.request_timeout)?;
        Ok(Self::new(Arc::new(transport), session))
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    /// Send `request` and return the body of a 2xx response.
    ///
    /// With [`Auth::Bearer`] and no token in the session the request still
    /// goes out without the header; the backend decides.
    pub fn execute(&self, mut request: ApiRequest, auth: Auth) -> Result<Value, ApiError> {
        if auth == Auth::Bearer {
            request.bearer = self.session.token();
        }

        let response = self.transport.send(&request).map_err(|e| {
            tracing::warn!(method = request.method.as_str(), path = %request.path, error = %e, "API call failed");
            e
        })?;

        if !response.is_success() {
            let err = ApiError::from_status(response.status, &response.body);
            tracing::debug!(
                method = request.method.as_str(),
                path = %request.path,
                status = response.status,
                "API call rejected"
            );
            return Err(err);
        }
        Ok(response.body)
    }

    pub(crate) fn get<T: DeserializeOwned>(&self, path: &str, auth: Auth) -> Result<T, ApiError> {
        let body = self.execute(ApiRequest::new(Method::Get, path), auth)?;
        decode(body)
    }

    pub(crate) fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        query: Vec<(String, String)>,
        auth: Auth,
    ) -> Result<T, ApiError> {
        let mut request = ApiRequest::new(Method::Get, path);
        request.query = query;
        decode(self.execute(request, auth)?)
    }

    pub(crate) fn send_json<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        auth: Auth,
    ) -> Result<T, ApiError> {
        let mut request = ApiRequest::new(method, path);
        request.body = Some(serde_json::to_value(body)?);
        decode(self.execute(request, auth)?)
    }

    /// Write call whose reply is only a `{"msg": ...}` acknowledgement.
    pub(crate) fn send_for_message<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        auth: Auth,
    ) -> Result<MessageResponse, ApiError> {
        let mut request = ApiRequest::new(method, path);
        if let Some(body) = body {
            request.body = Some(serde_json::to_value(body)?);
        }
        Ok(decode_message(self.execute(request, auth)?))
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(ApiError::from)
}

/// Acknowledgement bodies are informational; a missing or odd body is not an error.
fn decode_message(body: Value) -> MessageResponse {
    serde_json::from_value(body).unwrap_or_default()
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::models::Role;
    use serde_json::json;

    #[test]
    fn bearer_calls_carry_session_token() {
        let (client, mock, _session) = signed_in_client(
            MockTransport::new().respond(Method::Get, "/api/admin/stats", 200, json!({})),
            Role::Admin,
        );
        client
            .execute(ApiRequest::new(Method::Get, "/api/admin/stats"), Auth::Bearer)
            .unwrap();
        assert_eq!(mock.requests()[0].bearer.as_deref(), Some("test-token"));
    }

    #[test]
    fn public_calls_never_carry_token() {
        let (client, mock, _session) = signed_in_client(
            MockTransport::new().respond(Method::Get, "/api/specializations", 200, json!([])),
            Role::Patient,
        );
        client
            .execute(ApiRequest::new(Method::Get, "/api/specializations"), Auth::Public)
            .unwrap();
        assert!(mock.requests()[0].bearer.is_none());
    }

    #[test]
    fn token_follows_session_changes() {
        let (client, mock, session) = mock_client(
            MockTransport::new().respond(Method::Get, "/api/patient/profile", 200, json!({})),
        );
        let request = || ApiRequest::new(Method::Get, "/api/patient/profile");

        client.execute(request(), Auth::Bearer).unwrap();
        session.set_session("fresh", Role::Patient, "pat").unwrap();
        client.execute(request(), Auth::Bearer).unwrap();

        let sent = mock.requests();
        assert!(sent[0].bearer.is_none());
        assert_eq!(sent[1].bearer.as_deref(), Some("fresh"));
    }

    #[test]
    fn non_success_maps_to_status_error() {
        let (client, _mock, _session) = mock_client(MockTransport::new().respond(
            Method::Get,
            "/api/admin/stats",
            403,
            json!({"msg": "Admins only"}),
        ));
        let err = client
            .execute(ApiRequest::new(Method::Get, "/api/admin/stats"), Auth::Bearer)
            .unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.server_message(), Some("Admins only"));
    }

    #[test]
    fn shape_mismatch_is_decode_error() {
        let (client, _mock, _session) = mock_client(
            MockTransport::new().respond(Method::Get, "/api/x", 200, json!({"not": "a list"})),
        );
        let err = client.get::<Vec<i64>>("/api/x", Auth::Public).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }

    #[test]
    fn empty_ack_body_is_fine() {
        let (client, _mock, _session) =
            mock_client(MockTransport::new().respond(Method::Delete, "/api/x", 200, Value::Null));
        let ack = client
            .send_for_message::<Value>(Method::Delete, "/api/x", None, Auth::Bearer)
            .unwrap();
        assert_eq!(ack.msg, "");
    }
}
