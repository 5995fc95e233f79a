//! `POST /api/login` and `POST /api/register`.

use serde::{Deserialize, Serialize};

use crate::api::{ApiClient, ApiError, Auth, Method};
use crate::models::{MessageResponse, Role};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Successful login payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub role: Role,
    pub username: String,
}

/// New accounts are always patients; the backend creates the profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl ApiClient {
    pub fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.send_json(Method::Post, "/api/login", request, Auth::Public)
    }

    pub fn register(&self, request: &RegisterRequest) -> Result<MessageResponse, ApiError> {
        self.send_for_message(Method::Post, "/api/register", Some(request), Auth::Public)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_support::mock_client;
    use crate::api::MockTransport;
    use serde_json::json;

    #[test]
    fn login_decodes_role() {
        let (client, mock, _) = mock_client(MockTransport::new().respond(
            Method::Post,
            "/api/login",
            200,
            json!({"access_token": "jwt", "role": "doctor", "username": "drwho"}),
        ));
        let response = client
            .login(&LoginRequest {
                username: "drwho".into(),
                password: "tardis".into(),
            })
            .unwrap();
        assert_eq!(response.role, Role::Doctor);
        assert_eq!(
            mock.requests()[0].body,
            Some(json!({"username": "drwho", "password": "tardis"}))
        );
    }

    #[test]
    fn register_conflict_reports_server_msg() {
        let (client, _, _) = mock_client(MockTransport::new().respond(
            Method::Post,
            "/api/register",
            400,
            json!({"msg": "Username already exists"}),
        ));
        let err = client
            .register(&RegisterRequest {
                username: "pat".into(),
                email: "p@x.org".into(),
                password: "pw".into(),
            })
            .unwrap_err();
        assert_eq!(err.server_message(), Some("Username already exists"));
    }
}
