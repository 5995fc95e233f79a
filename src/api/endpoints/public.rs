//! Unauthenticated endpoints: doctor directory, specializations, availability preview.

use crate::api::{ApiClient, ApiError, Auth};
use crate::models::{Availability, Doctor};

impl ApiClient {
    /// Approved doctors only.
    pub fn list_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        self.get("/api/patient/doctors", Auth::Public)
    }

    /// Empty arguments are omitted and do not narrow the result.
    pub fn search_doctors(&self, query: &str, specialization: &str) -> Result<Vec<Doctor>, ApiError> {
        let params = [("q", query), ("specialization", specialization)]
            .into_iter()
            .filter(|(_, value)| !value.trim().is_empty())
            .map(|(key, value)| (key.to_string(), value.trim().to_string()))
            .collect();
        self.get_with_query("/api/patient/search/doctors", params, Auth::Public)
    }

    pub fn specializations(&self) -> Result<Vec<String>, ApiError> {
        self.get("/api/specializations", Auth::Public)
    }

    pub fn doctor_availability(&self, doctor_id: i64) -> Result<Availability, ApiError> {
        self.get(&format!("/api/doctor/{doctor_id}/availability"), Auth::Public)
    }
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::mock_client;
    use crate::api::{Method, MockTransport};
    use serde_json::json;

    #[test]
    fn directory_accepts_public_shape() {
        let (client, mock, _) = mock_client(MockTransport::new().respond(
            Method::Get,
            "/api/patient/doctors",
            200,
            json!([{"id": 1, "name": "alice", "specialization": "Cardio"}]),
        ));
        let doctors = client.list_doctors().unwrap();
        assert_eq!(doctors[0].username, "alice");
        assert!(mock.requests()[0].bearer.is_none());
    }

    #[test]
    fn search_omits_blank_params() {
        let (client, mock, _) = mock_client(MockTransport::new().respond(
            Method::Get,
            "/api/patient/search/doctors",
            200,
            json!([]),
        ));
        client.search_doctors("  ", "Derm").unwrap();
        assert_eq!(
            mock.requests()[0].query,
            vec![("specialization".to_string(), "Derm".to_string())]
        );
    }
}
