//! Admin-only endpoints under `/api/admin/`.

use crate::api::{ApiClient, ApiError, Auth, Method};
use crate::models::{AdminStats, Appointment, Doctor, DoctorUpdate, MessageResponse, NewDoctor, Patient};

impl ApiClient {
    pub fn admin_stats(&self) -> Result<AdminStats, ApiError> {
        self.get("/api/admin/stats", Auth::Bearer)
    }

    pub fn admin_doctors(&self) -> Result<Vec<Doctor>, ApiError> {
        self.get("/api/admin/doctors", Auth::Bearer)
    }

    pub fn add_doctor(&self, doctor: &NewDoctor) -> Result<MessageResponse, ApiError> {
        self.send_for_message(Method::Post, "/api/admin/doctors", Some(doctor), Auth::Bearer)
    }

    pub fn update_doctor(&self, update: &DoctorUpdate) -> Result<MessageResponse, ApiError> {
        let path = format!("/api/admin/doctor/{}", update.id);
        self.send_for_message(Method::Put, &path, Some(update), Auth::Bearer)
    }

    /// The backend removes the doctor's account and, with it, their appointments.
    pub fn delete_doctor(&self, id: i64) -> Result<MessageResponse, ApiError> {
        let path = format!("/api/admin/doctor/{id}");
        self.send_for_message::<()>(Method::Delete, &path, None, Auth::Bearer)
    }

    pub fn admin_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.get("/api/admin/patients", Auth::Bearer)
    }

    /// Refused by the backend while the patient still has booked appointments.
    pub fn delete_patient(&self, id: i64) -> Result<MessageResponse, ApiError> {
        let path = format!("/api/admin/patient/{id}");
        self.send_for_message::<()>(Method::Delete, &path, None, Auth::Bearer)
    }

    pub fn admin_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.get("/api/admin/appointments", Auth::Bearer)
    }

    /// Server-side search: name matches `query` OR specialization matches.
    pub fn admin_search_doctors(
        &self,
        query: &str,
        specialization: &str,
    ) -> Result<Vec<Doctor>, ApiError> {
        let params = vec![
            ("q".to_string(), query.to_string()),
            ("specialization".to_string(), specialization.to_string()),
        ];
        self.get_with_query("/api/admin/search/doctors", params, Auth::Bearer)
    }

    pub fn admin_search_patients(&self, query: &str) -> Result<Vec<Patient>, ApiError> {
        let params = vec![("q".to_string(), query.to_string())];
        self.get_with_query("/api/admin/search/patients", params, Auth::Bearer)
    }
}
