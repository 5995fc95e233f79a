//! Endpoints for the signed-in patient under `/api/patient/`.

use crate::api::{decode, ApiClient, ApiError, ApiRequest, Auth, Method};
use crate::models::{
    Appointment, BookingRequest, ExportJob, MessageResponse, PatientProfile, RescheduleRequest,
    TreatmentRecord,
};

impl ApiClient {
    pub fn book_appointment(&self, booking: &BookingRequest) -> Result<MessageResponse, ApiError> {
        self.send_for_message(Method::Post, "/api/patient/book", Some(booking), Auth::Bearer)
    }

    pub fn patient_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.get("/api/patient/appointments", Auth::Bearer)
    }

    /// Marks the appointment Cancelled; the record is kept.
    pub fn cancel_appointment(&self, id: i64) -> Result<MessageResponse, ApiError> {
        let path = format!("/api/patient/appointment/{id}");
        self.send_for_message::<()>(Method::Delete, &path, None, Auth::Bearer)
    }

    pub fn reschedule_appointment(
        &self,
        id: i64,
        request: &RescheduleRequest,
    ) -> Result<MessageResponse, ApiError> {
        let path = format!("/api/patient/appointment/{id}");
        self.send_for_message(Method::Put, &path, Some(request), Auth::Bearer)
    }

    pub fn patient_profile(&self) -> Result<PatientProfile, ApiError> {
        self.get("/api/patient/profile", Auth::Bearer)
    }

    pub fn update_profile(&self, profile: &PatientProfile) -> Result<MessageResponse, ApiError> {
        self.send_for_message(Method::Put, "/api/patient/profile", Some(profile), Auth::Bearer)
    }

    pub fn treatment_history(&self) -> Result<Vec<TreatmentRecord>, ApiError> {
        self.get("/api/patient/treatment-history", Auth::Bearer)
    }

    /// Queue a history export; the backend produces the file asynchronously.
    pub fn request_export(&self) -> Result<ExportJob, ApiError> {
        let request = ApiRequest::new(Method::Post, "/api/patient/export");
        decode(self.execute(request, Auth::Bearer)?)
    }
}
