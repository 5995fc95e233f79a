//! Endpoints for the signed-in doctor under `/api/doctor/`.

use crate::api::{ApiClient, ApiError, Auth, Method};
use crate::models::{Appointment, Availability, MessageResponse, Patient, TreatmentRecord};

impl ApiClient {
    pub fn doctor_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.get("/api/doctor/appointments", Auth::Bearer)
    }

    /// Booked appointments in the next seven days, ordered by time.
    pub fn doctor_upcoming_appointments(&self) -> Result<Vec<Appointment>, ApiError> {
        self.get("/api/doctor/appointments/upcoming", Auth::Bearer)
    }

    /// Full-record overwrite: status, diagnosis, prescription and notes are
    /// all sent as they are in `appointment`.
    pub fn update_appointment(&self, appointment: &Appointment) -> Result<MessageResponse, ApiError> {
        let path = format!("/api/doctor/appointment/{}", appointment.id);
        self.send_for_message(Method::Put, &path, Some(appointment), Auth::Bearer)
    }

    pub fn doctor_patients(&self) -> Result<Vec<Patient>, ApiError> {
        self.get("/api/doctor/patients", Auth::Bearer)
    }

    /// Completed visits of `patient_id` with this doctor.
    pub fn patient_history(&self, patient_id: i64) -> Result<Vec<TreatmentRecord>, ApiError> {
        self.get(&format!("/api/doctor/patient/{patient_id}/history"), Auth::Bearer)
    }

    pub fn own_availability(&self) -> Result<Availability, ApiError> {
        self.get("/api/doctor/availability", Auth::Bearer)
    }

    /// Replaces the server copy wholesale.
    pub fn save_availability(&self, availability: &Availability) -> Result<MessageResponse, ApiError> {
        self.send_for_message(Method::Post, "/api/doctor/availability", Some(availability), Auth::Bearer)
    }
}
