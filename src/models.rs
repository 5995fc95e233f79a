//! Transit DTOs for the clinic REST API.
//!
//! Nothing here is authoritative: every list is replaced wholesale on the
//! next fetch.

pub mod appointment;
pub mod availability;
pub mod doctor;
pub mod enums;
pub mod patient;
pub mod stats;

pub use appointment::{parse_form_datetime, Appointment, BookingRequest, RescheduleRequest};
pub use availability::{availability_days, Availability, AvailabilityDay, TIME_SLOTS};
pub use doctor::{Doctor, DoctorUpdate, NewDoctor};
pub use enums::{AppointmentStatus, InvalidEnum, Role};
pub use patient::{ExportJob, Patient, PatientProfile, TreatmentRecord};
pub use stats::AdminStats;

use serde::{Deserialize, Serialize};

/// Generic `{"msg": ...}` body the backend returns for writes and errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub msg: String,
}
