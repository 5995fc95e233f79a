use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::enums::AppointmentStatus;

/// Accepted `datetime-local` input shapes, most specific first.
const FORM_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"];

/// Appointment as returned by the admin, doctor and patient listings.
///
/// Each listing fills a different subset of the optional fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doctor_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_name: Option<String>,
    pub date_time: NaiveDateTime,
    pub status: AppointmentStatus,
    /// Absent keys stay absent on write: the backend overwrites every key
    /// it receives, null included.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prescription: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Appointment {
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Body for `POST /api/patient/book`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub doctor_id: i64,
    pub date_time: NaiveDateTime,
}

/// Body for `PUT /api/patient/appointment/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub date_time: NaiveDateTime,
}

/// Parse the value of a `datetime-local` style form field.
pub fn parse_form_datetime(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    FORM_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn doctor_listing_shape() {
        let appt: Appointment = serde_json::from_str(
            r#"{"id":7,"patient_name":"pat","patient_id":2,"date_time":"2026-10-20T09:00:00",
                "status":"Booked","diagnosis":null,"prescription":null}"#,
        )
        .unwrap();
        assert_eq!(appt.patient_id, Some(2));
        assert_eq!(appt.status, AppointmentStatus::Booked);
        assert!(!appt.is_terminal());
    }

    #[test]
    fn keys_never_received_are_not_written_back() {
        let appt: Appointment = serde_json::from_str(
            r#"{"id":7,"patient_name":"pat","patient_id":2,"date_time":"2026-10-20T09:00:00","status":"Booked"}"#,
        )
        .unwrap();
        let value = serde_json::to_value(&appt).unwrap();
        for key in ["diagnosis", "prescription", "notes", "doctor_id", "doctor_name"] {
            assert!(value.get(key).is_none(), "{key} should be omitted");
        }
        assert_eq!(value["status"], "Booked");
    }

    #[test]
    fn isoformat_with_microseconds_parses() {
        let appt: Appointment = serde_json::from_str(
            r#"{"id":1,"doctor_name":"alice","date_time":"2026-10-20T09:00:00.250000","status":"Completed"}"#,
        )
        .unwrap();
        assert!(appt.is_terminal());
    }

    #[test]
    fn booking_body_serializes_iso_datetime() {
        let body = BookingRequest {
            doctor_id: 3,
            date_time: NaiveDate::from_ymd_opt(2026, 10, 20)
                .unwrap()
                .and_hms_opt(9, 30, 0)
                .unwrap(),
        };
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["doctor_id"], 3);
        assert_eq!(value["date_time"], "2026-10-20T09:30:00");
    }

    #[test]
    fn form_datetime_accepts_minute_precision() {
        let parsed = parse_form_datetime("2026-10-20T14:00").unwrap();
        assert_eq!(parsed.to_string(), "2026-10-20 14:00:00");
        assert!(parse_form_datetime("2026-10-20T14:00:30").is_some());
        assert!(parse_form_datetime("").is_none());
        assert!(parse_form_datetime("tomorrow").is_none());
    }
}
