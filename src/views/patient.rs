//! Patient dashboard: find a doctor, book, manage own appointments, visit
//! history and profile.

use crate::models::{
    parse_form_datetime, Appointment, AppointmentStatus, Availability, BookingRequest, Doctor,
    ExportJob, PatientProfile, RescheduleRequest, TreatmentRecord,
};
use crate::views::{fetch_or_keep, ViewContext};

pub const BOOKED: &str = "Appointment Booked Successfully!";
pub const BOOKING_FAILED: &str = "Booking failed";
pub const RESCHEDULED: &str = "Appointment Rescheduled!";
pub const RESCHEDULE_FAILED: &str = "Reschedule failed";
pub const PROFILE_UPDATED: &str = "Profile updated successfully!";
pub const PROFILE_UPDATE_FAILED: &str = "Error updating profile";
pub const CANCEL_FAILED: &str = "Error cancelling appointment";
pub const EXPORT_FAILED: &str = "Export failed";
pub const INVALID_DATETIME: &str = "Please choose a valid date and time";
pub const CONFIRM_CANCEL: &str = "Are you sure you want to cancel this appointment?";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PatientTab {
    #[default]
    Book,
    Appointments,
    History,
    Profile,
}

pub struct PatientDashboard {
    ctx: ViewContext,
    pub tab: PatientTab,
    pub doctors: Vec<Doctor>,
    pub specializations: Vec<String>,
    pub appointments: Vec<Appointment>,
    pub profile: PatientProfile,
    pub history: Vec<TreatmentRecord>,
    /// Specialization chip; empty means "All".
    pub selected_specialization: String,

    /// Availability preview modal.
    pub previewed_doctor: Option<Doctor>,
    pub doctor_availability: Availability,

    /// Booking modal and its `datetime-local` field.
    pub booking_doctor: Option<Doctor>,
    pub date_time: String,

    /// Reschedule form.
    pub rescheduling: Option<Appointment>,
    pub new_date_time: String,

    pub export_job: Option<ExportJob>,
}

impl PatientDashboard {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            tab: PatientTab::default(),
            doctors: Vec::new(),
            specializations: Vec::new(),
            appointments: Vec::new(),
            profile: PatientProfile::default(),
            history: Vec::new(),
            selected_specialization: String::new(),
            previewed_doctor: None,
            doctor_availability: Availability::new(),
            booking_doctor: None,
            date_time: String::new(),
            rescheduling: None,
            new_date_time: String::new(),
            export_job: None,
        }
    }

    pub fn mount(&mut self) {
        fetch_or_keep("doctor directory", &mut self.doctors, self.ctx.api.list_doctors());
        fetch_or_keep(
            "specializations",
            &mut self.specializations,
            self.ctx.api.specializations(),
        );
        self.refresh_appointments();
        fetch_or_keep("profile", &mut self.profile, self.ctx.api.patient_profile());
    }

    pub fn select_tab(&mut self, tab: PatientTab) {
        self.tab = tab;
        if tab == PatientTab::History {
            self.load_treatment_history();
        }
    }

    pub fn refresh_appointments(&mut self) {
        fetch_or_keep(
            "patient appointments",
            &mut self.appointments,
            self.ctx.api.patient_appointments(),
        );
    }

    // ═══════════════════════════════════════════════════════════
    // Doctor directory
    // ═══════════════════════════════════════════════════════════

    pub fn select_specialization(&mut self, specialization: &str) {
        self.selected_specialization = specialization.to_string();
    }

    /// Doctors in the selected specialization (exact match), or all.
    pub fn filtered_doctors(&self) -> Vec<&Doctor> {
        self.doctors
            .iter()
            .filter(|d| {
                self.selected_specialization.is_empty()
                    || d.specialization == self.selected_specialization
            })
            .collect()
    }

    /// Replace the directory with a backend search.
    pub fn search_doctors_remote(&mut self, query: &str, specialization: &str) {
        fetch_or_keep(
            "doctor search",
            &mut self.doctors,
            self.ctx.api.search_doctors(query, specialization),
        );
    }

    /// Open the preview modal. A doctor without published availability (or
    /// a failed fetch) shows an empty grid.
    pub fn view_doctor_availability(&mut self, doctor: &Doctor) {
        self.doctor_availability = self
            .ctx
            .api
            .doctor_availability(doctor.id)
            .unwrap_or_else(|e| {
                tracing::debug!(doctor_id = doctor.id, error = %e, "No availability for doctor");
                Availability::new()
            });
        self.previewed_doctor = Some(doctor.clone());
    }

    pub fn close_preview(&mut self) {
        self.previewed_doctor = None;
    }

    /// "Proceed to Book" from the preview modal.
    pub fn proceed_to_book(&mut self) {
        if let Some(doctor) = self.previewed_doctor.take() {
            self.select_doctor_for_booking(&doctor);
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Booking
    // ═══════════════════════════════════════════════════════════

    pub fn select_doctor_for_booking(&mut self, doctor: &Doctor) {
        self.booking_doctor = Some(doctor.clone());
    }

    pub fn close_booking(&mut self) {
        self.booking_doctor = None;
    }

    pub fn book(&mut self) {
        let Some(doctor_id) = self.booking_doctor.as_ref().map(|d| d.id) else {
            return;
        };
        let Some(date_time) = parse_form_datetime(&self.date_time) else {
            self.ctx.dialogs.alert(INVALID_DATETIME);
            return;
        };

        match self.ctx.api.book_appointment(&BookingRequest { doctor_id, date_time }) {
            Ok(_) => {
                tracing::info!(doctor_id, %date_time, "Appointment booked");
                self.refresh_appointments();
                self.ctx.dialogs.alert(BOOKED);
                self.booking_doctor = None;
                self.date_time.clear();
                self.tab = PatientTab::Appointments;
            }
            Err(e) => self.ctx.dialogs.alert(&e.message_or(BOOKING_FAILED)),
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Own appointments
    // ═══════════════════════════════════════════════════════════

    pub fn cancel_appointment(&mut self, id: i64) {
        if !self.ctx.dialogs.confirm(CONFIRM_CANCEL) {
            return;
        }
        match self.ctx.api.cancel_appointment(id) {
            Ok(_) => {
                tracing::info!(appointment_id = id, "Appointment cancelled");
                self.refresh_appointments();
            }
            Err(e) => self.ctx.dialogs.alert(&e.message_or(CANCEL_FAILED)),
        }
    }

    /// Open the reschedule form. Only booked appointments can move.
    pub fn reschedule(&mut self, appointment: &Appointment) -> bool {
        if appointment.status != AppointmentStatus::Booked {
            return false;
        }
        self.rescheduling = Some(appointment.clone());
        self.new_date_time.clear();
        true
    }

    pub fn cancel_reschedule(&mut self) {
        self.rescheduling = None;
    }

    pub fn confirm_reschedule(&mut self) {
        let Some(id) = self.rescheduling.as_ref().map(|a| a.id) else {
            return;
        };
        let Some(date_time) = parse_form_datetime(&self.new_date_time) else {
            self.ctx.dialogs.alert(INVALID_DATETIME);
            return;
        };

        match self
            .ctx
            .api
            .reschedule_appointment(id, &RescheduleRequest { date_time })
        {
            Ok(_) => {
                tracing::info!(appointment_id = id, %date_time, "Appointment rescheduled");
                self.ctx.dialogs.alert(RESCHEDULED);
                self.rescheduling = None;
                self.refresh_appointments();
            }
            Err(e) => self.ctx.dialogs.alert(&e.message_or(RESCHEDULE_FAILED)),
        }
    }

    // ═══════════════════════════════════════════════════════════
    // History, profile, export
    // ═══════════════════════════════════════════════════════════

    pub fn load_treatment_history(&mut self) {
        fetch_or_keep(
            "treatment history",
            &mut self.history,
            self.ctx.api.treatment_history(),
        );
    }

    pub fn update_profile(&mut self) {
        match self.ctx.api.update_profile(&self.profile) {
            Ok(_) => self.ctx.dialogs.alert(PROFILE_UPDATED),
            Err(e) => self.ctx.dialogs.alert(&e.message_or(PROFILE_UPDATE_FAILED)),
        }
    }

    /// Ask the backend to export the visit history. The file is produced
    /// out of band; only the job id comes back.
    pub fn request_export(&mut self) {
        match self.ctx.api.request_export() {
            Ok(job) => {
                tracing::info!(task_id = %job.task_id, "History export queued");
                self.ctx.dialogs.alert(&format!("{} (task {})", job.msg, job.task_id));
                self.export_job = Some(job);
            }
            Err(e) => self.ctx.dialogs.alert(&e.message_or(EXPORT_FAILED)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{Method, MockTransport};
    use crate::models::Role;
    use crate::views::test_support::{harness, Harness};
    use crate::views::ScriptedDialogs;
    use serde_json::{json, Value};

    fn appointments_json() -> Value {
        json!([
            {"id": 5, "doctor_name": "Alice", "date_time": "2026-10-22T10:00:00", "status": "Booked", "diagnosis": null},
            {"id": 6, "doctor_name": "Bob", "date_time": "2026-09-01T09:00:00", "status": "Completed", "diagnosis": "Rash"}
        ])
    }

    fn backend() -> MockTransport {
        MockTransport::new()
            .respond(
                Method::Get,
                "/api/patient/doctors",
                200,
                json!([
                    {"id": 1, "name": "Alice", "specialization": "Cardiology"},
                    {"id": 2, "name": "Bob", "specialization": "Dermatology"}
                ]),
            )
            .respond(Method::Get, "/api/specializations", 200, json!(["Cardiology", "Dermatology"]))
            .respond(Method::Get, "/api/patient/appointments", 200, appointments_json())
            .respond(
                Method::Get,
                "/api/patient/profile",
                200,
                json!({"username": "carol", "email": "carol@mail.test", "address": "1 Main St"}),
            )
    }

    fn mounted(mock: MockTransport, dialogs: ScriptedDialogs) -> (PatientDashboard, Harness) {
        let h = harness(mock, Role::Patient, dialogs);
        let mut view = PatientDashboard::new(h.ctx.clone());
        view.mount();
        h.mock.clear_requests();
        (view, h)
    }

    #[test]
    fn mount_fetches_directory_and_own_data() {
        let (view, _h) = mounted(backend(), ScriptedDialogs::new());
        assert_eq!(view.doctors.len(), 2);
        assert_eq!(view.doctors[0].username, "Alice");
        assert_eq!(view.specializations, vec!["Cardiology", "Dermatology"]);
        assert_eq!(view.appointments.len(), 2);
        assert_eq!(view.profile.address.as_deref(), Some("1 Main St"));
        assert_eq!(view.tab, PatientTab::Book);
    }

    #[test]
    fn specialization_filter_is_exact() {
        let (mut view, _h) = mounted(backend(), ScriptedDialogs::new());
        view.select_specialization("Cardiology");
        let names: Vec<_> = view.filtered_doctors().iter().map(|d| d.username.as_str()).collect();
        assert_eq!(names, vec!["Alice"]);

        view.select_specialization("cardio");
        assert!(view.filtered_doctors().is_empty());

        view.select_specialization("");
        assert_eq!(view.filtered_doctors().len(), 2);
    }

    #[test]
    fn booking_posts_and_switches_tab() {
        let mock = backend().respond(Method::Post, "/api/patient/book", 201, json!({"msg": "Appointment booked"}));
        let (mut view, h) = mounted(mock, ScriptedDialogs::new());
        let alice = view.doctors[0].clone();
        view.select_doctor_for_booking(&alice);
        view.date_time = "2026-10-23T14:00".into();
        view.book();

        let post = &h.mock.requests_to(Method::Post, "/api/patient/book")[0];
        assert_eq!(post.body, Some(json!({"doctor_id": 1, "date_time": "2026-10-23T14:00:00"})));
        assert_eq!(post.bearer.as_deref(), Some("test-token"));
        assert_eq!(view.tab, PatientTab::Appointments);
        assert!(view.date_time.is_empty());
        assert!(view.booking_doctor.is_none());
        assert_eq!(h.dialogs.last_alert().as_deref(), Some(BOOKED));
        assert_eq!(h.mock.requests_to(Method::Get, "/api/patient/appointments").len(), 1);
    }

    #[test]
    fn booking_conflict_alerts_server_message() {
        let mock = backend().respond(
            Method::Post,
            "/api/patient/book",
            400,
            json!({"msg": "Doctor is already booked at this time"}),
        );
        let (mut view, h) = mounted(mock, ScriptedDialogs::new());
        let bob = view.doctors[1].clone();
        view.select_doctor_for_booking(&bob);
        view.date_time = "2026-10-23T14:00".into();
        view.book();

        assert_eq!(
            h.dialogs.last_alert().as_deref(),
            Some("Doctor is already booked at this time")
        );
        assert_eq!(view.tab, PatientTab::Book);
        assert!(view.booking_doctor.is_some());
        assert_eq!(view.date_time, "2026-10-23T14:00");
    }

    #[test]
    fn invalid_datetime_sends_nothing() {
        let (mut view, h) = mounted(backend(), ScriptedDialogs::new());
        let alice = view.doctors[0].clone();
        view.select_doctor_for_booking(&alice);
        view.date_time = "tomorrow".into();
        view.book();
        assert!(h.mock.requests().is_empty());
        assert_eq!(h.dialogs.last_alert().as_deref(), Some(INVALID_DATETIME));
    }

    #[test]
    fn preview_failure_yields_empty_grid() {
        let (mut view, _h) = mounted(backend(), ScriptedDialogs::new());
        view.doctor_availability.toggle("2026-10-19", "09:00");
        let bob = view.doctors[1].clone();
        view.view_doctor_availability(&bob);
        assert!(view.doctor_availability.is_empty());
        assert_eq!(view.previewed_doctor.as_ref().map(|d| d.id), Some(2));

        view.proceed_to_book();
        assert!(view.previewed_doctor.is_none());
        assert_eq!(view.booking_doctor.as_ref().map(|d| d.id), Some(2));
    }

    #[test]
    fn preview_shows_published_slots() {
        let mock = backend().respond(
            Method::Get,
            "/api/doctor/1/availability",
            200,
            json!({"2026-10-20": ["09:00", "10:00"]}),
        );
        let (mut view, h) = mounted(mock, ScriptedDialogs::new());
        let alice = view.doctors[0].clone();
        view.view_doctor_availability(&alice);
        assert_eq!(view.doctor_availability.slot_count(), 2);
        assert!(h.mock.requests()[0].bearer.is_none());
    }

    #[test]
    fn cancel_requires_confirmation() {
        let mock = backend().respond(Method::Delete, "/api/patient/appointment/5", 200, json!({"msg": "Appointment cancelled"}));
        let (mut view, h) = mounted(mock, ScriptedDialogs::new().answer(false).answer(true));

        view.cancel_appointment(5);
        assert_eq!(h.mock.count_method(Method::Delete), 0);

        view.cancel_appointment(5);
        assert_eq!(h.mock.count_method(Method::Delete), 1);
        assert_eq!(h.mock.requests_to(Method::Get, "/api/patient/appointments").len(), 1);
        assert_eq!(h.dialogs.confirms(), vec![CONFIRM_CANCEL, CONFIRM_CANCEL]);
    }

    #[test]
    fn only_booked_appointments_reschedule() {
        let mock = backend().respond(Method::Put, "/api/patient/appointment/5", 200, json!({"msg": "ok"}));
        let (mut view, h) = mounted(mock, ScriptedDialogs::new());

        let completed = view.appointments[1].clone();
        assert!(!view.reschedule(&completed));

        let booked = view.appointments[0].clone();
        assert!(view.reschedule(&booked));
        view.new_date_time = "2026-10-24T11:00".into();
        view.confirm_reschedule();

        let put = &h.mock.requests_to(Method::Put, "/api/patient/appointment/5")[0];
        assert_eq!(put.body, Some(json!({"date_time": "2026-10-24T11:00:00"})));
        assert!(view.rescheduling.is_none());
        assert_eq!(h.dialogs.last_alert().as_deref(), Some(RESCHEDULED));
    }

    #[test]
    fn reschedule_failure_keeps_form() {
        let mock = backend().respond(Method::Put, "/api/patient/appointment/5", 400, json!({}));
        let (mut view, h) = mounted(mock, ScriptedDialogs::new());
        let booked = view.appointments[0].clone();
        view.reschedule(&booked);
        view.new_date_time = "2026-10-24T11:00".into();
        view.confirm_reschedule();
        assert!(view.rescheduling.is_some());
        assert_eq!(h.dialogs.last_alert().as_deref(), Some(RESCHEDULE_FAILED));
    }

    #[test]
    fn profile_update_sends_profile() {
        let mock = backend().respond(Method::Put, "/api/patient/profile", 200, json!({"msg": "Profile updated"}));
        let (mut view, h) = mounted(mock, ScriptedDialogs::new());
        view.profile.address = Some("2 Side St".into());
        view.update_profile();
        let put = &h.mock.requests_to(Method::Put, "/api/patient/profile")[0];
        assert_eq!(put.body.as_ref().unwrap()["address"], "2 Side St");
        assert_eq!(h.dialogs.last_alert().as_deref(), Some(PROFILE_UPDATED));
    }

    #[test]
    fn history_tab_loads_records() {
        let mock = backend().respond(
            Method::Get,
            "/api/patient/treatment-history",
            200,
            json!([{"id": 6, "doctor": "Bob", "specialization": "Dermatology", "date": "2026-09-01T09:00:00", "diagnosis": "Rash"}]),
        );
        let (mut view, _h) = mounted(mock, ScriptedDialogs::new());
        view.select_tab(PatientTab::History);
        assert_eq!(view.history.len(), 1);
        assert_eq!(view.history[0].doctor.as_deref(), Some("Bob"));
    }

    #[test]
    fn export_records_job() {
        let mock = backend().respond(
            Method::Post,
            "/api/patient/export",
            202,
            json!({"msg": "Export started", "task_id": "abc-123"}),
        );
        let (mut view, h) = mounted(mock, ScriptedDialogs::new());
        view.request_export();
        assert_eq!(view.export_job.as_ref().map(|j| j.task_id.as_str()), Some("abc-123"));
        assert_eq!(h.dialogs.last_alert().as_deref(), Some("Export started (task abc-123)"));
    }

    #[test]
    fn remote_search_omits_blank_params() {
        let mock = backend().respond(
            Method::Get,
            "/api/patient/search/doctors",
            200,
            json!([{"id": 2, "name": "Bob", "specialization": "Dermatology"}]),
        );
        let (mut view, h) = mounted(mock, ScriptedDialogs::new());
        view.search_doctors_remote("", "Dermatology");
        assert_eq!(view.doctors.len(), 1);
        let sent = &h.mock.requests()[0];
        assert_eq!(sent.query, vec![("specialization".to_string(), "Dermatology".to_string())]);
        assert!(sent.bearer.is_none());
    }
}
