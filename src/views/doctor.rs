//! Doctor dashboard: schedule, upcoming week, patient roster and the weekly
//! availability editor.

use chrono::{Local, NaiveDate};

use crate::models::{availability_days, Appointment, Availability, AvailabilityDay, Patient, TreatmentRecord};
use crate::views::{fetch_or_keep, ViewContext};

pub const APPOINTMENT_UPDATED: &str = "Appointment updated successfully!";
pub const UPDATE_APPOINTMENT_FAILED: &str = "Error updating appointment";
pub const AVAILABILITY_SAVED: &str = "Availability saved successfully!";
pub const SAVE_AVAILABILITY_FAILED: &str = "Error saving availability";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DoctorTab {
    #[default]
    Appointments,
    Upcoming,
    Patients,
    Availability,
}

/// History of one patient, opened from the roster.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientHistory {
    pub patient_id: i64,
    pub records: Vec<TreatmentRecord>,
}

pub struct DoctorDashboard {
    ctx: ViewContext,
    pub tab: DoctorTab,
    pub appointments: Vec<Appointment>,
    pub upcoming: Vec<Appointment>,
    pub patients: Vec<Patient>,
    /// Appointment open in the editor.
    pub editing: Option<Appointment>,
    pub days: Vec<AvailabilityDay>,
    pub availability: Availability,
    /// Set after a successful save, cleared by the next toggle.
    pub availability_saved: bool,
    pub history: Option<PatientHistory>,
}

impl DoctorDashboard {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            tab: DoctorTab::default(),
            appointments: Vec::new(),
            upcoming: Vec::new(),
            patients: Vec::new(),
            editing: None,
            days: Vec::new(),
            availability: Availability::new(),
            availability_saved: false,
            history: None,
        }
    }

    pub fn mount(&mut self) {
        self.mount_on(Local::now().date_naive());
    }

    /// [`mount`](Self::mount) with an explicit first day for the grid.
    pub fn mount_on(&mut self, today: NaiveDate) {
        self.refresh_appointments();
        self.days = availability_days(today);
        fetch_or_keep(
            "availability",
            &mut self.availability,
            self.ctx.api.own_availability(),
        );
    }

    /// Switch tabs; the upcoming and roster tabs fetch on every visit.
    pub fn select_tab(&mut self, tab: DoctorTab) {
        self.tab = tab;
        match tab {
            DoctorTab::Upcoming => self.refresh_upcoming(),
            DoctorTab::Patients => self.refresh_patients(),
            DoctorTab::Appointments | DoctorTab::Availability => {}
        }
    }

    pub fn refresh_appointments(&mut self) {
        fetch_or_keep(
            "doctor appointments",
            &mut self.appointments,
            self.ctx.api.doctor_appointments(),
        );
    }

    pub fn refresh_upcoming(&mut self) {
        fetch_or_keep(
            "upcoming appointments",
            &mut self.upcoming,
            self.ctx.api.doctor_upcoming_appointments(),
        );
    }

    pub fn refresh_patients(&mut self) {
        fetch_or_keep("patient roster", &mut self.patients, self.ctx.api.doctor_patients());
    }

    // ═══════════════════════════════════════════════════════════
    // Appointment editor
    // ═══════════════════════════════════════════════════════════

    /// Open `appointment` in the editor. Completed and cancelled
    /// appointments are read-only; returns whether the editor opened.
    pub fn edit_appointment(&mut self, appointment: &Appointment) -> bool {
        if appointment.is_terminal() {
            tracing::debug!(appointment_id = appointment.id, status = %appointment.status, "Appointment is read-only");
            return false;
        }
        self.editing = Some(appointment.clone());
        true
    }

    /// "Manage" from the upcoming list: edit on the schedule tab.
    pub fn manage_upcoming(&mut self, appointment: &Appointment) {
        if self.edit_appointment(appointment) {
            self.tab = DoctorTab::Appointments;
        }
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Write the whole edited record back.
    pub fn save_appointment(&mut self) {
        let Some(edited) = self.editing.clone() else {
            return;
        };
        match self.ctx.api.update_appointment(&edited) {
            Ok(_) => {
                tracing::info!(appointment_id = edited.id, status = %edited.status, "Appointment updated");
                self.ctx.dialogs.alert(APPOINTMENT_UPDATED);
                self.editing = None;
                self.refresh_appointments();
                if self.tab == DoctorTab::Upcoming {
                    self.refresh_upcoming();
                }
            }
            Err(e) => self.ctx.dialogs.alert(&e.message_or(UPDATE_APPOINTMENT_FAILED)),
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Availability
    // ═══════════════════════════════════════════════════════════

    pub fn is_slot_selected(&self, date: &str, slot: &str) -> bool {
        self.availability.is_selected(date, slot)
    }

    pub fn toggle_slot(&mut self, date: &str, slot: &str) {
        self.availability.toggle(date, slot);
        self.availability_saved = false;
    }

    pub fn save_availability(&mut self) {
        match self.ctx.api.save_availability(&self.availability) {
            Ok(_) => {
                tracing::info!(slots = self.availability.slot_count(), "Availability saved");
                self.availability_saved = true;
                self.ctx.dialogs.alert(AVAILABILITY_SAVED);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Availability save failed");
                self.ctx.dialogs.alert(SAVE_AVAILABILITY_FAILED);
            }
        }
    }

    // ═══════════════════════════════════════════════════════════
    // Patient history
    // ═══════════════════════════════════════════════════════════

    /// Load completed visits of `patient_id` with this doctor.
    pub fn view_patient_history(&mut self, patient_id: i64) {
        match self.ctx.api.patient_history(patient_id) {
            Ok(records) => self.history = Some(PatientHistory { patient_id, records }),
            Err(e) => self.ctx.dialogs.alert(&e.message_or("Error loading patient history")),
        }
    }

    pub fn close_history(&mut self) {
        self.history = None;
    }
}
