//! Admin dashboard: overview counters, doctor and patient registries, and
//! the global appointment list.
//!
//! Writes are followed by a refetch of every list they can affect; nothing is
//! patched locally.

use crate::models::{AdminStats, Appointment, Doctor, DoctorUpdate, NewDoctor, Patient};
use crate::views::{fetch_or_keep, ViewContext};

pub const DOCTOR_ADDED: &str = "Doctor added successfully!";
pub const DOCTOR_UPDATED: &str = "Doctor updated successfully!";
pub const ADD_DOCTOR_FAILED: &str = "Error adding doctor";
pub const UPDATE_DOCTOR_FAILED: &str = "Error updating doctor";
pub const DELETE_DOCTOR_FAILED: &str = "Error deleting doctor";
pub const DELETE_PATIENT_FAILED: &str = "Error deleting patient";
pub const CONFIRM_DELETE_DOCTOR: &str =
    "Are you sure you want to remove this doctor? This cannot be undone.";
pub const CONFIRM_DELETE_PATIENT: &str =
    "Are you sure you want to remove this patient? This will delete all their appointments.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdminTab {
    #[default]
    Overview,
    Doctors,
    Patients,
    Appointments,
}

pub struct AdminDashboard {
    ctx: ViewContext,
    pub tab: AdminTab,
    pub stats: AdminStats,
    pub doctors: Vec<Doctor>,
    pub patients: Vec<Patient>,
    pub appointments: Vec<Appointment>,
    pub doctor_search: String,
    pub patient_search: String,
    /// Add-doctor modal form.
    pub new_doctor: NewDoctor,
    pub show_add_doctor: bool,
    /// Edit-doctor modal; `Some` while open.
    pub editing_doctor: Option<DoctorUpdate>,
    pub loading: bool,
}

impl AdminDashboard {
    pub fn new(ctx: ViewContext) -> Self {
        Self {
            ctx,
            tab: AdminTab::default(),
            stats: AdminStats::default(),
            doctors: Vec::new(),
            patients: Vec::new(),
            appointments: Vec::new(),
            doctor_search: String::new(),
            patient_search: String::new(),
            new_doctor: NewDoctor::default(),
            show_add_doctor: false,
            editing_doctor: None,
            loading: false,
        }
    }

    pub fn mount(&mut self) {
        self.loading = true;
        self.refresh_stats();
        self.refresh_doctors();
        self.refresh_patients();
        self.refresh_appointments();
        self.loading = false;
        tracing::debug!(
            doctors = self.doctors.len(),
            patients = self.patients.len(),
            appointments = self.appointments.len(),
            "Admin dashboard loaded"
        );
    }

    pub fn select_tab(&mut self, tab: AdminTab) {
        self.tab = tab;
    }

    pub fn refresh_stats(&mut self) {
        fetch_or_keep("admin stats", &mut self.stats, self.ctx.api.admin_stats());
    }

    pub fn refresh_doctors(&mut self) {
        fetch_or_keep("doctors", &mut self.doctors, self.ctx.api.admin_doctors());
    }

    pub fn refresh_patients(&mut self) {
        fetch_or_keep("patients", &mut self.patients, self.ctx.api.admin_patients());
    }

    pub fn refresh_appointments(&mut self) {
        fetch_or_keep(
            "appointments",
            &mut self.appointments,
            self.ctx.api.admin_appointments(),
        );
    }

    // ═══════════════════════════════════════════════════════════
    // Local filters
    // ═══════════════════════════════════════════════════════════

    /// Doctors whose username or specialization contains the search text,
    /// ignoring case.
    pub fn filtered_doctors(&self) -> Vec<&Doctor> {
        let needle = self.doctor_search.to_lowercase();
        self.doctors
            .iter()
            .filter(|d| {
                needle.is_empty()
                    || d.username.to_lowercase().contains(&needle)
                    || d.specialization.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Patients whose username or email contains the search text, ignoring
    /// case.
    pub fn filtered_patients(&self) -> Vec<&Patient> {
        let needle = self.patient_search.to_lowercase();
        self.patients
            .iter()
            .filter(|p| {
                needle.is_empty()
                    || p.username.to_lowercase().contains(&needle)
                    || p.email.to_lowercase().contains(&needle)
            })
            .collect()
    }

    // ═══════════════════════════════════════════════════════════
    // Server-side search
    // ═══════════════════════════════════════════════════════════

    pub fn search_doctors_remote(&mut self, query: &str, specialization: &str) {
        fetch_or_keep(
            "doctor search",
            &mut self.doctors,
            self.ctx.api.admin_search_doctors(query, specialization),
        );
    }

    pub fn search_patients_remote(&mut self, query: &str) {
        fetch_or_keep(
            "patient search",
            &mut self.patients,
            self.ctx.api.admin_search_patients(query),
        );
    }

    // ═══════════════════════════════════════════════════════════
    // Doctor CRUD
    // ═══════════════════════════════════════════════════════════

    pub fn open_add_doctor(&mut self) {
        self.show_add_doctor = true;
    }

    pub fn close_add_doctor(&mut self) {
        self.show_add_doctor = false;
    }

    pub fn add_doctor(&mut self) {
        match self.ctx.api.add_doctor(&self.new_doctor) {
            Ok(_) => {
                tracing::info!(username = %self.new_doctor.username, "Doctor added");
                self.new_doctor = NewDoctor::default();
                self.show_add_doctor = false;
                self.refresh_doctors();
                self.refresh_stats();
                self.ctx.dialogs.alert(DOCTOR_ADDED);
            }
            Err(e) => self.ctx.dialogs.alert(&e.message_or(ADD_DOCTOR_FAILED)),
        }
    }

    /// Open the edit modal on a copy of `doctor`.
    pub fn edit_doctor(&mut self, doctor: &Doctor) {
        self.editing_doctor = Some(DoctorUpdate::from(doctor));
    }

    pub fn cancel_edit(&mut self) {
        self.editing_doctor = None;
    }

    /// Save the edit modal. The modal stays open when the update fails.
    pub fn update_doctor(&mut self) {
        let Some(update) = self.editing_doctor.clone() else {
            return;
        };
        match self.ctx.api.update_doctor(&update) {
            Ok(_) => {
                tracing::info!(doctor_id = update.id, "Doctor updated");
                self.editing_doctor = None;
                self.refresh_doctors();
                self.ctx.dialogs.alert(DOCTOR_UPDATED);
            }
            Err(e) => {
                tracing::warn!(doctor_id = update.id, error = %e, "Doctor update failed");
                self.ctx.dialogs.alert(UPDATE_DOCTOR_FAILED);
            }
        }
    }

    /// Remove a doctor after confirmation. The backend drops the doctor's
    /// appointments too, so those are refetched as well.
    pub fn delete_doctor(&mut self, id: i64) {
        if !self.ctx.dialogs.confirm(CONFIRM_DELETE_DOCTOR) {
            return;
        }
        match self.ctx.api.delete_doctor(id) {
            Ok(_) => {
                tracing::info!(doctor_id = id, "Doctor removed");
                self.refresh_doctors();
                self.refresh_stats();
                self.refresh_appointments();
            }
            Err(e) => self.ctx.dialogs.alert(&e.message_or(DELETE_DOCTOR_FAILED)),
        }
    }

    pub fn delete_patient(&mut self, id: i64) {
        if !self.ctx.dialogs.confirm(CONFIRM_DELETE_PATIENT) {
            return;
        }
        match self.ctx.api.delete_patient(id) {
            Ok(_) => {
                tracing::info!(patient_id = id, "Patient removed");
                self.refresh_patients();
                self.refresh_stats();
                self.refresh_appointments();
            }
            Err(e) => self.ctx.dialogs.alert(&e.message_or(DELETE_PATIENT_FAILED)),
        }
    }
}
