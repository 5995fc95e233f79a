use serde::{Deserialize, Serialize};

/// Aggregate counters for the admin overview. Missing counters read as 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminStats {
    pub total_doctors: u64,
    pub total_patients: u64,
    pub total_appointments: u64,
    pub today_appointments: u64,
    pub completed_appointments: u64,
}
