use serde::{Deserialize, Serialize};

/// Patient row from the admin registry or a doctor's roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    #[serde(default)]
    pub user_id: Option<i64>,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
    /// Only present in the doctor's roster.
    #[serde(default)]
    pub total_appointments: Option<u32>,
}

/// The signed-in patient's editable profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Option<String>,
}

/// A completed visit as returned by the history endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreatmentRecord {
    pub id: i64,
    #[serde(default)]
    pub doctor: Option<String>,
    #[serde(default)]
    pub specialization: Option<String>,
    pub date: String,
    #[serde(default)]
    pub diagnosis: Option<String>,
    #[serde(default)]
    pub prescription: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Export job accepted by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportJob {
    #[serde(default)]
    pub msg: String,
    pub task_id: String,
}
