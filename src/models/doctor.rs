use serde::{Deserialize, Serialize};

/// Doctor as listed by the admin and public endpoints.
///
/// The public listing sends `name` instead of `username` and omits email
/// and approval state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Doctor {
    pub id: i64,
    #[serde(alias = "name")]
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub specialization: String,
    #[serde(default)]
    pub is_approved: bool,
}

/// Body for `POST /api/admin/doctors`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewDoctor {
    pub username: String,
    pub email: String,
    pub password: String,
    pub specialization: String,
}

/// Body for `PUT /api/admin/doctor/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorUpdate {
    #[serde(skip)]
    pub id: i64,
    pub username: String,
    pub email: String,
    pub specialization: String,
}

impl From<&Doctor> for DoctorUpdate {
    fn from(doctor: &Doctor) -> Self {
        Self {
            id: doctor.id,
            username: doctor.username.clone(),
            email: doctor.email.clone().unwrap_or_default(),
            specialization: doctor.specialization.clone(),
        }
    }
}
