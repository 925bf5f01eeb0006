//! Staff accounts.

use serde::{Deserialize, Serialize};
use tillpoint_core::{StaffId, StaffRole};

/// A staff account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffMember {
    pub id: StaffId,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub role: Option<StaffRole>,
    #[serde(default)]
    pub employee_id: Option<String>,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_active: bool,
}

/// Staff create/update form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaffDraft {
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub last_name: String,
    pub role: StaffRole,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub phone: String,
}

/// Role choice offered by `staff/roles/`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleOption {
    pub value: StaffRole,
    pub label: String,
}
