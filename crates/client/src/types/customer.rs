//! Customer display types.

use chrono::{DateTime, NaiveDate, Utc};
use tillpoint_core::{CustomerId, CustomerStatus, Money};

/// Customer as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: CustomerStatus,
    pub is_vip: bool,
    pub total_orders: u32,
    pub total_spent: Money,
    pub last_order: Option<DateTime<Utc>>,
    /// Date part of the creation timestamp.
    pub join_date: Option<NaiveDate>,
    pub gender: String,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Customer create/update form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub status: Option<CustomerStatus>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Filters for the customer listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerFilters {
    pub search: Option<String>,
    pub status: Option<CustomerStatus>,
    pub ordering: String,
    pub page: u32,
}

impl Default for CustomerFilters {
    fn default() -> Self {
        Self {
            search: None,
            status: None,
            ordering: "name".to_string(),
            page: 1,
        }
    }
}
