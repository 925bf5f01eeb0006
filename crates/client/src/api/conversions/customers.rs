//! Customer translation.

use tillpoint_core::CustomerStatus;

use super::{ValidationError, count, date, money, text, timestamp};
use crate::api::records::{CustomerPayload, CustomerRecord};
use crate::types::{Customer, CustomerDraft};

/// Wire customer to display customer.
///
/// # Errors
///
/// Returns `ValidationError` for a malformed `total_spent`, order count or date.
pub fn customer_from_record(record: CustomerRecord) -> Result<Customer, ValidationError> {
    let status = record.status.unwrap_or_default();
    let is_vip = record
        .is_vip
        .unwrap_or(matches!(status, CustomerStatus::Vip));

    Ok(Customer {
        id: record.id,
        name: record.name,
        email: text(record.email.as_ref()),
        phone: text(record.phone.as_ref()),
        address: text(record.address.as_ref()),
        status,
        is_vip,
        total_orders: count("total_orders", record.total_orders.as_ref())?,
        total_spent: money("total_spent", record.total_spent.as_ref())?,
        last_order: timestamp("last_order_date", record.last_order_date.as_deref())?,
        join_date: date("created_at", record.created_at.as_deref())?,
        gender: text(record.gender.as_ref()),
        date_of_birth: date("date_of_birth", record.date_of_birth.as_deref())?,
        created_at: timestamp("created_at", record.created_at.as_deref())?,
        updated_at: timestamp("updated_at", record.updated_at.as_deref())?,
    })
}

/// Create/update form to request body.
///
/// Status defaults to `active`, gender to empty and date of birth to `null`.
#[must_use]
pub fn customer_draft_to_payload(draft: &CustomerDraft) -> CustomerPayload {
    CustomerPayload {
        name: draft.name.trim().to_string(),
        email: draft.email.trim().to_string(),
        phone: draft.phone.trim().to_string(),
        address: draft.address.clone(),
        status: draft.status.clone().unwrap_or_default(),
        gender: draft.gender.clone().unwrap_or_default(),
        date_of_birth: draft
            .date_of_birth
            .map(|dob| dob.format("%Y-%m-%d").to_string()),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tillpoint_core::{CustomerId, Money};

    #[test]
    fn test_customer_defaults() {
        let record: CustomerRecord =
            serde_json::from_str(r#"{"id": 4, "name": "Esi"}"#).unwrap();
        let customer = customer_from_record(record).unwrap();
        assert_eq!(customer.id, CustomerId::new(4));
        assert_eq!(customer.status, CustomerStatus::Active);
        assert_eq!(customer.total_spent, Money::ZERO);
        assert_eq!(customer.total_orders, 0);
        assert_eq!(customer.gender, "");
        assert!(customer.join_date.is_none());
        assert!(!customer.is_vip);
    }

    #[test]
    fn test_customer_full() {
        let record: CustomerRecord = serde_json::from_str(
            r#"{"id": 9, "name": "Yaw", "email": "yaw@example.com", "status": "vip",
                "total_spent": "1520.75", "total_orders": 31,
                "created_at": "2023-11-02T14:30:00Z", "date_of_birth": "1990-06-15"}"#,
        )
        .unwrap();
        let customer = customer_from_record(record).unwrap();
        assert!(customer.is_vip);
        assert_eq!(customer.total_spent, Money::from_minor(152_075));
        assert_eq!(customer.total_orders, 31);
        assert_eq!(customer.join_date, NaiveDate::from_ymd_opt(2023, 11, 2));
        assert_eq!(customer.date_of_birth, NaiveDate::from_ymd_opt(1990, 6, 15));
    }

    #[test]
    fn test_malformed_total_spent() {
        let record: CustomerRecord =
            serde_json::from_str(r#"{"id": 1, "total_spent": "lots"}"#).unwrap();
        let err = customer_from_record(record).unwrap_err();
        assert_eq!(err.field, "total_spent");
    }

    #[test]
    fn test_draft_to_payload() {
        let payload = customer_draft_to_payload(&CustomerDraft {
            name: "Akosua".to_string(),
            email: "akosua@example.com".to_string(),
            ..CustomerDraft::default()
        });
        assert_eq!(payload.status, CustomerStatus::Active);
        assert_eq!(payload.gender, "");
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["date_of_birth"], serde_json::Value::Null);
        assert_eq!(json["status"], "active");
    }
}
