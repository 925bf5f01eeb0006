//! Customer records.

use tillpoint_core::CustomerId;
use tracing::instrument;

use super::conversions::{customer_draft_to_payload, customer_from_record};
use super::records::{CustomerRecord, Listing};
use super::{ApiClient, ApiError, ApiRequest, Query};
use crate::types::{Customer, CustomerDraft, CustomerFilters, Page};

impl ApiClient {
    /// List customers matching the filters.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    #[instrument(skip(self, filters))]
    pub async fn list_customers(
        &self,
        filters: &CustomerFilters,
    ) -> Result<Page<Customer>, ApiError> {
        let query = Query::new()
            .push_opt("search", filters.search.as_deref())
            .push_opt("status", filters.status.as_ref())
            .push("ordering", &filters.ordering)
            .push("page", filters.page.max(1));

        let listing: Listing<CustomerRecord> = self
            .send_json(ApiRequest::get("customers/").query(query))
            .await?;
        Ok(listing.into_page().try_map(customer_from_record)?)
    }

    /// Fetch a customer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the customer does not exist.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn get_customer(&self, id: CustomerId) -> Result<Customer, ApiError> {
        let record: CustomerRecord = self
            .send_json(ApiRequest::get(format!("customers/{id}/")))
            .await?;
        Ok(customer_from_record(record)?)
    }

    /// Create a customer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server's field errors on rejection.
    #[instrument(skip(self, draft), fields(name = %draft.name))]
    pub async fn create_customer(&self, draft: &CustomerDraft) -> Result<Customer, ApiError> {
        let request = ApiRequest::post("customers/").json(&customer_draft_to_payload(draft))?;
        let record: CustomerRecord = self.send_json(request).await?;
        Ok(customer_from_record(record)?)
    }

    /// Replace a customer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server's field errors on rejection.
    #[instrument(skip(self, draft), fields(customer_id = %id))]
    pub async fn update_customer(
        &self,
        id: CustomerId,
        draft: &CustomerDraft,
    ) -> Result<Customer, ApiError> {
        let request =
            ApiRequest::put(format!("customers/{id}/")).json(&customer_draft_to_payload(draft))?;
        let record: CustomerRecord = self.send_json(request).await?;
        Ok(customer_from_record(record)?)
    }

    /// Delete a customer.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the customer does not exist.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn delete_customer(&self, id: CustomerId) -> Result<(), ApiError> {
        self.send_empty(ApiRequest::delete(format!("customers/{id}/")))
            .await
    }
}
