//! Staff accounts.

use tillpoint_core::StaffId;
use tracing::instrument;

use super::records::Listing;
use super::{ApiClient, ApiError, ApiRequest, Query};
use crate::types::{Page, RoleOption, StaffDraft, StaffMember};

impl ApiClient {
    /// List staff accounts.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or decode failure.
    #[instrument(skip(self))]
    pub async fn list_staff(&self, search: Option<&str>, page: u32) -> Result<Page<StaffMember>, ApiError> {
        let query = Query::new()
            .push_opt("search", search)
            .push("page", page.max(1));
        let listing: Listing<StaffMember> = self
            .send_json(ApiRequest::get("staff/").query(query))
            .await?;
        Ok(listing.into_page())
    }

    /// Fetch a staff account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the account does not exist.
    #[instrument(skip(self), fields(staff_id = %id))]
    pub async fn get_staff(&self, id: StaffId) -> Result<StaffMember, ApiError> {
        self.send_json(ApiRequest::get(format!("staff/{id}/"))).await
    }

    /// Create a staff account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server's field errors on rejection.
    #[instrument(skip(self, draft), fields(username = %draft.username))]
    pub async fn create_staff(&self, draft: &StaffDraft) -> Result<StaffMember, ApiError> {
        self.send_json(ApiRequest::post("staff/").json(draft)?)
            .await
    }

    /// Replace a staff account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with the server's field errors on rejection.
    #[instrument(skip(self, draft), fields(staff_id = %id))]
    pub async fn update_staff(&self, id: StaffId, draft: &StaffDraft) -> Result<StaffMember, ApiError> {
        self.send_json(ApiRequest::put(format!("staff/{id}/")).json(draft)?)
            .await
    }

    /// Delete a staff account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the account does not exist.
    #[instrument(skip(self), fields(staff_id = %id))]
    pub async fn delete_staff(&self, id: StaffId) -> Result<(), ApiError> {
        self.send_empty(ApiRequest::delete(format!("staff/{id}/")))
            .await
    }

    /// Re-enable a staff account.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the account cannot be activated.
    #[instrument(skip(self), fields(staff_id = %id))]
    pub async fn activate_staff(&self, id: StaffId) -> Result<(), ApiError> {
        self.send_empty(ApiRequest::post(format!("staff/{id}/activate/")))
            .await
    }

    /// Disable a staff account without deleting it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the account cannot be deactivated.
    #[instrument(skip(self), fields(staff_id = %id))]
    pub async fn deactivate_staff(&self, id: StaffId) -> Result<(), ApiError> {
        self.send_empty(ApiRequest::post(format!("staff/{id}/deactivate/")))
            .await
    }

    /// Roles that can be assigned to staff.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or decode failure.
    pub async fn staff_roles(&self) -> Result<Vec<RoleOption>, ApiError> {
        let listing: Listing<RoleOption> = self.send_json(ApiRequest::get("staff/roles/")).await?;
        Ok(listing.into_items())
    }
}
