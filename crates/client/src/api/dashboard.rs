//! Dashboard summaries.

use tracing::instrument;

use super::conversions::{
    dashboard_from_record, inventory_alerts_from_record, sales_summary_from_record,
};
use super::records::{DashboardOverviewRecord, InventoryAlertsRecord, SalesSummaryRecord};
use super::{ApiClient, ApiError, ApiRequest, Query};
use crate::types::{DashboardOverview, InventoryAlerts, ReportPeriod, SalesSummary};

impl ApiClient {
    /// Dashboard landing page: today's and this month's figures, recent
    /// orders and stock alerts.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    #[instrument(skip(self))]
    pub async fn dashboard_overview(&self) -> Result<DashboardOverview, ApiError> {
        let record: DashboardOverviewRecord = self
            .send_json(ApiRequest::get("dashboard/overview/"))
            .await?;
        Ok(dashboard_from_record(&record)?)
    }

    /// Sales summary, for today unless a period is given.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    #[instrument(skip(self))]
    pub async fn sales_summary(
        &self,
        period: Option<ReportPeriod>,
    ) -> Result<SalesSummary, ApiError> {
        let query = Query::new().push_opt("period", period.map(|p| p.as_str()));
        let record: SalesSummaryRecord = self
            .send_json(ApiRequest::get("dashboard/sales-summary/").query(query))
            .await?;
        Ok(sales_summary_from_record(&record)?)
    }

    /// Low and out-of-stock products.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    #[instrument(skip(self))]
    pub async fn inventory_alerts(&self) -> Result<InventoryAlerts, ApiError> {
        let record: InventoryAlertsRecord = self
            .send_json(ApiRequest::get("dashboard/inventory-alerts/"))
            .await?;
        Ok(inventory_alerts_from_record(&record)?)
    }
}
