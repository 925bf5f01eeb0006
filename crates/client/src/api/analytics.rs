//! Sales analytics under `orders/sales/analytics/`.

use chrono::{Local, NaiveDate};
use tracing::instrument;

use super::conversions::{
    analytics_from_record, customer_stats_from_record, payment_method_from_record,
    sales_point_from_record, top_product_from_record,
};
use super::records::{
    AnalyticsSummaryRecord, CustomerStatsRecord, Listing, PaymentMethodRecord, SalesPointRecord,
    TopProductRecord,
};
use super::{ApiClient, ApiError, ApiRequest, Query};
use crate::types::{
    AnalyticsSummary, CustomerStats, DateRange, PaymentMethodStat, ReportPeriod, SalesPoint,
    TopProduct, TrendGranularity,
};

const BASE: &str = "orders/sales/analytics";

/// Days covered by [`ApiClient::sales_trends`] when none is given.
pub const DEFAULT_TREND_DAYS: u32 = 30;
/// Rows returned by [`ApiClient::top_products`] when no limit is given.
pub const DEFAULT_TOP_PRODUCTS: u32 = 10;

impl ApiClient {
    /// Headline analytics for a period.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    #[instrument(skip(self))]
    pub async fn dashboard_analytics(
        &self,
        period: ReportPeriod,
    ) -> Result<AnalyticsSummary, ApiError> {
        let query = Query::new().push("period", period.as_str());
        let record: AnalyticsSummaryRecord = self
            .send_json(ApiRequest::get(format!("{BASE}/dashboard/")).query(query))
            .await?;
        Ok(analytics_from_record(&record)?)
    }

    /// Sales over time, bucketed by `granularity` (default daily, 30 days).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    #[instrument(skip(self))]
    pub async fn sales_trends(
        &self,
        granularity: Option<TrendGranularity>,
        days: Option<u32>,
    ) -> Result<Vec<SalesPoint>, ApiError> {
        let query = Query::new()
            .push("period", granularity.unwrap_or_default().as_str())
            .push("days", days.unwrap_or(DEFAULT_TREND_DAYS));
        self.sales_points(format!("{BASE}/trends/"), query).await
    }

    /// Best sellers for a period (default month, top 10).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    #[instrument(skip(self))]
    pub async fn top_products(
        &self,
        period: Option<ReportPeriod>,
        limit: Option<u32>,
    ) -> Result<Vec<TopProduct>, ApiError> {
        let query = Query::new()
            .push("period", period.unwrap_or_default().as_str())
            .push("limit", limit.unwrap_or(DEFAULT_TOP_PRODUCTS));
        let listing: Listing<TopProductRecord> = self
            .send_json(ApiRequest::get(format!("{BASE}/top_products/")).query(query))
            .await?;
        Ok(listing
            .into_items()
            .iter()
            .map(top_product_from_record)
            .collect::<Result<_, _>>()?)
    }

    /// Takings per payment method. Defaults to the current calendar month.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    #[instrument(skip(self))]
    pub async fn payment_method_stats(
        &self,
        range: Option<DateRange>,
    ) -> Result<Vec<PaymentMethodStat>, ApiError> {
        let range = range.unwrap_or_else(|| DateRange::current_month(today()));
        let listing: Listing<PaymentMethodRecord> = self
            .send_json(
                ApiRequest::get(format!("{BASE}/payment_methods/")).query(date_query(range)),
            )
            .await?;
        Ok(listing
            .into_items()
            .iter()
            .map(payment_method_from_record)
            .collect::<Result<_, _>>()?)
    }

    /// Per-day sales report.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    pub async fn daily_report(&self, range: Option<DateRange>) -> Result<Vec<SalesPoint>, ApiError> {
        self.report("daily_report", range).await
    }

    /// Per-week sales report.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    pub async fn weekly_report(&self, range: Option<DateRange>) -> Result<Vec<SalesPoint>, ApiError> {
        self.report("weekly_report", range).await
    }

    /// Per-month sales report.
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    pub async fn monthly_report(&self, range: Option<DateRange>) -> Result<Vec<SalesPoint>, ApiError> {
        self.report("monthly_report", range).await
    }

    /// Customer acquisition figures for a period (default month).
    ///
    /// # Errors
    ///
    /// Returns `ApiError` on transport, status or translation failure.
    #[instrument(skip(self))]
    pub async fn customer_stats(
        &self,
        period: Option<ReportPeriod>,
    ) -> Result<CustomerStats, ApiError> {
        let query = Query::new().push("period", period.unwrap_or_default().as_str());
        let record: CustomerStatsRecord = self
            .send_json(ApiRequest::get(format!("{BASE}/customer_stats/")).query(query))
            .await?;
        Ok(customer_stats_from_record(&record)?)
    }

    #[instrument(skip(self))]
    async fn report(
        &self,
        name: &str,
        range: Option<DateRange>,
    ) -> Result<Vec<SalesPoint>, ApiError> {
        let query = range.map(date_query).unwrap_or_default();
        self.sales_points(format!("{BASE}/{name}/"), query).await
    }

    async fn sales_points(&self, path: String, query: Query) -> Result<Vec<SalesPoint>, ApiError> {
        let listing: Listing<SalesPointRecord> =
            self.send_json(ApiRequest::get(path).query(query)).await?;
        Ok(listing
            .into_items()
            .iter()
            .map(sales_point_from_record)
            .collect::<Result<_, _>>()?)
    }
}

fn date_query(range: DateRange) -> Query {
    Query::new()
        .push("start_date", range.start.format("%Y-%m-%d"))
        .push("end_date", range.end.format("%Y-%m-%d"))
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_query_format() {
        let range = DateRange::current_month(NaiveDate::from_ymd_opt(2024, 2, 14).unwrap_or_default());
        let query = date_query(range);
        assert_eq!(
            query.pairs(),
            &[
                ("start_date".to_string(), "2024-02-01".to_string()),
                ("end_date".to_string(), "2024-02-29".to_string()),
            ]
        );
    }
}
