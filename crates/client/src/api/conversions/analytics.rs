//! Dashboard and analytics translation.

use tillpoint_core::{OrderStatus, PaymentMethod};

use super::{ValidationError, count, count_u64, date, money, ratio, text, timestamp};
use crate::api::records::{
    AnalyticsSummaryRecord, CustomerStatsRecord, DashboardOverviewRecord, InventoryAlertsRecord,
    PaymentMethodRecord, PeriodMetricsRecord, RecentOrderRecord, SalesPointRecord,
    SalesSummaryRecord, StockAlertRecord, TopProductRecord, WireNumber,
};
use crate::types::{
    AnalyticsSummary, CustomerStats, DashboardOverview, InventoryAlerts, PaymentMethodStat,
    PeriodMetrics, RecentOrder, SalesPoint, SalesSummary, StockAlert, TopProduct,
};

/// Headline analytics. Missing figures are zero.
///
/// # Errors
///
/// Returns `ValidationError` for any malformed figure.
pub fn analytics_from_record(
    record: &AnalyticsSummaryRecord,
) -> Result<AnalyticsSummary, ValidationError> {
    Ok(AnalyticsSummary {
        total_revenue: money("total_revenue", record.total_revenue.as_ref())?,
        total_orders: count_u64("total_orders", record.total_orders.as_ref())?,
        average_order_value: money("average_order_value", record.average_order_value.as_ref())?,
        products_sold: count_u64("products_sold", record.products_sold.as_ref())?,
        total_customers: count_u64("total_customers", record.total_customers.as_ref())?,
        returning_customers: count_u64(
            "returning_customers",
            record.returning_customers.as_ref(),
        )?,
        new_customers: count_u64("new_customers", record.new_customers.as_ref())?,
        revenue_growth: ratio("revenue_growth", record.revenue_growth.as_ref())?,
        order_growth: ratio("order_growth", record.order_growth.as_ref())?,
        customer_growth: ratio("customer_growth", record.customer_growth.as_ref())?,
    })
}

/// Daily sales summary.
///
/// # Errors
///
/// Returns `ValidationError` for any malformed figure or date.
pub fn sales_summary_from_record(
    record: &SalesSummaryRecord,
) -> Result<SalesSummary, ValidationError> {
    Ok(SalesSummary {
        date: date("date", record.date.as_deref())?,
        total_orders: count_u64("total_orders", record.total_orders.as_ref())?,
        total_sales: money("total_sales", record.total_sales.as_ref())?,
        total_items: count_u64("total_items", record.total_items.as_ref())?,
        pending_orders: count_u64("pending_orders", record.pending_orders.as_ref())?,
        cash_sales: money("cash_sales", record.cash_sales.as_ref())?,
        card_sales: money("card_sales", record.card_sales.as_ref())?,
    })
}

/// Dashboard landing page.
///
/// # Errors
///
/// Returns `ValidationError` for any malformed figure.
pub fn dashboard_from_record(
    record: &DashboardOverviewRecord,
) -> Result<DashboardOverview, ValidationError> {
    let metrics = |prefix: &str, block: Option<&PeriodMetricsRecord>| match block {
        Some(block) => period_metrics(prefix, block),
        None => Ok(PeriodMetrics::default()),
    };

    Ok(DashboardOverview {
        today: metrics("today_metrics", record.today_metrics.as_ref())?,
        month: metrics("month_metrics", record.month_metrics.as_ref())?,
        recent_orders: record
            .recent_orders
            .iter()
            .map(recent_order)
            .collect::<Result<_, _>>()?,
        inventory_alerts: stock_alerts(&record.inventory_alerts)?,
    })
}

/// Low and out-of-stock lists.
///
/// # Errors
///
/// Returns `ValidationError` for a malformed stock level.
pub fn inventory_alerts_from_record(
    record: &InventoryAlertsRecord,
) -> Result<InventoryAlerts, ValidationError> {
    Ok(InventoryAlerts {
        low_stock: stock_alerts(&record.low_stock_products)?,
        out_of_stock: stock_alerts(&record.out_of_stock_products)?,
    })
}

/// Trend or report bucket.
///
/// # Errors
///
/// Returns `ValidationError` for any malformed figure.
pub fn sales_point_from_record(record: &SalesPointRecord) -> Result<SalesPoint, ValidationError> {
    Ok(SalesPoint {
        period: text(record.period.as_ref()),
        total_sales: money("total_sales", record.total_sales.as_ref())?,
        total_orders: count_u64("total_orders", record.total_orders.as_ref())?,
        items_sold: count_u64("items_sold", record.items_sold.as_ref())?,
    })
}

/// Best-seller row.
///
/// # Errors
///
/// Returns `ValidationError` for any malformed figure.
pub fn top_product_from_record(record: &TopProductRecord) -> Result<TopProduct, ValidationError> {
    Ok(TopProduct {
        product_id: record.product_id,
        product_name: text(record.product_name.as_ref()),
        total_quantity: count_u64("total_quantity", record.total_quantity.as_ref())?,
        total_revenue: money("total_revenue", record.total_revenue.as_ref())?,
    })
}

/// Payment method breakdown row. A missing method is kept as an empty `Other`.
///
/// # Errors
///
/// Returns `ValidationError` for any malformed figure.
pub fn payment_method_from_record(
    record: &PaymentMethodRecord,
) -> Result<PaymentMethodStat, ValidationError> {
    Ok(PaymentMethodStat {
        payment_method: record
            .payment_method
            .clone()
            .unwrap_or_else(|| PaymentMethod::Other(String::new())),
        count: count_u64("count", record.count.as_ref())?,
        total: money("total", record.total.as_ref())?,
    })
}

/// Customer acquisition figures.
///
/// # Errors
///
/// Returns `ValidationError` for any malformed figure.
pub fn customer_stats_from_record(
    record: &CustomerStatsRecord,
) -> Result<CustomerStats, ValidationError> {
    Ok(CustomerStats {
        total_customers: count_u64("total_customers", record.total_customers.as_ref())?,
        new_customers: count_u64("new_customers", record.new_customers.as_ref())?,
        returning_customers: count_u64(
            "returning_customers",
            record.returning_customers.as_ref(),
        )?,
        vip_customers: count_u64("vip_customers", record.vip_customers.as_ref())?,
    })
}

fn period_metrics(
    prefix: &str,
    block: &PeriodMetricsRecord,
) -> Result<PeriodMetrics, ValidationError> {
    let field = |name: &str| format!("{prefix}.{name}");
    Ok(PeriodMetrics {
        orders_count: count_u64(&field("orders_count"), block.orders_count.as_ref())?,
        total_sales: money(&field("total_sales"), block.total_sales.as_ref())?,
        avg_order_value: money(&field("avg_order_value"), block.avg_order_value.as_ref())?,
        items_sold: count_u64(&field("items_sold"), block.items_sold.as_ref())?,
    })
}

fn recent_order(record: &RecentOrderRecord) -> Result<RecentOrder, ValidationError> {
    let id = match &record.id {
        WireNumber::Text(s) => s.clone(),
        other => other.to_string(),
    };
    Ok(RecentOrder {
        order_number: record
            .order_number
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| id.clone()),
        id,
        customer_name: text(record.customer_name.as_ref()),
        total: money("recent_orders.total", record.total.as_ref())?,
        status: record.status.clone().unwrap_or(OrderStatus::Pending),
        payment_method: record.payment_method.clone().unwrap_or(PaymentMethod::Cash),
        created_at: timestamp("recent_orders.created_at", record.created_at.as_deref())?,
        items_count: count("recent_orders.items_count", record.items_count.as_ref())?,
    })
}

fn stock_alerts(records: &[StockAlertRecord]) -> Result<Vec<StockAlert>, ValidationError> {
    records
        .iter()
        .map(|record| {
            Ok(StockAlert {
                id: record.id,
                name: record.name.clone(),
                stock: count("stock", record.stock.as_ref())?,
                min_stock: count("min_stock", record.min_stock.as_ref())?,
            })
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use tillpoint_core::Money;

    #[test]
    fn test_analytics_summary_defaults_to_zero() {
        let summary = analytics_from_record(&AnalyticsSummaryRecord::default()).unwrap();
        assert_eq!(summary, AnalyticsSummary::default());
    }

    #[test]
    fn test_analytics_summary() {
        let record: AnalyticsSummaryRecord = serde_json::from_str(
            r#"{"total_revenue": "15230.50", "total_orders": 212,
                "average_order_value": 71.84, "revenue_growth": "12.5"}"#,
        )
        .unwrap();
        let summary = analytics_from_record(&record).unwrap();
        assert_eq!(summary.total_revenue, Money::from_minor(1_523_050));
        assert_eq!(summary.total_orders, 212);
        assert_eq!(summary.average_order_value, Money::from_minor(7184));
        assert_eq!(summary.revenue_growth, 12.5);
        assert_eq!(summary.customer_growth, 0.0);
    }

    #[test]
    fn test_malformed_analytics_figure() {
        let record: AnalyticsSummaryRecord =
            serde_json::from_str(r#"{"total_revenue": "n/a"}"#).unwrap();
        let err = analytics_from_record(&record).unwrap_err();
        assert_eq!(err.field, "total_revenue");
    }

    #[test]
    fn test_sales_summary() {
        let record: SalesSummaryRecord = serde_json::from_str(
            r#"{"date": "2024-05-01", "total_orders": 14, "total_sales": "820.00",
                "total_items": 40, "pending_orders": 1, "cash_sales": "300.00",
                "card_sales": "520.00"}"#,
        )
        .unwrap();
        let summary = sales_summary_from_record(&record).unwrap();
        assert_eq!(summary.total_orders, 14);
        assert_eq!(summary.cash_sales + summary.card_sales, summary.total_sales);
    }

    #[test]
    fn test_dashboard_overview() {
        let record: DashboardOverviewRecord = serde_json::from_str(
            r#"{
                "today_metrics": {"orders_count": 3, "total_sales": "90.00",
                                  "avg_order_value": "30.00", "items_sold": 7},
                "month_metrics": {"orders_count": 40, "total_revenue": "1200.00"},
                "recent_orders": [{"id": "55", "order_number": "ORD-55",
                                   "customer_name": "Walk-in", "total": "30.00",
                                   "status": "completed", "payment_method": "cash",
                                   "created_at": "2024-05-01T10:00:00+00:00",
                                   "items_count": 2}],
                "inventory_alerts": [{"id": "7c9e6679-7425-40de-944b-e07fc1f90ae7",
                                      "name": "Shea Butter", "stock": 2, "min_stock": 5}]
            }"#,
        )
        .unwrap();
        let overview = dashboard_from_record(&record).unwrap();
        assert_eq!(overview.today.items_sold, 7);
        assert_eq!(overview.month.total_sales, Money::from_minor(120_000));
        assert_eq!(overview.recent_orders[0].id, "55");
        assert_eq!(overview.recent_orders[0].items_count, 2);
        assert_eq!(overview.inventory_alerts[0].stock, 2);
    }

    #[test]
    fn test_inventory_alerts() {
        let record: InventoryAlertsRecord = serde_json::from_str(
            r#"{"low_stock_products": [], "out_of_stock_products":
                [{"id": "7c9e6679-7425-40de-944b-e07fc1f90ae7", "name": "Kente", "stock": 0, "min_stock": 2}]}"#,
        )
        .unwrap();
        let alerts = inventory_alerts_from_record(&record).unwrap();
        assert!(alerts.low_stock.is_empty());
        assert_eq!(alerts.out_of_stock[0].name, "Kente");
    }

    #[test]
    fn test_payment_method_labels() {
        let record: PaymentMethodRecord =
            serde_json::from_str(r#"{"payment_method": "bank_transfer", "count": 4, "total": "80"}"#)
                .unwrap();
        let stat = payment_method_from_record(&record).unwrap();
        assert_eq!(stat.label(), "Bank Transfer");
        assert_eq!(stat.count, 4);
    }
}
