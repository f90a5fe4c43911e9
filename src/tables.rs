//! Row structs and column contracts for every persisted table.
//!
//! Struct field order is the column order written to disk, and the
//! `*_COLUMNS` consts are the contract the reader verifies against. The two
//! must stay in sync; `table_io` tests cover the round trip for each table.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

//
// E-commerce dataset family
//

pub const MONTHLY_SALES_FILE: &str = "monthly_sales.csv";
pub const MONTHLY_SALES_COLUMNS: &[&str] = &[
    "date",
    "year",
    "month",
    "region",
    "revenue",
    "orders",
    "avg_order_value",
];

/// One observation row: a month × region measurement
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MonthlySalesRow {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub region: String,
    pub revenue: f64,
    pub orders: i64,
    pub avg_order_value: f64,
}

pub const REGIONAL_PERFORMANCE_FILE: &str = "regional_performance.csv";
pub const REGIONAL_PERFORMANCE_COLUMNS: &[&str] = &[
    "region",
    "revenue_prior",
    "revenue_current",
    "growth_rate",
    "market_share",
];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RegionalPerformanceRow {
    pub region: String,
    pub revenue_prior: f64,
    pub revenue_current: f64,
    /// Period-over-period growth in percent, one decimal place
    pub growth_rate: f64,
    /// Share of the current-year grand total in percent, one decimal place
    pub market_share: f64,
}

pub const CATEGORY_SALES_FILE: &str = "category_sales.csv";
pub const CATEGORY_SALES_COLUMNS: &[&str] = &["category", "year", "revenue", "units_sold"];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CategorySalesRow {
    pub category: String,
    pub year: i32,
    pub revenue: f64,
    pub units_sold: i64,
}

pub const CUSTOMER_METRICS_FILE: &str = "customer_metrics.csv";
pub const CUSTOMER_METRICS_COLUMNS: &[&str] = &[
    "date",
    "year",
    "month",
    "new_customers",
    "retention_rate",
    "total_active_customers",
];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CustomerMetricsRow {
    pub date: NaiveDate,
    pub year: i32,
    pub month: u32,
    pub new_customers: i64,
    /// Percent, one decimal place
    pub retention_rate: f64,
    pub total_active_customers: i64,
}

/// All four tables produced by one e-commerce generator run
#[derive(Debug, Clone, Default)]
pub struct EcommerceDatasets {
    pub monthly_sales: Vec<MonthlySalesRow>,
    pub regional_performance: Vec<RegionalPerformanceRow>,
    pub category_sales: Vec<CategorySalesRow>,
    pub customer_metrics: Vec<CustomerMetricsRow>,
}

//
// Sales/customer dataset family
//

/// Customer segment assigned at generation time
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CustomerGroup {
    #[serde(rename = "NEW")]
    New,
    #[serde(rename = "REGULAR")]
    Regular,
    #[serde(rename = "VIP")]
    Vip,
    #[serde(rename = "SENSITIVE")]
    Sensitive,
}

impl CustomerGroup {
    pub const ALL: [CustomerGroup; 4] = [
        CustomerGroup::New,
        CustomerGroup::Regular,
        CustomerGroup::Vip,
        CustomerGroup::Sensitive,
    ];
}

impl fmt::Display for CustomerGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CustomerGroup::New => "NEW",
            CustomerGroup::Regular => "REGULAR",
            CustomerGroup::Vip => "VIP",
            CustomerGroup::Sensitive => "SENSITIVE",
        };
        write!(f, "{}", label)
    }
}

pub const SALES_TRANSACTIONS_FILE: &str = "sales_transactions.csv";
pub const SALES_TRANSACTIONS_COLUMNS: &[&str] = &[
    "invoice_id",
    "invoice_date",
    "month",
    "customer_id",
    "customer_name",
    "customer_group",
    "product_id",
    "product_name",
    "product_group",
    "quantity",
    "unit_price",
    "invoice_amount",
];

/// One synthetic invoice line
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SalesTransactionRow {
    pub invoice_id: String,
    pub invoice_date: NaiveDate,
    pub month: u32,
    pub customer_id: String,
    pub customer_name: String,
    pub customer_group: CustomerGroup,
    pub product_id: String,
    pub product_name: String,
    pub product_group: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub invoice_amount: f64,
}

pub const MONTHLY_SUMMARY_FILE: &str = "monthly_sales_summary.csv";
pub const MONTHLY_SUMMARY_COLUMNS: &[&str] = &[
    "month",
    "month_name",
    "year",
    "total_sales",
    "total_sales_previous",
    "invoice_count",
    "avg_invoice_amount",
];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct MonthlySummaryRow {
    pub month: u32,
    pub month_name: String,
    pub year: i32,
    pub total_sales: f64,
    /// Simulated prior-year baseline, not real historical data
    pub total_sales_previous: f64,
    pub invoice_count: u32,
    pub avg_invoice_amount: f64,
}

pub const CUSTOMER_SUMMARY_FILE: &str = "customer_summary.csv";
pub const CUSTOMER_SUMMARY_COLUMNS: &[&str] = &[
    "customer_id",
    "customer_name",
    "customer_group",
    "total_sales",
    "total_purchases",
    "avg_purchase_amount",
];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CustomerSummaryRow {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_group: CustomerGroup,
    pub total_sales: f64,
    pub total_purchases: u32,
    pub avg_purchase_amount: f64,
}

pub const PRODUCT_GROUP_SUMMARY_FILE: &str = "product_group_summary.csv";
pub const PRODUCT_GROUP_SUMMARY_COLUMNS: &[&str] = &["product_group", "total_sales", "percentage"];

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProductGroupSummaryRow {
    pub product_group: String,
    pub total_sales: f64,
    /// Share of the grand total in percent, two decimal places
    pub percentage: f64,
}

/// All four tables produced by one sales/customer generator run
#[derive(Debug, Clone, Default)]
pub struct SalesCustomerDatasets {
    pub transactions: Vec<SalesTransactionRow>,
    pub monthly_summary: Vec<MonthlySummaryRow>,
    pub customer_summary: Vec<CustomerSummaryRow>,
    pub product_group_summary: Vec<ProductGroupSummaryRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customer_group_serializes_to_upper_case_labels() {
        let yaml = serde_yaml::to_string(&CustomerGroup::Sensitive).unwrap();
        assert_eq!(yaml.trim(), "SENSITIVE");
        let back: CustomerGroup = serde_yaml::from_str("VIP").unwrap();
        assert_eq!(back, CustomerGroup::Vip);
    }

    #[test]
    fn customer_group_display_matches_serde_labels() {
        for group in CustomerGroup::ALL {
            let yaml = serde_yaml::to_string(&group).unwrap();
            assert_eq!(yaml.trim(), group.to_string());
        }
    }
}
