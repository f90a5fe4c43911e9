//! E-commerce dataset family: monthly sales by region across two years,
//! annual category performance and monthly customer acquisition metrics.

use std::collections::HashMap;

use tracing::info;

use crate::aggregate::{growth_pct, ratio, round1, round2, share_pct};
use crate::errors::DataError;
use crate::plan::EcommerceParams;
use crate::sampler::Sampler;
use crate::synth::month_start;
use crate::tables::{
    CategorySalesRow, CustomerMetricsRow, EcommerceDatasets, MonthlySalesRow,
    RegionalPerformanceRow,
};

pub fn generate(
    params: &EcommerceParams,
    sampler: &mut Sampler,
) -> Result<EcommerceDatasets, DataError> {
    validate(params)?;

    let monthly_sales = synthesize_monthly_sales(params, sampler);
    let regional_performance = summarize_regions(params, &monthly_sales);
    let category_sales = synthesize_category_sales(params, sampler);
    let customer_metrics = synthesize_customer_metrics(params, sampler);

    info!(
        "Generated e-commerce datasets: {} monthly rows, {} regions, {} category rows, {} customer rows",
        monthly_sales.len(),
        regional_performance.len(),
        category_sales.len(),
        customer_metrics.len()
    );

    Ok(EcommerceDatasets {
        monthly_sales,
        regional_performance,
        category_sales,
        customer_metrics,
    })
}

/// A profile that cannot produce a single draw is rejected before the
/// first row rather than panicking inside the sampler
fn validate(params: &EcommerceParams) -> Result<(), DataError> {
    if params.regions.is_empty() {
        return Err(DataError::InvalidParameter(
            "regions must not be empty".to_string(),
        ));
    }
    if params.categories.is_empty() {
        return Err(DataError::InvalidParameter(
            "categories must not be empty".to_string(),
        ));
    }
    params.revenue_jitter.ensure_valid("revenue_jitter")?;
    params.order_value.ensure_valid("order_value")?;
    params.category_jitter.ensure_valid("category_jitter")?;
    params.category_unit_price.ensure_valid("category_unit_price")?;
    params.acquisition_jitter.ensure_valid("acquisition_jitter")?;
    params.retention.ensure_valid("retention")?;
    Ok(())
}

/// One row per year × month × region. Per row the draw order is revenue
/// jitter first, then the order-value divisor; the derived order count and
/// per-order average are back-divisions from the primary measure.
fn synthesize_monthly_sales(params: &EcommerceParams, sampler: &mut Sampler) -> Vec<MonthlySalesRow> {
    let mut rows = Vec::new();

    for year in [params.prior_year, params.current_year] {
        for month in 1..=12 {
            for region in &params.regions {
                let growth = if year == params.current_year {
                    region.growth
                } else {
                    0.0
                };
                let seasonal = params.seasonal_factor(month);

                let jitter = sampler.uniform(params.revenue_jitter.low, params.revenue_jitter.high);
                let revenue = region.base_sales * (1.0 + growth) * seasonal * jitter;

                let order_value = sampler.uniform(params.order_value.low, params.order_value.high);
                let orders = (revenue / order_value) as i64;

                rows.push(MonthlySalesRow {
                    date: month_start(year, month),
                    year,
                    month,
                    region: region.name.clone(),
                    revenue: round2(revenue),
                    orders,
                    avg_order_value: ratio(revenue, orders as f64, "average order value")
                        .map(round2)
                        .unwrap_or(0.0),
                });
            }
        }
    }

    rows
}

/// Single grouped pass over the observation rows: per-region totals for both
/// years, then growth rate and share of the current-year grand total
fn summarize_regions(
    params: &EcommerceParams,
    monthly_sales: &[MonthlySalesRow],
) -> Vec<RegionalPerformanceRow> {
    let mut totals: HashMap<&str, (f64, f64)> = HashMap::new();
    let mut grand_total_current = 0.0;

    for row in monthly_sales {
        let entry = totals.entry(row.region.as_str()).or_default();
        if row.year == params.current_year {
            entry.1 += row.revenue;
            grand_total_current += row.revenue;
        } else {
            entry.0 += row.revenue;
        }
    }

    params
        .regions
        .iter()
        .map(|region| {
            let (prior, current) = totals.get(region.name.as_str()).copied().unwrap_or_default();
            RegionalPerformanceRow {
                region: region.name.clone(),
                revenue_prior: round2(prior),
                revenue_current: round2(current),
                growth_rate: growth_pct(prior, current).map(round1).unwrap_or(0.0),
                market_share: share_pct(current, grand_total_current, "market share")
                    .map(round1)
                    .unwrap_or(0.0),
            }
        })
        .collect()
}

/// Annual revenue per category × year; category outer loop, year inner loop,
/// annual jitter drawn before the unit-price divisor
fn synthesize_category_sales(
    params: &EcommerceParams,
    sampler: &mut Sampler,
) -> Vec<CategorySalesRow> {
    let mut rows = Vec::new();

    for category in &params.categories {
        for year in [params.prior_year, params.current_year] {
            let mut annual_revenue = category.base_sales * 12.0;
            if year == params.current_year {
                annual_revenue *= 1.0 + category.growth;
            }
            annual_revenue *=
                sampler.uniform(params.category_jitter.low, params.category_jitter.high);

            let unit_price =
                sampler.uniform(params.category_unit_price.low, params.category_unit_price.high);

            rows.push(CategorySalesRow {
                category: category.name.clone(),
                year,
                revenue: round2(annual_revenue),
                units_sold: (annual_revenue / unit_price) as i64,
            });
        }
    }

    rows
}

/// Monthly customer acquisition across both years; acquisition jitter drawn
/// before the retention draw
fn synthesize_customer_metrics(
    params: &EcommerceParams,
    sampler: &mut Sampler,
) -> Vec<CustomerMetricsRow> {
    let mut rows = Vec::new();

    for year in [params.prior_year, params.current_year] {
        for month in 1..=12 {
            let mut base = params.base_monthly_customers;
            if year == params.current_year {
                base *= 1.0 + params.customer_growth;
            }
            let seasonal = params.acquisition_factor(month);

            let jitter =
                sampler.uniform(params.acquisition_jitter.low, params.acquisition_jitter.high);
            let new_customers = (base * seasonal * jitter) as i64;

            let retention = sampler.uniform(params.retention.low, params.retention.high);

            rows.push(CustomerMetricsRow {
                date: month_start(year, month),
                year,
                month,
                new_customers,
                retention_rate: round1(retention * 100.0),
                total_active_customers: new_customers + (base * 8.0 * retention) as i64,
            });
        }
    }

    rows
}
