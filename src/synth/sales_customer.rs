//! Sales/customer dataset family: individual invoice transactions for one
//! year plus monthly, per-customer and per-product-group summaries.

use std::collections::HashMap;

use chrono::NaiveDate;
use tracing::info;

use crate::aggregate::{ratio, round2, share_pct, Accumulator};
use crate::errors::DataError;
use crate::plan::{CustomerSpec, SalesCustomerParams};
use crate::sampler::Sampler;
use crate::synth::month_start;
use crate::tables::{
    CustomerSummaryRow, MonthlySummaryRow, ProductGroupSummaryRow, SalesCustomerDatasets,
    SalesTransactionRow,
};

pub fn generate(
    params: &SalesCustomerParams,
    sampler: &mut Sampler,
) -> Result<SalesCustomerDatasets, DataError> {
    validate(params)?;

    let customers = build_customer_roster(params, sampler);

    // Summary accumulators are filled in the same pass that produces the
    // transaction rows; no table is rescanned afterwards
    let mut monthly: [Accumulator; 12] = [Accumulator::default(); 12];
    let mut per_customer: HashMap<String, Accumulator> = HashMap::new();
    let mut per_group: HashMap<String, f64> = HashMap::new();
    let mut grand_total = 0.0;

    let mut transactions = Vec::new();
    let mut invoice_number = params.first_invoice_number;

    for month in 1..=12u32 {
        let invoice_count =
            sampler.randint(params.invoices_per_month_low, params.invoices_per_month_high);

        for _ in 0..invoice_count {
            // Draw order per invoice: day, customer, product, base amount,
            // segment multiplier, quantity
            let day = sampler.randint(1, 28) as u32;
            let invoice_date = invoice_day(params.year, month, day);
            let customer = sampler.pick(&customers);
            let product = sampler.pick(&params.products);

            let base_amount = sampler.uniform(params.base_amount.low, params.base_amount.high);
            let band = params.multiplier_band(customer.group);
            let invoice_amount = base_amount * sampler.uniform(band.low, band.high);

            let quantity = sampler.randint(params.quantity_low, params.quantity_high);
            let unit_price = round2(invoice_amount / quantity as f64);
            let invoice_amount = round2(invoice_amount);

            monthly[month as usize - 1].add(invoice_amount);
            per_customer
                .entry(customer.id.clone())
                .or_default()
                .add(invoice_amount);
            *per_group.entry(product.group.clone()).or_default() += invoice_amount;
            grand_total += invoice_amount;

            transactions.push(SalesTransactionRow {
                invoice_id: format!("INV{:04}", invoice_number),
                invoice_date,
                month,
                customer_id: customer.id.clone(),
                customer_name: customer.name.clone(),
                customer_group: customer.group,
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                product_group: product.group.clone(),
                quantity,
                unit_price,
                invoice_amount,
            });

            invoice_number += 1;
        }
    }

    // The previous-year comparison series is synthesized from the current
    // totals; one draw per month, after all invoices, in month order
    let monthly_summary: Vec<MonthlySummaryRow> = (1..=12u32)
        .map(|month| {
            let acc = monthly[month as usize - 1];
            let factor = sampler.uniform(
                params.previous_year_factor.low,
                params.previous_year_factor.high,
            );
            MonthlySummaryRow {
                month,
                month_name: month_start(params.year, month).format("%b").to_string(),
                year: params.year,
                total_sales: round2(acc.total),
                total_sales_previous: round2(acc.total * factor),
                invoice_count: acc.count,
                avg_invoice_amount: acc.mean().map(round2).unwrap_or(0.0),
            }
        })
        .collect();

    let customer_summary: Vec<CustomerSummaryRow> = customers
        .iter()
        .filter_map(|customer| {
            let acc = per_customer.get(&customer.id)?;
            Some(CustomerSummaryRow {
                customer_id: customer.id.clone(),
                customer_name: customer.name.clone(),
                customer_group: customer.group,
                total_sales: round2(acc.total),
                total_purchases: acc.count,
                avg_purchase_amount: acc.mean().map(round2).unwrap_or(0.0),
            })
        })
        .collect();

    let product_group_summary: Vec<ProductGroupSummaryRow> = params
        .product_groups
        .iter()
        .map(|group| {
            let total = per_group.get(group).copied().unwrap_or_default();
            ProductGroupSummaryRow {
                product_group: group.clone(),
                total_sales: round2(total),
                percentage: share_pct(total, grand_total, "product group share")
                    .map(round2)
                    .unwrap_or(0.0),
            }
        })
        .collect();

    info!(
        "Generated sales datasets: {} invoices, {} customers with sales, total {}",
        transactions.len(),
        customer_summary.len(),
        round2(grand_total)
    );

    Ok(SalesCustomerDatasets {
        transactions,
        monthly_summary,
        customer_summary,
        product_group_summary,
    })
}

/// A profile that cannot produce a single draw is rejected before the
/// first row rather than panicking inside the sampler
fn validate(params: &SalesCustomerParams) -> Result<(), DataError> {
    if params.products.is_empty() {
        return Err(DataError::InvalidParameter(
            "products must not be empty".to_string(),
        ));
    }
    if params.customers.is_empty() && params.customer_target == 0 {
        return Err(DataError::InvalidParameter(
            "customers must not be empty when customer_target is 0".to_string(),
        ));
    }
    if params.invoices_per_month_low > params.invoices_per_month_high
        || params.invoices_per_month_low < 0
    {
        return Err(DataError::InvalidParameter(
            "invoices_per_month requires 0 <= low <= high".to_string(),
        ));
    }
    if params.quantity_low > params.quantity_high || params.quantity_low < 1 {
        return Err(DataError::InvalidParameter(
            "quantity requires 1 <= low <= high".to_string(),
        ));
    }
    params.base_amount.ensure_valid("base_amount")?;
    params.vip_multiplier.ensure_valid("vip_multiplier")?;
    params.regular_multiplier.ensure_valid("regular_multiplier")?;
    params.new_multiplier.ensure_valid("new_multiplier")?;
    params
        .sensitive_multiplier
        .ensure_valid("sensitive_multiplier")?;
    params
        .previous_year_factor
        .ensure_valid("previous_year_factor")?;

    // Every product must map to a declared product group; the datasets are
    // internally generated, so a mismatch is a schema bug, not bad input
    for product in &params.products {
        if !params.product_groups.contains(&product.group) {
            return Err(DataError::MissingDimension {
                kind: "product group",
                key: product.group.clone(),
            });
        }
    }

    Ok(())
}

/// Grows the named customer list to the configured target with
/// weighted-random segment assignment; one weighted draw per new customer
fn build_customer_roster(params: &SalesCustomerParams, sampler: &mut Sampler) -> Vec<CustomerSpec> {
    let mut customers = params.customers.clone();
    let (groups, weights) = params.segment_weights.as_slices();

    for i in customers.len() + 1..=params.customer_target {
        let group = *sampler.choice(&groups, &weights);
        customers.push(CustomerSpec {
            id: format!("C{:03}", i),
            name: format!("Company {}", i),
            group,
        });
    }

    customers
}

fn invoice_day(year: i32, month: u32, day: u32) -> NaiveDate {
    // Day is drawn from 1..=28, valid in every month
    NaiveDate::from_ymd_opt(year, month, day).expect("valid invoice date")
}

/// Headline ratio used by the dashboard and exposed for reuse: average
/// invoice amount over the whole transactions table, failing on an empty
/// table rather than rendering a bogus zero
pub fn average_invoice_amount(transactions: &[SalesTransactionRow]) -> Result<f64, DataError> {
    let total: f64 = transactions.iter().map(|t| t.invoice_amount).sum();
    ratio(total, transactions.len() as f64, "average invoice amount").map(round2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::CustomerGroup;

    fn generate_default(seed: u64) -> SalesCustomerDatasets {
        let params = SalesCustomerParams::default();
        let mut sampler = Sampler::new(seed);
        generate(&params, &mut sampler).expect("generation succeeds")
    }

    #[test]
    fn roster_grows_to_the_target_with_sequential_ids() {
        let params = SalesCustomerParams::default();
        let mut sampler = Sampler::new(42);
        let customers = build_customer_roster(&params, &mut sampler);
        assert_eq!(customers.len(), 50);
        assert_eq!(customers[10].id, "C011");
        assert_eq!(customers[49].id, "C050");
        assert_eq!(customers[49].name, "Company 50");
    }

    #[test]
    fn generated_segments_follow_the_declared_weights() {
        let params = SalesCustomerParams::default();
        let mut sampler = Sampler::new(42);
        let customers = build_customer_roster(&params, &mut sampler);

        let generated = &customers[10..];
        assert_eq!(generated.len(), 40);

        let expected = [
            (CustomerGroup::New, 0.22),
            (CustomerGroup::Regular, 0.38),
            (CustomerGroup::Vip, 0.35),
            (CustomerGroup::Sensitive, 0.05),
        ];
        for (group, weight) in expected {
            let observed = generated.iter().filter(|c| c.group == group).count() as f64
                / generated.len() as f64;
            // 40 draws; allow generous sampling slack
            assert!(
                (observed - weight).abs() < 0.2,
                "{:?}: observed {} vs weight {}",
                group,
                observed,
                weight
            );
        }
    }

    #[test]
    fn same_seed_produces_identical_datasets() {
        let a = generate_default(42);
        let b = generate_default(42);
        assert_eq!(a.transactions, b.transactions);
        assert_eq!(a.monthly_summary, b.monthly_summary);
        assert_eq!(a.customer_summary, b.customer_summary);
        assert_eq!(a.product_group_summary, b.product_group_summary);
    }

    #[test]
    fn invoice_ids_are_sequential_from_the_first_number() {
        let datasets = generate_default(42);
        assert_eq!(datasets.transactions[0].invoice_id, "INV1001");
        assert_eq!(datasets.transactions[1].invoice_id, "INV1002");
        let last = datasets.transactions.len() as u32 + 1000;
        assert_eq!(
            datasets.transactions.last().unwrap().invoice_id,
            format!("INV{:04}", last)
        );
    }

    #[test]
    fn monthly_invoice_counts_stay_in_band_and_cover_all_invoices() {
        let datasets = generate_default(42);
        let mut total = 0;
        for row in &datasets.monthly_summary {
            assert!((60..=65).contains(&row.invoice_count));
            total += row.invoice_count as usize;
        }
        assert_eq!(total, datasets.transactions.len());
    }

    #[test]
    fn invoice_amounts_stay_within_the_segment_bounds() {
        let datasets = generate_default(42);
        for row in &datasets.transactions {
            let (low_mult, high_mult) = match row.customer_group {
                CustomerGroup::Vip => (1.5, 2.5),
                CustomerGroup::Regular => (1.0, 1.8),
                CustomerGroup::New => (0.8, 1.3),
                CustomerGroup::Sensitive => (0.5, 1.0),
            };
            let min = 5000.0 * low_mult;
            let max = 30000.0 * high_mult;
            assert!(
                row.invoice_amount >= min - 0.01 && row.invoice_amount <= max + 0.01,
                "{} amount {} outside [{}, {}]",
                row.invoice_id,
                row.invoice_amount,
                min,
                max
            );
            assert!((1..=10).contains(&row.quantity));
            let reconstructed = row.unit_price * row.quantity as f64;
            assert!((reconstructed - row.invoice_amount).abs() < 0.01 * row.quantity as f64);
        }
    }

    #[test]
    fn monthly_totals_conserve_the_transaction_sums() {
        let datasets = generate_default(42);
        for summary in &datasets.monthly_summary {
            let total: f64 = datasets
                .transactions
                .iter()
                .filter(|t| t.month == summary.month)
                .map(|t| t.invoice_amount)
                .sum();
            assert!((summary.total_sales - total).abs() < 0.05);

            let expected_avg = total / summary.invoice_count as f64;
            assert!((summary.avg_invoice_amount - expected_avg).abs() < 0.05);
        }
    }

    #[test]
    fn previous_year_baseline_stays_synthetic_and_in_band() {
        let datasets = generate_default(42);
        for row in &datasets.monthly_summary {
            let low = row.total_sales * 0.85;
            let high = row.total_sales * 0.95;
            assert!(
                row.total_sales_previous >= low - 0.05 && row.total_sales_previous <= high + 0.05,
                "month {}: previous {} outside [{}, {}]",
                row.month,
                row.total_sales_previous,
                low,
                high
            );
        }
    }

    #[test]
    fn customer_summary_conserves_the_grand_total() {
        let datasets = generate_default(42);
        let grand: f64 = datasets
            .transactions
            .iter()
            .map(|t| t.invoice_amount)
            .sum();
        let summed: f64 = datasets.customer_summary.iter().map(|c| c.total_sales).sum();
        assert!((grand - summed).abs() < 0.5);
    }

    #[test]
    fn product_group_shares_sum_to_one_hundred() {
        let datasets = generate_default(42);
        assert_eq!(datasets.product_group_summary.len(), 4);

        let total_pct: f64 = datasets
            .product_group_summary
            .iter()
            .map(|g| g.percentage)
            .sum();
        assert!((total_pct - 100.0).abs() < 0.5, "shares sum to {}", total_pct);

        let grand: f64 = datasets
            .transactions
            .iter()
            .map(|t| t.invoice_amount)
            .sum();
        let summed: f64 = datasets
            .product_group_summary
            .iter()
            .map(|g| g.total_sales)
            .sum();
        assert!((grand - summed).abs() < 0.05);
    }

    #[test]
    fn empty_product_list_is_rejected_before_any_draw() {
        let mut params = SalesCustomerParams::default();
        params.products.clear();
        let mut sampler = Sampler::new(42);
        assert!(matches!(
            generate(&params, &mut sampler),
            Err(DataError::InvalidParameter(_))
        ));
    }

    #[test]
    fn inverted_multiplier_band_is_rejected_before_any_draw() {
        let mut params = SalesCustomerParams::default();
        params.vip_multiplier = crate::plan::Band::new(2.5, 1.5);
        let mut sampler = Sampler::new(42);
        match generate(&params, &mut sampler) {
            Err(DataError::InvalidParameter(msg)) => {
                assert!(msg.contains("vip_multiplier"), "message: {}", msg);
            }
            other => panic!("expected InvalidParameter, got {:?}", other.err()),
        }
    }

    #[test]
    fn empty_roster_configuration_is_rejected() {
        let mut params = SalesCustomerParams::default();
        params.customers.clear();
        params.customer_target = 0;
        let mut sampler = Sampler::new(42);
        assert!(matches!(
            generate(&params, &mut sampler),
            Err(DataError::InvalidParameter(_))
        ));
    }

    #[test]
    fn unknown_product_group_is_a_missing_dimension() {
        let mut params = SalesCustomerParams::default();
        params.products[0].group = "Mystery Goods".to_string();
        let mut sampler = Sampler::new(42);
        let result = generate(&params, &mut sampler);
        match result {
            Err(DataError::MissingDimension { kind, key }) => {
                assert_eq!(kind, "product group");
                assert_eq!(key, "Mystery Goods");
            }
            other => panic!("expected MissingDimension, got {:?}", other.err()),
        }
    }

    #[test]
    fn average_invoice_amount_fails_on_an_empty_table() {
        assert!(matches!(
            average_invoice_amount(&[]),
            Err(DataError::DivisionByZero(_))
        ));

        let datasets = generate_default(42);
        let avg = average_invoice_amount(&datasets.transactions).unwrap();
        assert!(avg > 0.0);
    }
}
