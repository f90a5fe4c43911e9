//! End-to-end plan execution: generate both dataset families, persist them
//! to CSV and render both dashboards, then make sure a second run with the
//! same plan reproduces every output byte for byte.

use std::fs;
use std::path::Path;

use chartdeck::plan::Plan;
use chartdeck::plan_execution::{self, load_sales_customer_tables};
use chartdeck::errors::DataError;

const CSV_OUTPUTS: &[&str] = &[
    "datasets/ecommerce/monthly_sales.csv",
    "datasets/ecommerce/regional_performance.csv",
    "datasets/ecommerce/category_sales.csv",
    "datasets/ecommerce/customer_metrics.csv",
    "datasets/sales/sales_transactions.csv",
    "datasets/sales/monthly_sales_summary.csv",
    "datasets/sales/customer_summary.csv",
    "datasets/sales/product_group_summary.csv",
];

const HTML_OUTPUTS: &[&str] = &["ecommerce_dashboard.html", "sales_customer_dashboard.html"];

fn run_sample_plan(dir: &Path) {
    let plan = Plan::sample();
    let plan_path = dir.join("plan.yaml");
    fs::write(&plan_path, serde_yaml::to_string(&plan).unwrap()).unwrap();
    plan_execution::execute_plan(plan_path.to_string_lossy().to_string(), false).unwrap();
}

#[test]
fn sample_plan_produces_every_declared_output() {
    let dir = tempfile::tempdir().unwrap();
    run_sample_plan(dir.path());

    for output in CSV_OUTPUTS.iter().chain(HTML_OUTPUTS) {
        assert!(dir.path().join(output).exists(), "missing output {}", output);
    }
}

#[test]
fn repeated_runs_are_byte_identical() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();
    run_sample_plan(first.path());
    run_sample_plan(second.path());

    for output in CSV_OUTPUTS.iter().chain(HTML_OUTPUTS) {
        let a = fs::read(first.path().join(output)).unwrap();
        let b = fs::read(second.path().join(output)).unwrap();
        assert_eq!(a, b, "output {} differs between runs", output);
    }
}

#[test]
fn csv_headers_match_the_column_contracts() {
    let dir = tempfile::tempdir().unwrap();
    run_sample_plan(dir.path());

    let content =
        fs::read_to_string(dir.path().join("datasets/ecommerce/monthly_sales.csv")).unwrap();
    assert!(content.starts_with("date,year,month,region,revenue,orders,avg_order_value\n"));

    let content =
        fs::read_to_string(dir.path().join("datasets/sales/sales_transactions.csv")).unwrap();
    assert!(content.starts_with(
        "invoice_id,invoice_date,month,customer_id,customer_name,customer_group,\
         product_id,product_name,product_group,quantity,unit_price,invoice_amount\n"
    ));
}

#[test]
fn dashboards_are_self_contained_pages() {
    let dir = tempfile::tempdir().unwrap();
    run_sample_plan(dir.path());

    let ecommerce = fs::read_to_string(dir.path().join("ecommerce_dashboard.html")).unwrap();
    assert!(ecommerce.starts_with("<!DOCTYPE html>"));
    assert!(ecommerce.contains("cdn.plot.ly"));
    assert!(ecommerce.contains("Plotly.newPlot"));
    assert!(ecommerce.contains("E-commerce Business Performance Dashboard"));

    let sales = fs::read_to_string(dir.path().join("sales_customer_dashboard.html")).unwrap();
    assert!(sales.contains("Sales Customer Profiling Dashboard"));
    assert!(sales.contains("Top Customers by Sales"));
}

#[test]
fn nested_export_filenames_get_their_directories_created() {
    let dir = tempfile::tempdir().unwrap();
    let mut plan = Plan::sample();
    plan.export.profiles[0].filename = "reports/ecommerce_dashboard.html".to_string();
    plan.export.profiles[1].filename = "reports/sales/sales_customer_dashboard.html".to_string();
    let plan_path = dir.path().join("plan.yaml");
    fs::write(&plan_path, serde_yaml::to_string(&plan).unwrap()).unwrap();

    plan_execution::execute_plan(plan_path.to_string_lossy().to_string(), false).unwrap();

    let html = fs::read_to_string(dir.path().join("reports/ecommerce_dashboard.html")).unwrap();
    assert!(html.contains("Plotly.newPlot"));
    assert!(dir
        .path()
        .join("reports/sales/sales_customer_dashboard.html")
        .exists());
}

#[test]
fn renamed_column_is_rejected_on_read() {
    let dir = tempfile::tempdir().unwrap();
    run_sample_plan(dir.path());

    let summary_path = dir.path().join("datasets/sales/product_group_summary.csv");
    let content = fs::read_to_string(&summary_path).unwrap();
    fs::write(&summary_path, content.replacen("percentage", "pct", 1)).unwrap();

    let result = load_sales_customer_tables(&dir.path().join("datasets/sales"));
    match result {
        Err(DataError::MalformedInput {
            column, position, ..
        }) => {
            assert_eq!(column, "percentage");
            assert_eq!(position, 2);
        }
        other => panic!("expected MalformedInput, got {:?}", other.err()),
    }
}

#[test]
fn edited_dataset_values_flow_into_the_rendered_dashboard() {
    // The renderer consumes only the persisted tables, so a hand-edited CSV
    // must be reflected in the next render without regenerating anything.
    let dir = tempfile::tempdir().unwrap();
    run_sample_plan(dir.path());

    let summary_path = dir.path().join("datasets/sales/customer_summary.csv");
    let content = fs::read_to_string(&summary_path).unwrap();
    let edited = content.replacen("Company", "Acme Rockets", 1);
    fs::write(&summary_path, &edited).unwrap();

    let datasets = load_sales_customer_tables(&dir.path().join("datasets/sales")).unwrap();
    let html = chartdeck::export::sales_dashboard::render(
        &datasets,
        chartdeck::export::sales_dashboard::DEFAULT_TITLE,
    )
    .unwrap();
    assert!(html.contains("Acme Rockets"));
}
