//! Plan execution: the generate phase seeds one sampler per profile and
//! persists the dataset family to CSV, the render phase reads the tables
//! back through their column contracts and writes the dashboards. In watch
//! mode the dataset directories are observed and only the render phase is
//! re-run, so hand-edited CSVs show up in the dashboards without disturbing
//! the generated fixtures.

use std::path::Path;
use std::sync::mpsc::channel;

use anyhow::{anyhow, Result};
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tracing::{debug, error, info};

use crate::errors::DataError;
use crate::export::{ecommerce_dashboard, sales_dashboard};
use crate::plan::{DashboardKind, ExportProfile, GenerateProfile, GeneratorKind, Plan};
use crate::sampler::Sampler;
use crate::synth::{ecommerce, sales_customer};
use crate::table_io::{read_table, write_table};
use crate::tables::{
    EcommerceDatasets, SalesCustomerDatasets, CATEGORY_SALES_COLUMNS, CATEGORY_SALES_FILE,
    CUSTOMER_METRICS_COLUMNS, CUSTOMER_METRICS_FILE, CUSTOMER_SUMMARY_COLUMNS,
    CUSTOMER_SUMMARY_FILE, MONTHLY_SALES_COLUMNS, MONTHLY_SALES_FILE, MONTHLY_SUMMARY_COLUMNS,
    MONTHLY_SUMMARY_FILE, PRODUCT_GROUP_SUMMARY_COLUMNS, PRODUCT_GROUP_SUMMARY_FILE,
    REGIONAL_PERFORMANCE_COLUMNS, REGIONAL_PERFORMANCE_FILE, SALES_TRANSACTIONS_COLUMNS,
    SALES_TRANSACTIONS_FILE,
};

/// Main function to execute a plan, with optional dataset watching
pub fn execute_plan(plan: String, watch: bool) -> Result<()> {
    info!("Executing plan {}", plan);

    let plan_file_path = std::path::Path::new(&plan);
    let path_content = std::fs::read_to_string(plan_file_path)?;
    let plan: Plan = serde_yaml::from_str(&path_content)?;

    debug!("Executing plan: {:?}", plan);
    run_plan(&plan, plan_file_path)?;

    if watch {
        watch_for_changes(plan, plan_file_path)?;
    }

    Ok(())
}

/// Runs the generate phase and then the render phase once
fn run_plan(plan: &Plan, plan_file_path: &Path) -> Result<()> {
    let base_dir = plan_base_dir(plan_file_path)?;

    if let Some(name) = plan.meta.as_ref().and_then(|m| m.name.as_deref()) {
        info!("Plan: {}", name);
    }

    for profile in &plan.generate.profiles {
        run_generate(profile, base_dir)?;
    }

    render_exports(plan, base_dir);
    Ok(())
}

fn plan_base_dir(plan_file_path: &Path) -> Result<&Path> {
    plan_file_path
        .parent()
        .ok_or_else(|| anyhow!("Plan file has no parent directory"))
}

/// Seeds one sampler for the profile and persists the generated family
fn run_generate(profile: &GenerateProfile, base_dir: &Path) -> Result<()> {
    let output_dir = base_dir.join(&profile.output_dir);
    info!(
        "Generating datasets into {} (seed {})",
        output_dir.display(),
        profile.seed
    );

    let mut sampler = Sampler::new(profile.seed);
    match &profile.generator {
        GeneratorKind::Ecommerce(params) => {
            let datasets = ecommerce::generate(params, &mut sampler)?;
            write_ecommerce_tables(&output_dir, &datasets)?;
        }
        GeneratorKind::SalesCustomer(params) => {
            let datasets = sales_customer::generate(params, &mut sampler)?;
            write_sales_customer_tables(&output_dir, &datasets)?;
        }
    }
    Ok(())
}

/// Renders every export profile; a failing profile is logged and skipped so
/// one malformed table does not block the remaining dashboards
fn render_exports(plan: &Plan, base_dir: &Path) {
    for profile in &plan.export.profiles {
        info!(
            "Exporting dashboard {} from {}",
            profile.filename, profile.datasets_dir
        );
        match render_export(profile, base_dir) {
            Ok(output) => {
                let output_path = base_dir.join(&profile.filename);
                if let Err(e) =
                    crate::common::write_string_to_file(&output_path.to_string_lossy(), &output)
                {
                    error!("Failed to write to file {}: {}", profile.filename, e);
                }
            }
            Err(e) => {
                error!("Failed to export dashboard {}: {}", profile.filename, e);
            }
        }
    }
}

fn render_export(profile: &ExportProfile, base_dir: &Path) -> Result<String, DataError> {
    let datasets_dir = base_dir.join(&profile.datasets_dir);
    match profile.dashboard {
        DashboardKind::Ecommerce => {
            let datasets = load_ecommerce_tables(&datasets_dir)?;
            let title = profile
                .title
                .as_deref()
                .unwrap_or(ecommerce_dashboard::DEFAULT_TITLE);
            ecommerce_dashboard::render(&datasets, title)
        }
        DashboardKind::SalesCustomer => {
            let datasets = load_sales_customer_tables(&datasets_dir)?;
            let title = profile
                .title
                .as_deref()
                .unwrap_or(sales_dashboard::DEFAULT_TITLE);
            sales_dashboard::render(&datasets, title)
        }
    }
}

pub fn write_ecommerce_tables(dir: &Path, datasets: &EcommerceDatasets) -> Result<(), DataError> {
    write_table(&dir.join(MONTHLY_SALES_FILE), &datasets.monthly_sales)?;
    write_table(
        &dir.join(REGIONAL_PERFORMANCE_FILE),
        &datasets.regional_performance,
    )?;
    write_table(&dir.join(CATEGORY_SALES_FILE), &datasets.category_sales)?;
    write_table(&dir.join(CUSTOMER_METRICS_FILE), &datasets.customer_metrics)?;
    Ok(())
}

pub fn load_ecommerce_tables(dir: &Path) -> Result<EcommerceDatasets, DataError> {
    Ok(EcommerceDatasets {
        monthly_sales: read_table(&dir.join(MONTHLY_SALES_FILE), MONTHLY_SALES_COLUMNS)?,
        regional_performance: read_table(
            &dir.join(REGIONAL_PERFORMANCE_FILE),
            REGIONAL_PERFORMANCE_COLUMNS,
        )?,
        category_sales: read_table(&dir.join(CATEGORY_SALES_FILE), CATEGORY_SALES_COLUMNS)?,
        customer_metrics: read_table(&dir.join(CUSTOMER_METRICS_FILE), CUSTOMER_METRICS_COLUMNS)?,
    })
}

pub fn write_sales_customer_tables(
    dir: &Path,
    datasets: &SalesCustomerDatasets,
) -> Result<(), DataError> {
    write_table(&dir.join(SALES_TRANSACTIONS_FILE), &datasets.transactions)?;
    write_table(&dir.join(MONTHLY_SUMMARY_FILE), &datasets.monthly_summary)?;
    write_table(&dir.join(CUSTOMER_SUMMARY_FILE), &datasets.customer_summary)?;
    write_table(
        &dir.join(PRODUCT_GROUP_SUMMARY_FILE),
        &datasets.product_group_summary,
    )?;
    Ok(())
}

pub fn load_sales_customer_tables(dir: &Path) -> Result<SalesCustomerDatasets, DataError> {
    Ok(SalesCustomerDatasets {
        transactions: read_table(
            &dir.join(SALES_TRANSACTIONS_FILE),
            SALES_TRANSACTIONS_COLUMNS,
        )?,
        monthly_summary: read_table(&dir.join(MONTHLY_SUMMARY_FILE), MONTHLY_SUMMARY_COLUMNS)?,
        customer_summary: read_table(&dir.join(CUSTOMER_SUMMARY_FILE), CUSTOMER_SUMMARY_COLUMNS)?,
        product_group_summary: read_table(
            &dir.join(PRODUCT_GROUP_SUMMARY_FILE),
            PRODUCT_GROUP_SUMMARY_COLUMNS,
        )?,
    })
}

/// Watches the dataset directories and re-runs the render phase on changes.
/// The generate phase is not re-run, so edits to the CSVs survive.
fn watch_for_changes(plan: Plan, plan_file_path: &Path) -> Result<()> {
    info!("Watching dataset directories for changes");
    let base_dir = plan_base_dir(plan_file_path)?;

    let (tx, rx) = channel();
    let mut watcher = RecommendedWatcher::new(tx, Config::default())?;
    for profile in &plan.export.profiles {
        let path = base_dir.join(&profile.datasets_dir);
        watcher.watch(&path, RecursiveMode::Recursive)?;
    }

    loop {
        match rx.recv() {
            Ok(event) => {
                if let Ok(event) = event {
                    if let EventKind::Modify(_) = event.kind {
                        debug!("File modified {:?}", event.paths);
                        info!("Change detected, re-rendering dashboards");
                        render_exports(&plan, base_dir);
                    }
                }
            }
            Err(e) => error!("Watch error: {:?}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::EcommerceParams;

    #[test]
    fn tables_round_trip_through_a_directory() {
        let dir = tempfile::tempdir().unwrap();
        let params = EcommerceParams::default();
        let mut sampler = Sampler::new(42);
        let datasets = ecommerce::generate(&params, &mut sampler).unwrap();

        write_ecommerce_tables(dir.path(), &datasets).unwrap();
        let loaded = load_ecommerce_tables(dir.path()).unwrap();

        assert_eq!(loaded.monthly_sales, datasets.monthly_sales);
        assert_eq!(loaded.regional_performance, datasets.regional_performance);
        assert_eq!(loaded.category_sales, datasets.category_sales);
        assert_eq!(loaded.customer_metrics, datasets.customer_metrics);
    }

    #[test]
    fn run_plan_writes_datasets_and_dashboards() {
        let dir = tempfile::tempdir().unwrap();
        let plan = Plan::sample();
        let plan_path = dir.path().join("plan.yaml");
        std::fs::write(&plan_path, serde_yaml::to_string(&plan).unwrap()).unwrap();

        execute_plan(plan_path.to_string_lossy().to_string(), false).unwrap();

        assert!(dir.path().join("datasets/ecommerce/monthly_sales.csv").exists());
        assert!(dir.path().join("datasets/sales/sales_transactions.csv").exists());

        let html =
            std::fs::read_to_string(dir.path().join("ecommerce_dashboard.html")).unwrap();
        assert!(html.contains("Plotly.newPlot"));
        let html =
            std::fs::read_to_string(dir.path().join("sales_customer_dashboard.html")).unwrap();
        assert!(html.contains("Plotly.newPlot"));
    }
}
