//! E-commerce dashboard: a 3 x 2 grid over the four e-commerce tables.
//!
//! Panels: monthly revenue trend per year, market share donut, category
//! performance bars, regional growth bars, customer acquisition with a
//! secondary retention axis, and a geographic revenue map. A handful of
//! derived headline aggregates feed the insights box.

use serde_json::{json, Value};
use tracing::debug;

use crate::aggregate::{growth_pct, sum_by};
use crate::errors::DataError;
use crate::export::{chart, to_html};
use crate::tables::EcommerceDatasets;

pub const DEFAULT_TITLE: &str = "E-commerce Business Performance Dashboard";

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// Grid cells in paper coordinates, rows top to bottom
const COL_LEFT: [f64; 2] = [0.0, 0.45];
const COL_RIGHT: [f64; 2] = [0.55, 1.0];
const ROW_TOP: [f64; 2] = [0.72, 1.0];
const ROW_MID: [f64; 2] = [0.36, 0.64];
const ROW_BOTTOM: [f64; 2] = [0.0, 0.28];

pub fn render(datasets: &EcommerceDatasets, title: &str) -> Result<String, DataError> {
    let (prior_year, current_year) = observed_years(datasets)?;
    debug!(
        "Rendering e-commerce dashboard for {} vs {}",
        prior_year, current_year
    );

    let traces = build_traces(datasets, prior_year, current_year)?;
    let layout = build_layout(datasets, prior_year, current_year, title)?;
    to_html::render(title, &traces, &layout)
}

/// The two years present in the observation table, oldest first
fn observed_years(datasets: &EcommerceDatasets) -> Result<(i32, i32), DataError> {
    let min = datasets.monthly_sales.iter().map(|r| r.year).min();
    let max = datasets.monthly_sales.iter().map(|r| r.year).max();
    match (min, max) {
        (Some(prior), Some(current)) if prior < current => Ok((prior, current)),
        _ => Err(DataError::MissingDimension {
            kind: "year",
            key: "monthly_sales requires observations from two years".to_string(),
        }),
    }
}

/// Latitude, longitude and marker size for the geographic panel
fn region_coords(region: &str) -> Result<(f64, f64, f64), DataError> {
    match region {
        "North America" => Ok((45.0, -100.0, 30.0)),
        "Europe" => Ok((50.0, 10.0, 25.0)),
        "Asia Pacific" => Ok((35.0, 120.0, 35.0)),
        "Latin America" => Ok((-15.0, -60.0, 20.0)),
        "Middle East" => Ok((25.0, 45.0, 15.0)),
        other => Err(DataError::MissingDimension {
            kind: "region",
            key: other.to_string(),
        }),
    }
}

/// Sum of monthly revenue per calendar month for one year, in month order
fn monthly_revenue(datasets: &EcommerceDatasets, year: i32) -> Vec<f64> {
    let by_month = sum_by(
        &datasets.monthly_sales,
        |r| (r.year, r.month),
        |r| r.revenue,
    );
    (1..=12)
        .map(|m| by_month.get(&(year, m)).copied().unwrap_or(0.0))
        .collect()
}

fn build_traces(
    datasets: &EcommerceDatasets,
    prior_year: i32,
    current_year: i32,
) -> Result<Value, DataError> {
    let months = json!(MONTH_LABELS);

    // Panel 1: revenue trend, one line per year
    let trend_prior = chart::line_trace(
        &format!("{} Revenue", prior_year),
        months.clone(),
        json!(monthly_revenue(datasets, prior_year)),
        "#95a5a6",
        1,
        "%{x}: $%{y:,.0f}<extra></extra>",
    );
    let trend_current = chart::line_trace(
        &format!("{} Revenue", current_year),
        months.clone(),
        json!(monthly_revenue(datasets, current_year)),
        "#3498db",
        1,
        "%{x}: $%{y:,.0f}<extra></extra>",
    );

    // Panel 2: market share donut over the regional summary
    let share = chart::pie_trace(
        json!(datasets
            .regional_performance
            .iter()
            .map(|r| r.region.as_str())
            .collect::<Vec<_>>()),
        json!(datasets
            .regional_performance
            .iter()
            .map(|r| r.market_share)
            .collect::<Vec<_>>()),
        json!(["#3498db", "#e74c3c", "#2ecc71", "#f39c12", "#9b59b6"]),
        COL_RIGHT,
        ROW_TOP,
        "%{label}: %{value:.1f}%<extra></extra>",
    );

    // Panel 3: current-year category revenue, smallest at the bottom
    let mut categories: Vec<_> = datasets
        .category_sales
        .iter()
        .filter(|r| r.year == current_year)
        .collect();
    categories.sort_by(|a, b| a.revenue.total_cmp(&b.revenue));
    let category_bars = chart::hbar_trace(
        "Category Revenue",
        json!(categories.iter().map(|r| r.revenue).collect::<Vec<_>>()),
        json!(categories
            .iter()
            .map(|r| r.category.as_str())
            .collect::<Vec<_>>()),
        json!("#2ecc71"),
        json!(categories
            .iter()
            .map(|r| format!("${:.1}M", r.revenue / 1_000_000.0))
            .collect::<Vec<_>>()),
        2,
        "%{y}: $%{x:,.0f}<extra></extra>",
    );

    // Panel 4: regional growth rates, colored by sign
    let mut regions: Vec<_> = datasets.regional_performance.iter().collect();
    regions.sort_by(|a, b| a.growth_rate.total_cmp(&b.growth_rate));
    let growth_bars = chart::hbar_trace(
        "Growth Rate",
        json!(regions.iter().map(|r| r.growth_rate).collect::<Vec<_>>()),
        json!(regions.iter().map(|r| r.region.as_str()).collect::<Vec<_>>()),
        json!(regions
            .iter()
            .map(|r| if r.growth_rate < 0.0 { "#e74c3c" } else { "#2ecc71" })
            .collect::<Vec<_>>()),
        json!(regions
            .iter()
            .map(|r| format!("{:.1}%", r.growth_rate))
            .collect::<Vec<_>>()),
        3,
        "%{y}: %{x:.1f}%<extra></extra>",
    );

    // Panel 5: current-year acquisition with retention on a secondary axis
    let acquisition: Vec<_> = datasets
        .customer_metrics
        .iter()
        .filter(|r| r.year == current_year)
        .collect();
    let new_customers = chart::line_trace(
        "New Customers",
        months.clone(),
        json!(acquisition.iter().map(|r| r.new_customers).collect::<Vec<_>>()),
        "#9b59b6",
        4,
        "%{x}: %{y:,} new customers<extra></extra>",
    );
    let mut retention = chart::line_trace(
        "Retention Rate",
        months,
        json!(acquisition.iter().map(|r| r.retention_rate).collect::<Vec<_>>()),
        "#f39c12",
        4,
        "%{x}: %{y:.1f}% retained<extra></extra>",
    );
    retention["yaxis"] = json!("y5");

    // Panel 6: revenue map over the regional summary
    let mut lat = Vec::new();
    let mut lon = Vec::new();
    let mut sizes = Vec::new();
    let mut names = Vec::new();
    let mut revenues = Vec::new();
    for row in &datasets.regional_performance {
        let (la, lo, size) = region_coords(&row.region)?;
        lat.push(la);
        lon.push(lo);
        sizes.push(size);
        names.push(row.region.clone());
        revenues.push(row.revenue_current);
    }
    let map = chart::scattergeo_trace(
        "Regional Revenue",
        json!(lat),
        json!(lon),
        json!(names),
        json!(sizes),
        json!(revenues),
        "%{text}: $%{customdata:,.0f}<extra></extra>",
    );

    Ok(json!([
        trend_prior,
        trend_current,
        share,
        category_bars,
        growth_bars,
        new_customers,
        retention,
        map,
    ]))
}

fn build_layout(
    datasets: &EcommerceDatasets,
    prior_year: i32,
    current_year: i32,
    title: &str,
) -> Result<Value, DataError> {
    let mut annotations = vec![
        chart::panel_title("Monthly Revenue Trend", 0.225, ROW_TOP[1]),
        chart::panel_title("Market Share by Region", 0.775, ROW_TOP[1]),
        chart::panel_title("Category Performance", 0.225, ROW_MID[1]),
        chart::panel_title("Regional Growth Rates", 0.775, ROW_MID[1]),
        chart::panel_title("Customer Acquisition & Retention", 0.225, ROW_BOTTOM[1]),
        chart::panel_title("Revenue by Geography", 0.775, ROW_BOTTOM[1]),
        insights_box(datasets)?,
    ];
    annotations.push(chart::text_line(
        &format!("{} vs {}", prior_year, current_year),
        0.5,
        1.045,
        13,
    ));

    let mut layout = json!({
        "title": {
            "text": format!("<b>{}</b>", title),
            "x": 0.5,
            "font": { "size": 22, "color": "#2c3e50" },
        },
        "height": 1400,
        "showlegend": true,
        "legend": { "orientation": "h", "x": 0.0, "y": 1.06 },
        "paper_bgcolor": "#f5f6fa",
        "plot_bgcolor": "white",
        "geo": {
            "domain": { "x": COL_RIGHT, "y": ROW_BOTTOM },
            "projection": { "type": "orthographic" },
            "showland": true,
            "landcolor": "#ecf0f1",
            "showocean": true,
            "oceancolor": "#d6eaf8",
        },
        "annotations": annotations,
    });

    layout["xaxis"] = chart::axis("", COL_LEFT, "y");
    layout["yaxis"] = chart::axis("Revenue ($)", ROW_TOP, "x");
    layout["xaxis2"] = chart::axis("Revenue ($)", COL_LEFT, "y2");
    layout["yaxis2"] = chart::axis("", ROW_MID, "x2");
    layout["xaxis3"] = chart::axis("Growth Rate (%)", COL_RIGHT, "y3");
    layout["yaxis3"] = chart::axis("", ROW_MID, "x3");
    layout["xaxis4"] = chart::axis("", COL_LEFT, "y4");
    layout["yaxis4"] = chart::axis("New Customers", ROW_BOTTOM, "x4");
    let mut retention_axis = chart::axis("Retention (%)", ROW_BOTTOM, "x4");
    retention_axis["overlaying"] = json!("y4");
    retention_axis["side"] = json!("right");
    layout["yaxis5"] = retention_axis;

    Ok(layout)
}

/// Headline aggregates shown in the insights box. An all-zero prior year is
/// a fatal division error rather than a silently empty headline.
fn insights_box(datasets: &EcommerceDatasets) -> Result<Value, DataError> {
    let prior_total: f64 = datasets
        .regional_performance
        .iter()
        .map(|r| r.revenue_prior)
        .sum();
    let current_total: f64 = datasets
        .regional_performance
        .iter()
        .map(|r| r.revenue_current)
        .sum();
    let growth = growth_pct(prior_total, current_total)?;

    let top_region = datasets
        .regional_performance
        .iter()
        .max_by(|a, b| a.market_share.total_cmp(&b.market_share))
        .map(|r| r.region.as_str())
        .unwrap_or("n/a");
    let top_category = datasets
        .category_sales
        .iter()
        .max_by(|a, b| a.revenue.total_cmp(&b.revenue))
        .map(|r| r.category.as_str())
        .unwrap_or("n/a");

    let text = format!(
        "<b>Key Insights</b><br>Total Revenue: ${:.2}M (YoY {:+.1}%)<br>Leading Region: {}<br>Top Category: {}",
        current_total / 1_000_000.0,
        growth,
        top_region,
        top_category
    );
    Ok(chart::metric_card(&text, 0.5, -0.06))
}
