//! Sales/customer profiling dashboard: headline metric cards over a four-row
//! layout built from the transaction and summary tables. Customer segments
//! keep a fixed color assignment across panels.

use serde_json::{json, Value};
use tracing::debug;

use crate::errors::DataError;
use crate::export::{chart, to_html};
use crate::synth::sales_customer::average_invoice_amount;
use crate::tables::{CustomerGroup, SalesCustomerDatasets};

pub const DEFAULT_TITLE: &str = "Sales Customer Profiling Dashboard";

const ROW_BARS: [f64; 2] = [0.58, 0.82];
const ROW_SCATTER: [f64; 2] = [0.30, 0.52];
const ROW_PIES: [f64; 2] = [0.0, 0.22];
const COL_LEFT: [f64; 2] = [0.0, 0.45];
const COL_RIGHT: [f64; 2] = [0.55, 1.0];

const PRODUCT_GROUP_COLORS: [&str; 4] = ["#1abc9c", "#3498db", "#9b59b6", "#f39c12"];

fn segment_color(group: CustomerGroup) -> &'static str {
    match group {
        CustomerGroup::New => "#2ecc71",
        CustomerGroup::Regular => "#3498db",
        CustomerGroup::Vip => "#e74c3c",
        CustomerGroup::Sensitive => "#f39c12",
    }
}

pub fn render(datasets: &SalesCustomerDatasets, title: &str) -> Result<String, DataError> {
    debug!(
        "Rendering sales dashboard from {} transactions",
        datasets.transactions.len()
    );
    let traces = build_traces(datasets);
    let layout = build_layout(datasets, title)?;
    to_html::render(title, &traces, &layout)
}

fn build_traces(datasets: &SalesCustomerDatasets) -> Value {
    let months: Vec<&str> = datasets
        .monthly_summary
        .iter()
        .map(|r| r.month_name.as_str())
        .collect();

    // Row 1: monthly totals against the simulated prior-year baseline
    let current_bars = chart::bar_trace(
        "Current Year",
        json!(months),
        json!(datasets
            .monthly_summary
            .iter()
            .map(|r| r.total_sales)
            .collect::<Vec<_>>()),
        json!("#3498db"),
        json!(datasets
            .monthly_summary
            .iter()
            .map(|r| format!("${:.0}K", r.total_sales / 1_000.0))
            .collect::<Vec<_>>()),
        1,
        "%{x}: $%{y:,.0f}<extra></extra>",
    );
    let previous_bars = chart::bar_trace(
        "Previous Year",
        json!(months),
        json!(datasets
            .monthly_summary
            .iter()
            .map(|r| r.total_sales_previous)
            .collect::<Vec<_>>()),
        json!("#bdc3c7"),
        json!(Vec::<String>::new()),
        1,
        "%{x}: $%{y:,.0f}<extra></extra>",
    );

    // Row 2 left: one scatter trace per segment over the customer summary
    let mut traces = vec![current_bars, previous_bars];
    for group in CustomerGroup::ALL {
        let members: Vec<_> = datasets
            .customer_summary
            .iter()
            .filter(|c| c.customer_group == group)
            .collect();
        traces.push(chart::marker_trace(
            &group.to_string(),
            json!(members.iter().map(|c| c.total_purchases).collect::<Vec<_>>()),
            json!(members.iter().map(|c| c.total_sales).collect::<Vec<_>>()),
            segment_color(group),
            json!(members
                .iter()
                .map(|c| c.customer_name.as_str())
                .collect::<Vec<_>>()),
            2,
            "%{text}: %{x} purchases, $%{y:,.0f}<extra></extra>",
        ));
    }

    // Row 2 right: product group share donut
    traces.push(chart::pie_trace(
        json!(datasets
            .product_group_summary
            .iter()
            .map(|r| r.product_group.as_str())
            .collect::<Vec<_>>()),
        json!(datasets
            .product_group_summary
            .iter()
            .map(|r| r.total_sales)
            .collect::<Vec<_>>()),
        json!(PRODUCT_GROUP_COLORS),
        COL_RIGHT,
        ROW_SCATTER,
        "%{label}: $%{value:,.0f}<extra></extra>",
    ));

    // Row 3 left: sales volume by segment
    let mut segment_totals = Vec::new();
    for group in CustomerGroup::ALL {
        let total: f64 = datasets
            .customer_summary
            .iter()
            .filter(|c| c.customer_group == group)
            .map(|c| c.total_sales)
            .sum();
        segment_totals.push(total);
    }
    traces.push(chart::pie_trace(
        json!(CustomerGroup::ALL
            .iter()
            .map(|g| g.to_string())
            .collect::<Vec<_>>()),
        json!(segment_totals),
        json!(CustomerGroup::ALL
            .iter()
            .map(|g| segment_color(*g))
            .collect::<Vec<_>>()),
        COL_LEFT,
        ROW_PIES,
        "%{label}: $%{value:,.0f}<extra></extra>",
    ));

    json!(traces)
}

fn build_layout(datasets: &SalesCustomerDatasets, title: &str) -> Result<Value, DataError> {
    let total_sales: f64 = datasets.transactions.iter().map(|t| t.invoice_amount).sum();
    let invoice_count = datasets.transactions.len();
    let avg_invoice = average_invoice_amount(&datasets.transactions)?;
    let customer_count = datasets.customer_summary.len();

    let mut annotations = vec![
        chart::metric_card(
            &format!("<b>${:.2}M</b><br>Total Sales", total_sales / 1_000_000.0),
            0.125,
            0.92,
        ),
        chart::metric_card(
            &format!("<b>{}</b><br>Invoices", invoice_count),
            0.375,
            0.92,
        ),
        chart::metric_card(
            &format!("<b>${:.0}K</b><br>Avg Invoice", avg_invoice / 1_000.0),
            0.625,
            0.92,
        ),
        chart::metric_card(
            &format!("<b>{}</b><br>Active Customers", customer_count),
            0.875,
            0.92,
        ),
        chart::panel_title("Monthly Sales vs Previous Year", 0.5, ROW_BARS[1]),
        chart::panel_title("Customer Value by Segment", 0.225, ROW_SCATTER[1]),
        chart::panel_title("Sales by Product Group", 0.775, ROW_SCATTER[1]),
        chart::panel_title("Sales by Customer Segment", 0.225, ROW_PIES[1]),
        chart::panel_title("Top Customers by Sales", 0.775, ROW_PIES[1]),
    ];
    annotations.extend(top_customer_lines(datasets));

    let mut layout = json!({
        "title": {
            "text": format!("<b>{}</b>", title),
            "x": 0.5,
            "font": { "size": 22, "color": "#2c3e50" },
        },
        "height": 1300,
        "barmode": "group",
        "showlegend": true,
        "legend": { "orientation": "h", "x": 0.0, "y": 0.87 },
        "paper_bgcolor": "#f5f6fa",
        "plot_bgcolor": "white",
        "annotations": annotations,
    });

    layout["xaxis"] = chart::axis("", [0.0, 1.0], "y");
    layout["yaxis"] = chart::axis("Sales ($)", ROW_BARS, "x");
    layout["xaxis2"] = chart::axis("Purchases", COL_LEFT, "y2");
    layout["yaxis2"] = chart::axis("Total Sales ($)", ROW_SCATTER, "x2");

    Ok(layout)
}

/// Ranked text lines for the top-customer panel
fn top_customer_lines(datasets: &SalesCustomerDatasets) -> Vec<Value> {
    let mut ranked: Vec<_> = datasets.customer_summary.iter().collect();
    ranked.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));

    ranked
        .iter()
        .take(6)
        .enumerate()
        .map(|(rank, customer)| {
            let line = format!(
                "{}. {} ({}) ${:.0}K",
                rank + 1,
                customer.customer_name,
                customer.customer_group,
                customer.total_sales / 1_000.0
            );
            chart::text_line(&line, 0.775, ROW_PIES[1] - 0.035 * (rank + 1) as f64, 11)
        })
        .collect()
}
