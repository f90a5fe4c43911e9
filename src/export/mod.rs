pub mod chart;
pub mod ecommerce_dashboard;
pub mod sales_dashboard;
pub mod to_html;
