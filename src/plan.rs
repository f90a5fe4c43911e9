//! Plan file data structures.
//!
//! ```text
//! Plan
//!   ├── meta: Option<Meta>
//!   ├── generate: GenerateConfig
//!   │   └── profiles: Vec<GenerateProfile>
//!   │       ├── output_dir: String
//!   │       ├── seed: u64
//!   │       └── generator: GeneratorKind
//!   │           ├── Ecommerce(EcommerceParams)
//!   │           └── SalesCustomer(SalesCustomerParams)
//!   └── export: ExportConfig
//!       └── profiles: Vec<ExportProfile>
//!           ├── filename: String
//!           ├── datasets_dir: String
//!           ├── dashboard: DashboardKind
//!           └── title: Option<String>
//! ```
//!
//! Every synthesis constant is a parameter with a default reproducing the
//! canonical fixture values, so `Ecommerce: {}` in a plan file is a complete
//! configuration.

use serde::{Deserialize, Serialize};

use crate::errors::DataError;
use crate::tables::CustomerGroup;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Plan {
    #[serde(default)]
    pub meta: Option<Meta>,
    #[serde(default)]
    pub generate: GenerateConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Meta {
    pub name: Option<String>,
}

//
// Generate configuration
//

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct GenerateConfig {
    pub profiles: Vec<GenerateProfile>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GenerateProfile {
    pub output_dir: String,
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub generator: GeneratorKind,
}

fn default_seed() -> u64 {
    42
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub enum GeneratorKind {
    Ecommerce(EcommerceParams),
    SalesCustomer(SalesCustomerParams),
}

/// Inclusive-low, exclusive-high uniform draw band
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub low: f64,
    pub high: f64,
}

impl Band {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    /// A uniform draw over `[low, high)` is empty unless `low < high`
    pub fn ensure_valid(&self, name: &str) -> Result<(), DataError> {
        if self.low < self.high {
            Ok(())
        } else {
            Err(DataError::InvalidParameter(format!(
                "{} requires low < high, got [{}, {})",
                name, self.low, self.high
            )))
        }
    }
}

/// A region dimension record: fixed base volume and growth rate
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RegionSpec {
    pub name: String,
    pub base_sales: f64,
    pub growth: f64,
}

/// A product category dimension record
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CategorySpec {
    pub name: String,
    pub base_sales: f64,
    pub growth: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct EcommerceParams {
    pub prior_year: i32,
    pub current_year: i32,
    pub regions: Vec<RegionSpec>,
    pub categories: Vec<CategorySpec>,
    /// Months multiplied by `holiday_boost`
    pub holiday_months: Vec<u32>,
    pub holiday_boost: f64,
    /// Months multiplied by `summer_boost`
    pub summer_months: Vec<u32>,
    pub summer_boost: f64,
    pub revenue_jitter: Band,
    pub order_value: Band,
    pub category_jitter: Band,
    pub category_unit_price: Band,
    pub base_monthly_customers: f64,
    /// Current-year uplift applied to the customer acquisition base
    pub customer_growth: f64,
    pub acquisition_peak_months: Vec<u32>,
    pub acquisition_peak_boost: f64,
    pub acquisition_slow_months: Vec<u32>,
    pub acquisition_slow_factor: f64,
    pub acquisition_jitter: Band,
    pub retention: Band,
}

impl Default for EcommerceParams {
    fn default() -> Self {
        let region = |name: &str, base_sales: f64, growth: f64| RegionSpec {
            name: name.to_string(),
            base_sales,
            growth,
        };
        let category = |name: &str, base_sales: f64, growth: f64| CategorySpec {
            name: name.to_string(),
            base_sales,
            growth,
        };

        Self {
            prior_year: 2024,
            current_year: 2025,
            regions: vec![
                region("North America", 150_000.0, 0.08),
                region("Europe", 120_000.0, 0.12),
                region("Asia Pacific", 180_000.0, 0.15),
                region("Latin America", 80_000.0, 0.10),
                region("Middle East", 60_000.0, 0.07),
            ],
            categories: vec![
                category("Electronics", 180_000.0, 0.18),
                category("Clothing", 120_000.0, 0.08),
                category("Home & Garden", 90_000.0, 0.12),
                category("Sports", 75_000.0, 0.15),
                category("Books", 45_000.0, 0.05),
                category("Beauty", 85_000.0, 0.22),
            ],
            holiday_months: vec![11, 12],
            holiday_boost: 1.3,
            summer_months: vec![6, 7, 8],
            summer_boost: 1.1,
            revenue_jitter: Band::new(0.85, 1.15),
            order_value: Band::new(45.0, 85.0),
            category_jitter: Band::new(0.9, 1.1),
            category_unit_price: Band::new(25.0, 150.0),
            base_monthly_customers: 2500.0,
            customer_growth: 0.25,
            acquisition_peak_months: vec![11, 12],
            acquisition_peak_boost: 1.4,
            acquisition_slow_months: vec![1, 2],
            acquisition_slow_factor: 0.8,
            acquisition_jitter: Band::new(0.85, 1.15),
            retention: Band::new(0.82, 0.88),
        }
    }
}

impl EcommerceParams {
    /// Fixed piecewise multiplier keyed by month-of-year
    pub fn seasonal_factor(&self, month: u32) -> f64 {
        if self.holiday_months.contains(&month) {
            self.holiday_boost
        } else if self.summer_months.contains(&month) {
            self.summer_boost
        } else {
            1.0
        }
    }

    pub fn acquisition_factor(&self, month: u32) -> f64 {
        if self.acquisition_peak_months.contains(&month) {
            self.acquisition_peak_boost
        } else if self.acquisition_slow_months.contains(&month) {
            self.acquisition_slow_factor
        } else {
            1.0
        }
    }
}

/// A named customer dimension record with a pre-assigned segment
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CustomerSpec {
    pub id: String,
    pub name: String,
    pub group: CustomerGroup,
}

/// A product dimension record
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ProductSpec {
    pub id: String,
    pub name: String,
    pub group: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
#[serde(default)]
pub struct SegmentWeights {
    pub new: f64,
    pub regular: f64,
    pub vip: f64,
    pub sensitive: f64,
}

impl Default for SegmentWeights {
    fn default() -> Self {
        Self {
            new: 0.22,
            regular: 0.38,
            vip: 0.35,
            sensitive: 0.05,
        }
    }
}

impl SegmentWeights {
    pub fn as_slices(&self) -> ([CustomerGroup; 4], [f64; 4]) {
        (
            CustomerGroup::ALL,
            [self.new, self.regular, self.vip, self.sensitive],
        )
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(default)]
pub struct SalesCustomerParams {
    pub year: i32,
    /// Named customers; the list is grown to `customer_target` with
    /// weighted-random segment assignment
    pub customers: Vec<CustomerSpec>,
    pub customer_target: usize,
    pub segment_weights: SegmentWeights,
    pub products: Vec<ProductSpec>,
    /// Product groups in summary order; every product must belong to one
    pub product_groups: Vec<String>,
    pub invoices_per_month_low: i64,
    pub invoices_per_month_high: i64,
    pub first_invoice_number: u32,
    pub base_amount: Band,
    pub vip_multiplier: Band,
    pub regular_multiplier: Band,
    pub new_multiplier: Band,
    pub sensitive_multiplier: Band,
    pub quantity_low: i64,
    pub quantity_high: i64,
    /// The "previous year" comparison series is synthesized from the current
    /// totals with this factor; it is a simulated baseline, never real data
    pub previous_year_factor: Band,
}

impl Default for SalesCustomerParams {
    fn default() -> Self {
        let customer = |id: &str, name: &str, group: CustomerGroup| CustomerSpec {
            id: id.to_string(),
            name: name.to_string(),
            group,
        };
        let product = |id: &str, name: &str, group: &str| ProductSpec {
            id: id.to_string(),
            name: name.to_string(),
            group: group.to_string(),
        };

        use CustomerGroup::*;
        Self {
            year: 2023,
            customers: vec![
                customer("C001", "PrimeCore Innovations", New),
                customer("C002", "ClearWater Tech", Regular),
                customer("C003", "Silverline Industries", New),
                customer("C004", "AquaVita Industries", Vip),
                customer("C005", "NutriMax Solutions", Regular),
                customer("C006", "FreshFarm Products", Vip),
                customer("C007", "HealthCore Systems", Regular),
                customer("C008", "VitalLife Corp", Sensitive),
                customer("C009", "GreenLeaf Enterprises", Vip),
                customer("C010", "PureFit Industries", New),
            ],
            customer_target: 50,
            segment_weights: SegmentWeights::default(),
            products: vec![
                product("P001", "Organic Juice", "Food and Beverages"),
                product("P002", "Protein Powder", "Nutrition Supplements"),
                product("P003", "Vitamin D3", "Nutrition Supplements"),
                product("P004", "Sports Drinks", "Food and Beverages"),
                product("P005", "Fitness Equipment", "Fitness and Exercise Equipment"),
                product("P006", "Wellness Kit", "Personal Care and Wellness Products"),
                product("P007", "Energy Bars", "Food and Beverages"),
                product("P008", "Yoga Mat", "Fitness and Exercise Equipment"),
                product("P009", "Skincare Set", "Personal Care and Wellness Products"),
                product("P010", "Multivitamins", "Nutrition Supplements"),
            ],
            product_groups: vec![
                "Food and Beverages".to_string(),
                "Nutrition Supplements".to_string(),
                "Fitness and Exercise Equipment".to_string(),
                "Personal Care and Wellness Products".to_string(),
            ],
            invoices_per_month_low: 60,
            invoices_per_month_high: 65,
            first_invoice_number: 1001,
            base_amount: Band::new(5000.0, 30000.0),
            vip_multiplier: Band::new(1.5, 2.5),
            regular_multiplier: Band::new(1.0, 1.8),
            new_multiplier: Band::new(0.8, 1.3),
            sensitive_multiplier: Band::new(0.5, 1.0),
            quantity_low: 1,
            quantity_high: 10,
            previous_year_factor: Band::new(0.85, 0.95),
        }
    }
}

impl SalesCustomerParams {
    pub fn multiplier_band(&self, group: CustomerGroup) -> Band {
        match group {
            CustomerGroup::Vip => self.vip_multiplier,
            CustomerGroup::Regular => self.regular_multiplier,
            CustomerGroup::New => self.new_multiplier,
            CustomerGroup::Sensitive => self.sensitive_multiplier,
        }
    }
}

//
// Export configuration
//

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ExportConfig {
    pub profiles: Vec<ExportProfile>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ExportProfile {
    pub filename: String,
    pub datasets_dir: String,
    pub dashboard: DashboardKind,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardKind {
    Ecommerce,
    SalesCustomer,
}

impl Plan {
    /// Default demo plan: both dataset families generated under `datasets/`
    /// and both dashboards rendered next to the plan file
    pub fn sample() -> Self {
        Self {
            meta: Some(Meta {
                name: Some("Business performance demo".to_string()),
            }),
            generate: GenerateConfig {
                profiles: vec![
                    GenerateProfile {
                        output_dir: "datasets/ecommerce".to_string(),
                        seed: 42,
                        generator: GeneratorKind::Ecommerce(EcommerceParams::default()),
                    },
                    GenerateProfile {
                        output_dir: "datasets/sales".to_string(),
                        seed: 42,
                        generator: GeneratorKind::SalesCustomer(SalesCustomerParams::default()),
                    },
                ],
            },
            export: ExportConfig {
                profiles: vec![
                    ExportProfile {
                        filename: "ecommerce_dashboard.html".to_string(),
                        datasets_dir: "datasets/ecommerce".to_string(),
                        dashboard: DashboardKind::Ecommerce,
                        title: None,
                    },
                    ExportProfile {
                        filename: "sales_customer_dashboard.html".to_string(),
                        datasets_dir: "datasets/sales".to_string(),
                        dashboard: DashboardKind::SalesCustomer,
                        title: None,
                    },
                ],
            },
        }
    }
}
