use include_dir::{include_dir, Dir};
use std::fs;
use std::path::Path;
use tracing::{error, info};

use crate::plan::{
    DashboardKind, ExportConfig, ExportProfile, GenerateConfig, GenerateProfile, GeneratorKind,
    Meta, Plan,
};

static SAMPLE_DIR_DASHBOARDS: Dir = include_dir!("sample/dashboards");

/// Prints a ready-to-edit plan for the named dataset family
pub fn generate_template(family: String) {
    info!("Generating plan template: {}", family);
    let plan = match family.to_lowercase().as_str() {
        "ecommerce" => ecommerce_template(),
        "sales-customer" | "sales_customer" => sales_customer_template(),
        _ => {
            error!(
                "Unsupported dataset family: {} - use ecommerce, sales-customer",
                family
            );
            return;
        }
    };

    match serde_yaml::to_string(&plan) {
        Ok(yaml) => println!("{}", yaml),
        Err(e) => error!("Failed to serialize plan template: {}", e),
    }
}

fn ecommerce_template() -> Plan {
    Plan {
        meta: Some(Meta {
            name: Some("E-commerce dashboard".to_string()),
        }),
        generate: GenerateConfig {
            profiles: vec![GenerateProfile {
                output_dir: "datasets".to_string(),
                seed: 42,
                generator: GeneratorKind::Ecommerce(Default::default()),
            }],
        },
        export: ExportConfig {
            profiles: vec![ExportProfile {
                filename: "ecommerce_dashboard.html".to_string(),
                datasets_dir: "datasets".to_string(),
                dashboard: DashboardKind::Ecommerce,
                title: None,
            }],
        },
    }
}

fn sales_customer_template() -> Plan {
    Plan {
        meta: Some(Meta {
            name: Some("Sales customer dashboard".to_string()),
        }),
        generate: GenerateConfig {
            profiles: vec![GenerateProfile {
                output_dir: "datasets".to_string(),
                seed: 42,
                generator: GeneratorKind::SalesCustomer(Default::default()),
            }],
        },
        export: ExportConfig {
            profiles: vec![ExportProfile {
                filename: "sales_customer_dashboard.html".to_string(),
                datasets_dir: "datasets".to_string(),
                dashboard: DashboardKind::SalesCustomer,
                title: None,
            }],
        },
    }
}

/// Unpacks an embedded sample project into the target directory
pub fn generate_sample(sample: String, dir: String) {
    info!("Generating sample project: {:?} in {:?}", sample, dir);
    let target_path = Path::new(&dir);
    if let Err(e) = fs::create_dir_all(target_path) {
        error!("Failed to create target directory: {:?}", e);
        return;
    }

    fn write_dir_contents(dir: &Dir, target_path: &Path) {
        for file in dir.files() {
            let relative_path = match file.path().strip_prefix(dir.path()) {
                Ok(path) => path,
                Err(e) => {
                    error!(
                        "Failed to create relative path for {:?}: {}",
                        file.path(),
                        e
                    );
                    continue;
                }
            };
            let target_file_path = target_path.join(relative_path);

            if let Some(parent) = target_file_path.parent() {
                if let Err(e) = fs::create_dir_all(parent) {
                    error!("Failed to create directory: {:?}", e);
                    return;
                }
            }

            if let Err(e) = fs::write(&target_file_path, file.contents()) {
                error!("Failed to write file: {:?}", e);
                return;
            }
        }

        for sub_dir in dir.dirs() {
            let relative_path = match sub_dir.path().strip_prefix(dir.path()) {
                Ok(path) => path,
                Err(e) => {
                    error!(
                        "Failed to create relative path for {:?}: {}",
                        sub_dir.path(),
                        e
                    );
                    continue;
                }
            };
            let sub_dir_path = target_path.join(relative_path);
            if let Err(e) = fs::create_dir_all(&sub_dir_path) {
                error!("Failed to create subdirectory: {:?}", e);
                return;
            }
            write_dir_contents(sub_dir, &sub_dir_path);
        }
    }

    match sample.to_lowercase().as_str() {
        "dashboards" | "dashboard" | "ref" => {
            write_dir_contents(&SAMPLE_DIR_DASHBOARDS, target_path)
        }
        _ => {
            error!("Unsupported sample: {} - use dashboards", sample);
            return;
        }
    }

    info!("Sample project generated successfully at: {:?}", dir);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn templates_round_trip_through_yaml() {
        for plan in [ecommerce_template(), sales_customer_template()] {
            let yaml = serde_yaml::to_string(&plan).unwrap();
            let back: Plan = serde_yaml::from_str(&yaml).unwrap();
            assert_eq!(back.generate.profiles.len(), 1);
            assert_eq!(back.export.profiles.len(), 1);
        }
    }

    #[test]
    fn embedded_sample_contains_a_plan() {
        assert!(SAMPLE_DIR_DASHBOARDS.get_file("plan.yaml").is_some());
    }
}
