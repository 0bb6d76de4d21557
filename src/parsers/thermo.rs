//! # 热力学稳定性提取
//!
//! 形成能 = `uncorrected_energy_per_atom` × `nsites`，缺失时分别取 0 和 1。
//!
//! ## 依赖关系
//! - 被 `parsers/siblings.rs` 调度
//! - 使用 `models/workflow.rs`

use super::json::{self, Document};
use crate::models::{Archive, Decomposition, Quantity, Stability, Thermodynamics, Unit, Workflow};
use serde_json::Value;

/// 热力学文档的 `property_name`
pub const PROPERTY_NAME: &str = "thermo";

/// 文档是否为热力学数据
pub fn applies(data: &Document) -> bool {
    data.get("property_name").and_then(Value::as_str) == Some(PROPERTY_NAME)
}

/// 提取稳定性数据并追加一个 `thermodynamics` 工作流
pub fn parse_thermo(data: &Document, archive: &mut Archive) {
    let energy_per_atom = json::get_f64(data, "uncorrected_energy_per_atom").unwrap_or(0.0);
    let n_sites = json::get_f64(data, "nsites").unwrap_or(1.0);
    let above_hull = json::get_f64(data, "energy_above_hull").unwrap_or(0.0);

    let decomposition = json::get(data, "decomposes_to")
        .and_then(Value::as_array)
        .map(|products| {
            products
                .iter()
                .map(|p| Decomposition {
                    formula: p.get("formula").and_then(json::as_text),
                    fraction: p.get("amount").and_then(Value::as_f64),
                })
                .collect()
        })
        .unwrap_or_default();

    let stability = Stability {
        formation_energy: Quantity::new(energy_per_atom * n_sites, Unit::ElectronVolt),
        delta_formation_energy: Quantity::new(above_hull, Unit::ElectronVolt),
        is_stable: json::get(data, "is_stable").and_then(Value::as_bool),
        decomposition,
    };

    archive.workflow.push(Workflow::Thermodynamics {
        thermodynamics: Thermodynamics { stability },
    });
}
