//! # 状态方程工作流提取
//!
//! `volumes`/`energies` 为 E(V) 数据点，`eos` 为各拟合函数的结果:
//! ```text
//! "eos": {
//!     "murnaghan": {"B": ..., "C": ..., "E0": ..., "V0": ..., "eos_energies": [...]},
//!     ...
//! }
//! ```
//! 体积单位 Å³，能量单位 eV，B 单位 eV/Å³。
//!
//! ## 依赖关系
//! - 被 `parsers/siblings.rs` 调度
//! - 使用 `models/workflow.rs`

use super::json::{self, Document};
use crate::models::{Archive, EosFit, EquationOfState, Quantity, Unit, Workflow};
use serde_json::Value;

/// 文档是否包含状态方程数据
pub fn applies(data: &Document) -> bool {
    data.contains_key("eos")
}

/// 提取状态方程数据并追加一个 `equation_of_state` 工作流
pub fn parse_eos(data: &Document, archive: &mut Archive) {
    let mut eos = EquationOfState {
        volumes: json::get(data, "volumes")
            .and_then(json::f64_list)
            .map(|v| Quantity::new(v, Unit::CubicAngstrom)),
        energies: json::get(data, "energies")
            .and_then(json::f64_list)
            .map(|e| Quantity::new(e, Unit::ElectronVolt)),
        ..Default::default()
    };

    if let Some(fits) = json::get(data, "eos").and_then(Value::as_object) {
        for (name, result) in fits {
            match result.as_object() {
                Some(result) => eos.eos_fit.push(parse_fit(name, result)),
                None => log::warn!("EOS fit '{}' is not an object, skipped", name),
            }
        }
    }

    archive.workflow.push(Workflow::EquationOfState {
        equation_of_state: eos,
    });
}

fn parse_fit(name: &str, result: &Document) -> EosFit {
    EosFit {
        function_name: name.to_string(),
        bulk_modulus: json::get_f64(result, "B")
            .map(|b| Quantity::new(b, Unit::ElectronVoltPerCubicAngstrom)),
        bulk_modulus_derivative: json::get_f64(result, "C"),
        equilibrium_energy: json::get_f64(result, "E0")
            .map(|e| Quantity::new(e, Unit::ElectronVolt)),
        equilibrium_volume: json::get_f64(result, "V0")
            .map(|v| Quantity::new(v, Unit::CubicAngstrom)),
        fitted_energies: json::get(result, "eos_energies")
            .and_then(json::f64_list)
            .map(|e| Quantity::new(e, Unit::ElectronVolt)),
    }
}
