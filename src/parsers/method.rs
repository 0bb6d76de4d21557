//! # 计算方法映射
//!
//! Materials Project 数据均来自 VASP 平面波计算。根据 `run_type`
//! （或 `calc_types` 的第一个值）推断交换关联泛函，并读取截断能与
//! Hubbard U 设置。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 调用
//! - 使用 `models/method.rs`

use super::json::{self, Document};
use crate::models::{BasisSet, BasisSetCellDependent, Functional, Hubbard, Method, Quantity, Run, Unit};
use serde_json::Value;

/// 基组类型
pub const PLANE_WAVES: &str = "plane waves";

/// 计算类型 -> (交换泛函, 关联泛函)
const XC_TABLE: &[(&str, &str, &str)] = &[
    ("r2scan", "MGGA_X_R2SCAN", "MGGA_C_R2SCAN"),
    ("scan", "MGGA_X_SCAN", "MGGA_C_SCAN"),
    ("pbesol", "GGA_X_PBE_SOL", "GGA_C_PBE_SOL"),
    ("gga", "GGA_X_PBE", "GGA_C_PBE"),
];

/// 读取方法信息，总是新建一个 Method
pub fn parse_method(data: &Document, run: &mut Run) {
    let mut method = Method::default();

    let (exchange, correlation) = xc_functional(run_type(data).as_deref());
    method.dft.xc_functional.exchange.push(Functional::new(exchange));
    method.dft.xc_functional.correlation.push(Functional::new(correlation));

    let cell_dependent = encut(data)
        .map(|cutoff| BasisSetCellDependent {
            planewave_cutoff: Quantity::new(cutoff, Unit::ElectronVolt),
        })
        .into_iter()
        .collect();
    method.basis_set.push(BasisSet {
        kind: PLANE_WAVES.to_string(),
        cell_dependent,
    });

    method.x_mp_is_hubbard = json::get(data, "is_hubbard").and_then(Value::as_bool);
    method.x_mp_is_compatible = json::get(data, "is_compatible").and_then(Value::as_bool);
    if let Some(hubbards) = json::get(data, "hubbards").and_then(Value::as_object) {
        method.x_mp_hubbards = hubbards
            .iter()
            .filter_map(|(element, u)| {
                u.as_f64().map(|u| Hubbard {
                    x_mp_element: element.clone(),
                    x_mp_hubbard: u,
                })
            })
            .collect();
    }

    run.method.push(method);
}

fn run_type(data: &Document) -> Option<String> {
    if let Some(rt) = json::get(data, "run_type").and_then(json::as_text) {
        return Some(rt);
    }
    // calc_types: {"mp-149": "GGA Static", ...}
    json::get(data, "calc_types")
        .and_then(Value::as_object)
        .and_then(|types| types.values().next())
        .and_then(json::as_text)
}

/// 按计算类型前缀匹配泛函，未知时默认 PBE
fn xc_functional(run_type: Option<&str>) -> (&'static str, &'static str) {
    let rt = run_type.unwrap_or_default().to_lowercase();
    XC_TABLE
        .iter()
        .find(|(prefix, _, _)| rt.starts_with(prefix))
        .map(|(_, x, c)| (*x, *c))
        .unwrap_or(("GGA_X_PBE", "GGA_C_PBE"))
}

/// 截断能 (eV): `input.incar.ENCUT` 或顶层 `encut`
fn encut(data: &Document) -> Option<f64> {
    json::get(data, "input")
        .and_then(|input| input.get("incar"))
        .and_then(|incar| incar.get("ENCUT"))
        .and_then(Value::as_f64)
        .or_else(|| json::get_f64(data, "encut"))
}
