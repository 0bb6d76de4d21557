//! # 结构记录
//!
//! System 记录：原子坐标、晶格、组分和对称性信息，以及 Materials Project
//! 材料文档中与结构相关的标量字段（`x_mp_` 前缀）。
//!
//! ## 依赖关系
//! - 被 `models/archive.rs` 使用
//! - 被 `parsers/structure.rs`, `parsers/fields.rs` 填充

use super::units::Quantity;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// 原子结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Atoms {
    /// 原子标签（元素符号）
    pub labels: Vec<String>,

    /// 笛卡尔坐标 (m)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub positions: Option<Quantity<Vec<Vec<f64>>>>,

    /// 晶格向量，行向量表示 a, b, c (m)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lattice_vectors: Option<Quantity<Vec<Vec<f64>>>>,
}

impl Atoms {
    /// 原子数
    pub fn n_atoms(&self) -> usize {
        self.labels.len()
    }
}

/// 组分条目：元素标签与其数量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Composition {
    pub x_mp_label: String,
    pub x_mp_value: f64,
}

/// 对称性信息
///
/// 已知字段按类型存放，其余键原样保留在 `extra` 中。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Symmetry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_number: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_crystal_system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_point_group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_symprec: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_hall: Option<String>,

    /// 未识别的键（带 `x_mp_` 前缀）
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// 结构快照
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct System {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atoms: Option<Atoms>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub x_mp_composition: Vec<Composition>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub x_mp_composition_reduced: Vec<Composition>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_symmetry: Option<Symmetry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_formula_pretty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_formula_anonymous: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_chemsys: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_oxide_type: Option<String>,

    /// 晶胞体积 (Å³，原样保留)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_volume: Option<f64>,
    /// 密度 (g/cm³，原样保留)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_density: Option<f64>,
    /// 每原子体积 (Å³，原样保留)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_density_atomic: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_nelements: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub x_mp_elements: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_nsites: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_symmetry_extra_keys_are_flattened() {
        let mut symmetry = Symmetry {
            x_mp_symbol: Some("Fd-3m".to_string()),
            ..Default::default()
        };
        symmetry
            .extra
            .insert("x_mp_wyckoffs".to_string(), json!(["a", "a"]));

        let value = serde_json::to_value(&symmetry).unwrap();
        assert_eq!(value["x_mp_symbol"], "Fd-3m");
        assert_eq!(value["x_mp_wyckoffs"], json!(["a", "a"]));
        assert!(value.get("x_mp_number").is_none());
    }

    #[test]
    fn test_empty_system_serializes_compactly() {
        let value = serde_json::to_value(System::default()).unwrap();
        assert_eq!(value, json!({}));
    }
}
