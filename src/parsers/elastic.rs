//! # 弹性工作流提取
//!
//! 字段优先从嵌套的 `elasticity` 对象中读取，其次从文档顶层读取。
//! 张量与模量以 GPa 给出，换算为 Pa。
//!
//! ## 依赖关系
//! - 被 `parsers/siblings.rs` 调度
//! - 使用 `models/workflow.rs`

use super::json::{self, Document};
use crate::models::{Archive, Elastic, Quantity, Unit, Workflow};
use serde_json::Value;

/// 弹性常数计算程序
pub const CALCULATOR: &str = "VASP";

/// 求解方式
pub const CALCULATION_METHOD: &str = "stress";

/// 文档是否包含弹性数据
pub fn applies(data: &Document) -> bool {
    data.contains_key("elasticity")
}

/// 提取弹性数据并追加一个 `elastic` 工作流
pub fn parse_elastic(data: &Document, archive: &mut Archive) {
    let nested = json::get(data, "elasticity").and_then(Value::as_object);
    let field = |key: &str| {
        nested
            .and_then(|n| json::get(n, key))
            .or_else(|| json::get(data, key))
    };

    let mut elastic = Elastic {
        energy_stress_calculator: CALCULATOR.to_string(),
        calculation_method: CALCULATION_METHOD.to_string(),
        elastic_constants_order: field("order").and_then(json::as_int).unwrap_or(2),
        ..Default::default()
    };

    elastic.n_deformations = field("deformations")
        .and_then(Value::as_array)
        .map(Vec::len);

    elastic.elastic_constants_matrix_second_order = field("elastic_tensor")
        .and_then(tensor)
        .map(|t| Quantity::new(t, Unit::GigaPascal));
    elastic.compliance_matrix_second_order = field("compliance_tensor")
        .and_then(tensor)
        .map(|t| Quantity::new(t, Unit::InverseGigaPascal));

    let modulus = |flat: &str, group: &str, average: &str| {
        field(flat)
            .or_else(|| field(group).and_then(|g| g.get(average)))
            .and_then(Value::as_f64)
            .map(|v| Quantity::new(v, Unit::GigaPascal))
    };

    elastic.shear_modulus_reuss = modulus("g_reuss", "shear_modulus", "reuss");
    elastic.shear_modulus_voigt = modulus("g_voigt", "shear_modulus", "voigt");
    elastic.shear_modulus_hill = modulus("g_vrh", "shear_modulus", "vrh");
    elastic.bulk_modulus_reuss = modulus("k_reuss", "bulk_modulus", "reuss");
    elastic.bulk_modulus_voigt = modulus("k_voigt", "bulk_modulus", "voigt");
    elastic.bulk_modulus_hill = modulus("k_vrh", "bulk_modulus", "vrh");

    elastic.poisson_ratio_hill = field("homogeneous_poisson").and_then(Value::as_f64);

    archive.workflow.push(Workflow::Elastic { elastic });
}

/// 张量可以是 6x6 数组，或 `{"ieee_format": ..., "raw": ...}`
fn tensor(value: &Value) -> Option<Vec<Vec<f64>>> {
    match value {
        Value::Object(map) => map
            .get("ieee_format")
            .or_else(|| map.get("raw"))
            .and_then(json::f64_matrix),
        other => json::f64_matrix(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().unwrap().clone()
    }

    fn only_elastic(archive: &Archive) -> &Elastic {
        assert_eq!(archive.workflow.len(), 1);
        match &archive.workflow[0] {
            Workflow::Elastic { elastic } => elastic,
            other => panic!("unexpected workflow {}", other),
        }
    }

    #[test]
    fn test_nested_elasticity_document() {
        let mut c = vec![vec![0.0; 6]; 6];
        c[2][1] = 53.0;
        let mut s = vec![vec![0.0; 6]; 6];
        s[1][0] = -2.3;
        let data = doc(json!({
            "task_id": "mp-149",
            "elasticity": {
                "elastic_tensor": c,
                "compliance_tensor": s,
                "g_vrh": 64.6,
                "k_reuss": 83.0,
                "k_voigt": 83.0112837,
                "homogeneous_poisson": 0.20424545172250694,
                "deformations": [[], [], []]
            }
        }));
        let mut archive = Archive::default();
        parse_elastic(&data, &mut archive);

        let elastic = only_elastic(&archive);
        assert_eq!(elastic.energy_stress_calculator, "VASP");
        assert_eq!(elastic.elastic_constants_order, 2);
        assert_eq!(elastic.n_deformations, Some(3));

        let c = &elastic.elastic_constants_matrix_second_order.as_ref().unwrap().magnitude;
        assert!((c[2][1] - 5.3e10).abs() < 1.0);
        let s = &elastic.compliance_matrix_second_order.as_ref().unwrap().magnitude;
        assert!((s[1][0] - (-2.3e-9)).abs() < 1e-18);

        assert!((elastic.shear_modulus_hill.as_ref().unwrap().magnitude - 6.46e10).abs() < 1.0);
        assert!((elastic.bulk_modulus_reuss.as_ref().unwrap().magnitude - 8.3e10).abs() < 1.0);
        assert!((elastic.bulk_modulus_voigt.as_ref().unwrap().magnitude - 8.30112837e10).abs() < 1.0);
        assert!(elastic.shear_modulus_reuss.is_none());
        assert_eq!(elastic.poisson_ratio_hill, Some(0.20424545172250694));
    }

    #[test]
    fn test_bulk_moduli_read_from_bulk_keys() {
        let data = doc(json!({"elasticity": {"g_reuss": 50.0, "k_reuss": 90.0}}));
        let mut archive = Archive::default();
        parse_elastic(&data, &mut archive);

        let elastic = only_elastic(&archive);
        assert!((elastic.shear_modulus_reuss.as_ref().unwrap().magnitude - 5.0e10).abs() < 1.0);
        assert!((elastic.bulk_modulus_reuss.as_ref().unwrap().magnitude - 9.0e10).abs() < 1.0);
    }

    #[test]
    fn test_grouped_moduli_and_ieee_tensor() {
        let data = doc(json!({
            "elasticity": {},
            "order": 3,
            "elastic_tensor": {"raw": [[1.0]], "ieee_format": [[2.0]]},
            "bulk_modulus": {"voigt": 88.0, "reuss": 88.0, "vrh": 88.0},
            "shear_modulus": {"vrh": 61.0}
        }));
        let mut archive = Archive::default();
        parse_elastic(&data, &mut archive);

        let elastic = only_elastic(&archive);
        assert_eq!(elastic.elastic_constants_order, 3);
        assert_eq!(
            elastic.elastic_constants_matrix_second_order.as_ref().unwrap().magnitude,
            vec![vec![2.0e9]]
        );
        assert!((elastic.bulk_modulus_hill.as_ref().unwrap().magnitude - 8.8e10).abs() < 1.0);
        assert!((elastic.shear_modulus_hill.as_ref().unwrap().magnitude - 6.1e10).abs() < 1.0);
        assert!(elastic.compliance_matrix_second_order.is_none());
        assert!(elastic.n_deformations.is_none());
    }
}
