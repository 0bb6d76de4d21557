//! # 工作流结果数据模型
//!
//! 弹性、状态方程、声子、热力学稳定性四类工作流，以带标签的枚举表示。
//!
//! ## 依赖关系
//! - 被 `models/archive.rs` 使用
//! - 被 `parsers/elastic.rs`, `parsers/eos.rs`, `parsers/phonon.rs`,
//!   `parsers/thermo.rs` 填充

use super::units::Quantity;
use serde::{Deserialize, Serialize};

/// 二阶弹性常数
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Elastic {
    pub energy_stress_calculator: String,
    pub calculation_method: String,
    pub elastic_constants_order: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub n_deformations: Option<usize>,

    /// 弹性常数矩阵 (Pa)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elastic_constants_matrix_second_order: Option<Quantity<Vec<Vec<f64>>>>,

    /// 柔度矩阵 (1/Pa)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compliance_matrix_second_order: Option<Quantity<Vec<Vec<f64>>>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub shear_modulus_reuss: Option<Quantity<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shear_modulus_voigt: Option<Quantity<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shear_modulus_hill: Option<Quantity<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_modulus_reuss: Option<Quantity<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_modulus_voigt: Option<Quantity<f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_modulus_hill: Option<Quantity<f64>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub poisson_ratio_hill: Option<f64>,
}

/// 单个状态方程拟合
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EosFit {
    pub function_name: String,

    /// B (Pa)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_modulus: Option<Quantity<f64>>,

    /// B' (无量纲)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bulk_modulus_derivative: Option<f64>,

    /// E0 (J)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equilibrium_energy: Option<Quantity<f64>>,

    /// V0 (m³)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub equilibrium_volume: Option<Quantity<f64>>,

    /// 拟合能量曲线 (J)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fitted_energies: Option<Quantity<Vec<f64>>>,
}

/// 状态方程
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquationOfState {
    /// 体积序列 (m³)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volumes: Option<Quantity<Vec<f64>>>,

    /// 能量序列 (J)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub energies: Option<Quantity<Vec<f64>>>,

    pub eos_fit: Vec<EosFit>,
}

/// 声子计算
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Phonon {
    pub force_calculator: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub with_non_analytic_correction: Option<bool>,
}

/// 分解产物
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decomposition {
    pub formula: Option<String>,
    pub fraction: Option<f64>,
}

/// 热力学稳定性
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stability {
    /// 形成能 (J)
    pub formation_energy: Quantity<f64>,

    /// 凸包距离 (J)
    pub delta_formation_energy: Quantity<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_stable: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub decomposition: Vec<Decomposition>,
}

/// 热力学
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thermodynamics {
    pub stability: Stability,
}

/// 工作流记录
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Workflow {
    Elastic { elastic: Elastic },
    EquationOfState { equation_of_state: EquationOfState },
    Phonon { phonon: Phonon },
    Thermodynamics { thermodynamics: Thermodynamics },
}

impl Workflow {
    /// 工作流类型标签
    pub fn kind(&self) -> &'static str {
        match self {
            Workflow::Elastic { .. } => "elastic",
            Workflow::EquationOfState { .. } => "equation_of_state",
            Workflow::Phonon { .. } => "phonon",
            Workflow::Thermodynamics { .. } => "thermodynamics",
        }
    }
}

impl std::fmt::Display for Workflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_serializes_with_type_tag() {
        let workflow = Workflow::Phonon {
            phonon: Phonon {
                force_calculator: "vasp".to_string(),
                with_non_analytic_correction: Some(true),
            },
        };

        let value = serde_json::to_value(&workflow).unwrap();
        assert_eq!(value["type"], "phonon");
        assert_eq!(value["phonon"]["force_calculator"], "vasp");
        assert_eq!(workflow.kind(), "phonon");
    }

    #[test]
    fn test_equation_of_state_tag() {
        let workflow = Workflow::EquationOfState {
            equation_of_state: EquationOfState::default(),
        };
        let value = serde_json::to_value(&workflow).unwrap();
        assert_eq!(value["type"], "equation_of_state");
        assert_eq!(workflow.to_string(), "equation_of_state");
    }
}
