//! # 单点计算结果数据模型
//!
//! 存储单点能量以及声子态密度、声子能带。
//!
//! ## 依赖关系
//! - 被 `models/archive.rs` 使用
//! - 被 `parsers/fields.rs`, `parsers/phonon.rs` 填充

use super::units::Quantity;
use serde::{Deserialize, Serialize};

/// 态密度数值序列
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DosValues {
    /// 态密度 (1/J)
    pub value: Quantity<Vec<f64>>,
}

/// 态密度
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dos {
    /// 能量网格 (J)
    pub energies: Quantity<Vec<f64>>,

    /// 总态密度（每个自旋通道一条）
    pub total: Vec<DosValues>,
}

/// 能带路径上的一段
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BandEnergies {
    /// 能量 [spin][k][band] (J)
    pub energies: Quantity<Vec<Vec<Vec<f64>>>>,

    /// 该段的 k 点（倒格子分数坐标）
    pub kpoints: Vec<Vec<f64>>,

    /// 两个端点的高对称点标签
    pub endpoints_labels: Vec<String>,
}

impl BandEnergies {
    /// 该段包含的 k 点数
    pub fn n_kpoints(&self) -> usize {
        self.kpoints.len()
    }
}

/// 能带结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BandStructure {
    pub segment: Vec<BandEnergies>,
}

/// 单点计算
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Calculation {
    /// 未修正的每原子能量 (J)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_uncorrected_energy_per_atom: Option<Quantity<f64>>,

    /// 每原子能量 (J)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_energy_per_atom: Option<Quantity<f64>>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dos_phonon: Vec<Dos>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub band_structure_phonon: Vec<BandStructure>,
}
