//! # 计算方法记录
//!
//! 交换关联泛函、基组和 Hubbard U 修正。
//!
//! ## 依赖关系
//! - 被 `models/archive.rs` 使用
//! - 被 `parsers/method.rs` 填充

use super::units::Quantity;
use serde::{Deserialize, Serialize};

/// 单个泛函（libxc 命名）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Functional {
    pub name: String,
}

impl Functional {
    pub fn new(name: impl Into<String>) -> Self {
        Functional { name: name.into() }
    }
}

/// 交换关联泛函
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct XcFunctional {
    pub exchange: Vec<Functional>,
    pub correlation: Vec<Functional>,
}

/// DFT 设置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dft {
    pub xc_functional: XcFunctional,
}

/// 依赖晶胞的基组参数
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasisSetCellDependent {
    /// 平面波截断能 (J)
    pub planewave_cutoff: Quantity<f64>,
}

/// 基组
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasisSet {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cell_dependent: Vec<BasisSetCellDependent>,
}

/// 单个元素的 Hubbard U 值 (eV，原样保留)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hubbard {
    pub x_mp_element: String,
    pub x_mp_hubbard: f64,
}

/// 计算方法
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Method {
    pub dft: Dft,

    pub basis_set: Vec<BasisSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_is_hubbard: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_is_compatible: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub x_mp_hubbards: Vec<Hubbard>,
}
