//! # 物理单位标注
//!
//! 所有带单位的数值在写入记录时统一换算为 SI 单位，并保留单位标签。
//! 源数据使用的单位（Å、eV、GPa、THz 等）由 [`Unit`] 描述。
//! 无量纲量（泊松比、体模量导数）直接以 `f64` 存储。
//!
//! ## 依赖关系
//! - 被 `models/` 其他子模块和 `parsers/` 使用
//! - 无外部模块依赖

use serde::{Deserialize, Serialize};

/// 1 Å (m)
pub const ANGSTROM: f64 = 1e-10;

/// 1 eV (J)
pub const ELECTRON_VOLT: f64 = 1.602176634e-19;

/// 1 GPa (Pa)
pub const GIGAPASCAL: f64 = 1e9;

/// 1 THz (Hz)
pub const TERAHERTZ: f64 = 1e12;

/// 普朗克常数 h (J·s)
pub const PLANCK: f64 = 6.62607015e-34;

/// 源数据单位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    /// 长度 (Å)
    Angstrom,
    /// 体积 (Å³)
    CubicAngstrom,
    /// 能量 (eV)
    ElectronVolt,
    /// 体模量 (eV/Å³)
    ElectronVoltPerCubicAngstrom,
    /// 应力 (GPa)
    GigaPascal,
    /// 柔度 (1/GPa)
    InverseGigaPascal,
    /// 声子频率按 E = hν 折算的能量 (THz·h)
    TeraHertzPlanck,
    /// 态密度 (1/(THz·h))
    InverseTeraHertzPlanck,
}

impl Unit {
    /// 换算到 SI 的比例因子
    pub fn si_factor(self) -> f64 {
        match self {
            Unit::Angstrom => ANGSTROM,
            Unit::CubicAngstrom => ANGSTROM.powi(3),
            Unit::ElectronVolt => ELECTRON_VOLT,
            Unit::ElectronVoltPerCubicAngstrom => ELECTRON_VOLT / ANGSTROM.powi(3),
            Unit::GigaPascal => GIGAPASCAL,
            Unit::InverseGigaPascal => 1.0 / GIGAPASCAL,
            Unit::TeraHertzPlanck => TERAHERTZ * PLANCK,
            Unit::InverseTeraHertzPlanck => 1.0 / (TERAHERTZ * PLANCK),
        }
    }

    /// 对应的 SI 单位
    pub fn si_unit(self) -> SiUnit {
        match self {
            Unit::Angstrom => SiUnit::Meter,
            Unit::CubicAngstrom => SiUnit::CubicMeter,
            Unit::ElectronVolt | Unit::TeraHertzPlanck => SiUnit::Joule,
            Unit::ElectronVoltPerCubicAngstrom | Unit::GigaPascal => SiUnit::Pascal,
            Unit::InverseGigaPascal => SiUnit::InversePascal,
            Unit::InverseTeraHertzPlanck => SiUnit::InverseJoule,
        }
    }
}

/// 记录中使用的 SI 单位标签
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SiUnit {
    #[serde(rename = "m")]
    Meter,
    #[serde(rename = "m**3")]
    CubicMeter,
    #[serde(rename = "J")]
    Joule,
    #[serde(rename = "1/J")]
    InverseJoule,
    #[serde(rename = "Pa")]
    Pascal,
    #[serde(rename = "1/Pa")]
    InversePascal,
}

impl std::fmt::Display for SiUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SiUnit::Meter => write!(f, "m"),
            SiUnit::CubicMeter => write!(f, "m**3"),
            SiUnit::Joule => write!(f, "J"),
            SiUnit::InverseJoule => write!(f, "1/J"),
            SiUnit::Pascal => write!(f, "Pa"),
            SiUnit::InversePascal => write!(f, "1/Pa"),
        }
    }
}

/// 可按比例缩放的数值（标量或任意嵌套的数组）
pub trait Scalable {
    fn scaled(self, factor: f64) -> Self;
}

impl Scalable for f64 {
    fn scaled(self, factor: f64) -> Self {
        self * factor
    }
}

impl<T: Scalable> Scalable for Vec<T> {
    fn scaled(self, factor: f64) -> Self {
        self.into_iter().map(|v| v.scaled(factor)).collect()
    }
}

/// 带 SI 单位的物理量
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity<T> {
    /// SI 单位下的数值
    pub magnitude: T,

    /// SI 单位
    pub unit: SiUnit,
}

impl<T: Scalable> Quantity<T> {
    /// 以源单位给出的数值创建物理量，立即换算为 SI
    pub fn new(value: T, unit: Unit) -> Self {
        Quantity {
            magnitude: value.scaled(unit.si_factor()),
            unit: unit.si_unit(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * b.abs().max(f64::MIN_POSITIVE)
    }

    #[test]
    fn test_angstrom_to_meter() {
        let q = Quantity::new(2.734364, Unit::Angstrom);
        assert!(approx(q.magnitude, 2.734364e-10));
        assert_eq!(q.unit, SiUnit::Meter);
    }

    #[test]
    fn test_bulk_modulus_unit() {
        let q = Quantity::new(1.0, Unit::ElectronVoltPerCubicAngstrom);
        assert!(approx(q.magnitude, 1.602176634e11));
        assert_eq!(q.unit, SiUnit::Pascal);
    }

    #[test]
    fn test_phonon_energy_unit() {
        let q = Quantity::new(vec![1.0, 2.0], Unit::TeraHertzPlanck);
        assert!(approx(q.magnitude[0], 6.62607015e-22));
        assert!(approx(q.magnitude[1], 1.32521403e-21));

        let dos = Quantity::new(1.0, Unit::InverseTeraHertzPlanck);
        assert!(approx(dos.magnitude, 1.0 / 6.62607015e-22));
        assert_eq!(dos.unit, SiUnit::InverseJoule);
    }

    #[test]
    fn test_nested_arrays_are_scaled() {
        let q = Quantity::new(vec![vec![1.0, 0.0], vec![0.0, 2.0]], Unit::GigaPascal);
        assert_eq!(q.magnitude, vec![vec![1e9, 0.0], vec![0.0, 2e9]]);
        assert_eq!(q.unit.to_string(), "Pa");
    }

    #[test]
    fn test_compliance_unit() {
        let q = Quantity::new(-2.3, Unit::InverseGigaPascal);
        assert!(approx(q.magnitude, -2.3e-9));
        assert_eq!(q.unit, SiUnit::InversePascal);
    }
}
