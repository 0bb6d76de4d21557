//! # 数据模型模块
//!
//! 定义解析输出的层次化记录：Archive → Run → System/Method/Calculation，
//! 以及 Workflow 列表。所有物理量通过 `units` 携带 SI 单位。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `commands/` 使用
//! - 子模块: archive, system, method, calculation, workflow, units

pub mod archive;
pub mod calculation;
pub mod method;
pub mod system;
pub mod units;
pub mod workflow;

pub use archive::{Archive, CalcType, Origin, Run};
pub use calculation::{BandEnergies, BandStructure, Dos, DosValues};
pub use method::{BasisSet, BasisSetCellDependent, Functional, Hubbard, Method};
pub use system::{Atoms, Composition, Symmetry, System};
pub use units::{Quantity, Unit};
pub use workflow::{
    Decomposition, Elastic, EosFit, EquationOfState, Phonon, Stability, Thermodynamics, Workflow,
};
