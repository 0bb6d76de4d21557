//! # 归档根记录
//!
//! 一次解析产生一个 Archive：若干 Run（每个文档一个）及其工作流结果。
//!
//! ## 依赖关系
//! - 被 `parsers/` 填充，被 `commands/` 序列化输出
//! - 使用 `models/` 其他子模块

use super::calculation::Calculation;
use super::method::Method;
use super::system::System;
use super::workflow::Workflow;
use serde::{Deserialize, Serialize};

/// 程序名
pub const PROGRAM_NAME: &str = "MaterialsProject";

/// 产生数据的程序
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl Default for Program {
    fn default() -> Self {
        Program {
            name: PROGRAM_NAME.to_string(),
            version: None,
        }
    }
}

/// 计算类型条目 (task_id -> 计算类型)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalcType {
    pub x_mp_label: String,
    pub x_mp_value: String,
}

/// 属性来源
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_last_updated: Option<String>,
}

/// 单个文档对应的运行记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Run {
    pub program: Program,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub system: Vec<System>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub method: Vec<Method>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub calculation: Vec<Calculation>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_material_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_pymatgen_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_emmet_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_build_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_last_updated: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_mp_deprecated: Option<bool>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub x_mp_task_ids: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub x_mp_icsd_ids: Vec<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub x_mp_tags: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub x_mp_calc_types: Vec<CalcType>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub x_mp_origins: Vec<Origin>,
}

impl Run {
    /// 最后一个 System，不存在时新建
    pub fn system_or_create(&mut self) -> &mut System {
        if self.system.is_empty() {
            self.system.push(System::default());
        }
        let last = self.system.len() - 1;
        &mut self.system[last]
    }

    /// 最后一个 Calculation，不存在时新建
    pub fn calculation_or_create(&mut self) -> &mut Calculation {
        if self.calculation.is_empty() {
            self.calculation.push(Calculation::default());
        }
        let last = self.calculation.len() - 1;
        &mut self.calculation[last]
    }
}

/// 解析结果根记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Archive {
    pub run: Vec<Run>,

    pub workflow: Vec<Workflow>,
}

impl Archive {
    /// 最后一个 Run，不存在时新建
    pub fn run_or_create(&mut self) -> &mut Run {
        if self.run.is_empty() {
            self.run.push(Run::default());
        }
        let last = self.run.len() - 1;
        &mut self.run[last]
    }

    /// 指定类型的工作流
    pub fn workflows_of<'a>(&'a self, kind: &'a str) -> impl Iterator<Item = &'a Workflow> + 'a {
        self.workflow.iter().filter(move |w| w.kind() == kind)
    }
}
