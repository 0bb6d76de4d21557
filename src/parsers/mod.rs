//! # 解析器模块
//!
//! 将 Materials Project 材料文档（及同目录的工作流文档）映射为 Archive。
//!
//! ## 流程
//! 1. 加载主文档（失败时记录错误，返回只含 Run 的归档）
//! 2. 结构、组分、对称性
//! 3. 顶层字段映射表
//! 4. 计算方法
//! 5. 辅助文件关联与工作流提取
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `models/` 数据模型
//! - 子模块: loader, json, structure, fields, method, siblings,
//!   elastic, eos, phonon, thermo

pub mod elastic;
pub mod eos;
pub mod fields;
pub mod json;
pub mod loader;
pub mod method;
pub mod phonon;
pub mod siblings;
pub mod structure;
pub mod thermo;

pub use siblings::{SiblingPolicy, SiblingReport};

use crate::models::{Archive, Run};
use std::path::{Path, PathBuf};

/// 解析配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// 辅助文件标识不匹配时的策略
    pub sibling_policy: SiblingPolicy,

    /// 是否关联同目录的辅助文件
    pub parse_siblings: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            sibling_policy: SiblingPolicy::Skip,
            parse_siblings: true,
        }
    }
}

/// 单个主文件的解析结果
#[derive(Debug, Default)]
pub struct ParseOutcome {
    pub archive: Archive,

    /// 主文档是否成功加载
    pub loaded: bool,

    /// 映射表中没有的顶层键
    pub unmapped_keys: Vec<String>,

    pub siblings: SiblingReport,
}

/// Materials Project 解析器
#[derive(Debug, Clone, Default)]
pub struct MpParser {
    config: ParserConfig,
}

impl MpParser {
    pub fn new(config: ParserConfig) -> Self {
        MpParser { config }
    }

    /// 解析主文件，任何失败都不会向调用方传播
    pub fn parse(&self, path: &Path) -> ParseOutcome {
        let mut outcome = ParseOutcome::default();
        let path = absolute(path);

        outcome.archive.run.push(Run::default());

        let data = match loader::load_document(&path) {
            Ok(data) => data,
            Err(e) => {
                log::error!("Failed to load json file: {}", e);
                return outcome;
            }
        };
        outcome.loaded = true;

        let run = outcome.archive.run_or_create();
        structure::parse_structure(&data, run);
        structure::parse_composition(&data, run);
        structure::parse_symmetry(&data, run);
        outcome.unmapped_keys = fields::copy_fields(&data, run);
        method::parse_method(&data, run);

        if self.config.parse_siblings {
            outcome.siblings = siblings::parse_siblings(
                &path,
                &data,
                &mut outcome.archive,
                self.config.sibling_policy,
            );
        }

        outcome
    }
}

fn absolute(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}
