//! # parse 子命令 CLI 定义
//!
//! 批量解析材料文档 (mp-*_materials.json -> *.archive.json)
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/parse.rs`

use crate::parsers::{ParserConfig, SiblingPolicy};
use clap::Args;
use std::path::PathBuf;

/// parse 子命令参数
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Materials document or directory containing them
    pub input: PathBuf,

    /// Output directory for archive files (default: next to each input)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Glob pattern for candidate file names
    #[arg(short, long, default_value = "*.json*")]
    pub pattern: String,

    /// Recurse into subdirectories
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Stop correlating workflow files at the first one of another material
    #[arg(long, default_value_t = false)]
    pub strict_siblings: bool,

    /// Only parse the materials document, ignore workflow files
    #[arg(long, default_value_t = false)]
    pub no_siblings: bool,

    /// Write the summary table to a CSV file
    #[arg(long)]
    pub summary_csv: Option<PathBuf>,

    /// Overwrite existing archive files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,
}

impl ParseArgs {
    /// 由命令行参数构建解析配置
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            sibling_policy: if self.strict_siblings {
                SiblingPolicy::Halt
            } else {
                SiblingPolicy::Skip
            },
            parse_siblings: !self.no_siblings,
        }
    }
}
