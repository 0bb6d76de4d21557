//! # 批量处理模块
//!
//! 提供主文件发现与并行解析能力。
//!
//! ## 功能
//! - 自动检测输入类型（文件/目录）
//! - 按文件名与内容识别主文件
//! - 并行处理
//! - 进度反馈与统计
//!
//! ## 依赖关系
//! - 被 `commands/` 模块使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod runner;

pub use collector::{is_mainfile, FileCollector};
pub use runner::{BatchRunner, ProcessResult};
