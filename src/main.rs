//! # mpparser - Materials Project 数据解析器
//!
//! 将 Materials Project 导出的 JSON 文档（材料文档及同目录的弹性、
//! 状态方程、声子、热力学文档）映射为带 SI 单位的结构化归档。
//!
//! ## 子命令
//! - `parse` - 解析材料文档并写出 `<stem>.archive.json`
//! - `scan`  - 列出材料文档及其关联的工作流文件
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (主文件发现与并行执行)
//!   │     ├── parsers/   (文档映射与工作流提取)
//!   │     └── models/    (归档数据模型与单位)
//!   ├── utils/      (终端输出、日志、进度条)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod error;
mod models;
mod parsers;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();
    utils::output::init_logger(cli.verbose);

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
