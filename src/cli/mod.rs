//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `parse`: 将材料文档解析为归档 JSON
//! - `scan`: 列出主文件及其关联的辅助文件
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: parse, scan

pub mod parse;
pub mod scan;

use clap::{Parser, Subcommand};

/// mpparser - Materials Project 数据解析器
#[derive(Parser)]
#[command(name = "mpparser")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(about = "Map Materials Project JSON documents to normalized archives", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Parse materials documents and write <stem>.archive.json files
    Parse(parse::ParseArgs),

    /// List materials documents and their correlated workflow files
    Scan(scan::ScanArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_flags() {
        let cli = Cli::parse_from([
            "mpparser", "-vv", "parse", "data", "-o", "out", "-r", "-j", "4", "--strict-siblings",
        ]);
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Parse(args) => {
                assert_eq!(args.input.to_str(), Some("data"));
                assert_eq!(args.output.as_ref().and_then(|p| p.to_str()), Some("out"));
                assert!(args.recursive);
                assert_eq!(args.jobs, 4);
                assert!(args.strict_siblings);
                assert!(!args.no_siblings);
                assert_eq!(args.pattern, "*.json*");
            }
            Commands::Scan(_) => panic!("expected parse"),
        }
    }
}
