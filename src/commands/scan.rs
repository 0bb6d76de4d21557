//! # scan 命令实现
//!
//! 列出目录中的主文件，以及每个主文件会关联到的辅助文件和
//! 将要提取的工作流类型，不写出任何归档。
//!
//! ## 依赖关系
//! - 使用 `cli/scan.rs` 定义的参数
//! - 使用 `batch/collector.rs`, `parsers/{loader,siblings}.rs`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::batch::FileCollector;
use crate::cli::scan::ScanArgs;
use crate::error::{MpError, Result};
use crate::parsers::{loader, siblings};
use crate::utils::{output, progress};

use std::path::Path;
use tabled::{Table, Tabled};

/// 扫描结果行
#[derive(Debug, Clone, PartialEq, Tabled)]
pub struct ScanRow {
    #[tabled(rename = "Mainfile")]
    pub mainfile: String,
    #[tabled(rename = "Material")]
    pub material_id: String,
    #[tabled(rename = "Sibling")]
    pub sibling: String,
    #[tabled(rename = "Workflows")]
    pub workflows: String,
}

/// 执行 scan 命令
pub fn execute(args: ScanArgs) -> Result<()> {
    output::print_header("Scanning for materials documents");

    if !args.dir.is_dir() {
        return Err(MpError::DirectoryNotFound {
            path: args.dir.display().to_string(),
        });
    }

    let spinner = progress::create_spinner("Scanning");
    let files = FileCollector::new(args.dir.clone(), &args.pattern)?
        .recursive(args.recursive)
        .collect()?;

    let mut rows = Vec::new();
    for file in &files {
        rows.extend(scan_mainfile(file));
    }
    spinner.finish_and_clear();

    if files.is_empty() {
        output::print_warning(&format!("No materials documents found under {}", args.dir.display()));
        return Ok(());
    }

    println!("{}", Table::new(&rows));
    output::print_done(&format!("Found {} materials document(s)", files.len()));

    Ok(())
}

/// 主文件及其匹配的辅助文件，每个辅助文件一行
pub fn scan_mainfile(mainfile: &Path) -> Vec<ScanRow> {
    let name = mainfile.display().to_string();

    let primary = match loader::load_document(mainfile) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!("{}", e);
            return vec![ScanRow {
                mainfile: name,
                material_id: "-".to_string(),
                sibling: "-".to_string(),
                workflows: "unreadable".to_string(),
            }];
        }
    };

    let primary_id = siblings::primary_id(&primary);
    let material_id = primary_id
        .and_then(|v| v.as_str())
        .unwrap_or("-")
        .to_string();

    let mut rows: Vec<ScanRow> = siblings::list_siblings(mainfile)
        .iter()
        .filter_map(|path| {
            let doc = loader::load_document(path).ok()?;
            if siblings::document_id(&doc) != primary_id {
                return None;
            }
            let kinds = siblings::workflow_kinds(&doc);
            Some(ScanRow {
                mainfile: name.clone(),
                material_id: material_id.clone(),
                sibling: path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default(),
                workflows: if kinds.is_empty() {
                    "-".to_string()
                } else {
                    kinds.join(",")
                },
            })
        })
        .collect();

    if rows.is_empty() {
        rows.push(ScanRow {
            mainfile: name,
            material_id,
            sibling: "-".to_string(),
            workflows: "-".to_string(),
        });
    }
    rows
}
