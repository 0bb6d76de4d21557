//! # parse 命令实现
//!
//! 批量解析材料文档并写出归档 JSON。
//!
//! ## 功能
//! - 收集主文件（单文件或目录）
//! - 并行解析，每个主文件生成 `<stem>.archive.json`
//! - 终端汇总表格，可选 CSV 输出
//!
//! ## 依赖关系
//! - 使用 `cli/parse.rs` 定义的参数
//! - 使用 `batch/`, `parsers/`
//! - 使用 `utils/output.rs`

use crate::batch::{is_mainfile, BatchRunner, FileCollector, ProcessResult};
use crate::cli::parse::ParseArgs;
use crate::error::{MpError, Result};
use crate::parsers::{MpParser, ParseOutcome};
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

/// 归档文件后缀
const ARCHIVE_EXTENSION: &str = "archive.json";

/// 汇总表格行
#[derive(Debug, Clone, Tabled)]
pub struct SummaryRow {
    #[tabled(rename = "File")]
    pub file: String,
    #[tabled(rename = "Material")]
    pub material_id: String,
    #[tabled(rename = "Atoms")]
    pub atoms: usize,
    #[tabled(rename = "Workflows")]
    pub workflows: String,
    #[tabled(rename = "Siblings")]
    pub siblings: usize,
    #[tabled(rename = "Unmapped")]
    pub unmapped: usize,
    #[tabled(rename = "Status")]
    pub status: String,
}

impl SummaryRow {
    fn from_outcome(file: &Path, outcome: &ParseOutcome) -> Self {
        let run = outcome.archive.run.first();
        let workflows: Vec<&str> = outcome.archive.workflow.iter().map(|w| w.kind()).collect();

        SummaryRow {
            file: file.display().to_string(),
            material_id: run
                .and_then(|r| r.x_mp_material_id.clone())
                .unwrap_or_else(|| "-".to_string()),
            atoms: run
                .and_then(|r| r.system.first())
                .and_then(|s| s.atoms.as_ref())
                .map(|a| a.n_atoms())
                .unwrap_or(0),
            workflows: if workflows.is_empty() {
                "-".to_string()
            } else {
                workflows.join(",")
            },
            siblings: outcome.siblings.matched.len(),
            unmapped: outcome.unmapped_keys.len(),
            status: if !outcome.loaded {
                "unreadable".to_string()
            } else if !outcome.siblings.not_visited.is_empty() {
                "halted".to_string()
            } else {
                "ok".to_string()
            },
        }
    }
}

/// 执行 parse 命令
pub fn execute(args: ParseArgs) -> Result<()> {
    output::print_header("Parsing Materials Project documents");

    if !args.input.exists() {
        return Err(MpError::DirectoryNotFound {
            path: args.input.display().to_string(),
        });
    }

    if let Some(dir) = &args.output {
        fs::create_dir_all(dir).map_err(|e| MpError::FileWriteError {
            path: dir.display().to_string(),
            source: e,
        })?;
    }

    let files = FileCollector::new(args.input.clone(), &args.pattern)?
        .recursive(args.recursive)
        .collect()?;

    if files.is_empty() {
        output::print_warning(&format!(
            "No materials documents matched '{}' under {}",
            args.pattern,
            args.input.display()
        ));
        return Ok(());
    }

    if args.input.is_file() && !is_mainfile(&args.input) {
        output::print_warning(&format!(
            "{} does not look like a materials document, parsing anyway",
            args.input.display()
        ));
    }

    output::print_info(&format!("Found {} document(s) to parse", files.len()));

    let parser = MpParser::new(args.parser_config());
    let runner = BatchRunner::new(args.jobs);

    let result = runner.run(files, |file| {
        let target = archive_path(file, args.output.as_deref());
        if target.exists() && !args.overwrite {
            return ProcessResult::Skipped(target.display().to_string());
        }

        let outcome = parser.parse(file);
        if !outcome.unmapped_keys.is_empty() {
            log::info!(
                "{}: unmapped keys {}",
                file.display(),
                outcome.unmapped_keys.join(", ")
            );
        }

        match write_archive(&outcome, &target) {
            Ok(()) => ProcessResult::Success(SummaryRow::from_outcome(file, &outcome)),
            Err(e) => ProcessResult::Failed(file.display().to_string(), e.to_string()),
        }
    })?;

    for path in &result.skipped {
        output::print_skip(&format!("{} exists (use --overwrite)", path));
    }
    for (path, err) in &result.failures {
        output::print_error(&format!("{}: {}", path, err));
    }

    if !result.success.is_empty() {
        println!("{}", Table::new(&result.success));
    }

    if let Some(csv_path) = &args.summary_csv {
        save_summary_csv(&result.success, csv_path)?;
        output::print_success(&format!("Summary saved to '{}'", csv_path.display()));
    }

    output::print_done(&format!(
        "Parsed {} of {} document(s) ({} skipped, {} failed)",
        result.success.len(),
        result.total(),
        result.skipped.len(),
        result.failures.len()
    ));

    Ok(())
}

/// 主文件对应的归档路径: `<out_dir 或 主文件目录>/<stem>.archive.json`
pub fn archive_path(mainfile: &Path, out_dir: Option<&Path>) -> PathBuf {
    let stem = mainfile
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("materials");
    let dir = out_dir
        .or_else(|| mainfile.parent())
        .unwrap_or_else(|| Path::new("."));
    dir.join(format!("{}.{}", stem, ARCHIVE_EXTENSION))
}

fn write_archive(outcome: &ParseOutcome, target: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(&outcome.archive).map_err(|e| MpError::JsonError {
        path: target.display().to_string(),
        source: e,
    })?;

    fs::write(target, content).map_err(|e| MpError::FileWriteError {
        path: target.display().to_string(),
        source: e,
    })
}

/// 保存汇总到 CSV
fn save_summary_csv(rows: &[SummaryRow], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    wtr.write_record([
        "file",
        "material_id",
        "n_atoms",
        "workflows",
        "n_siblings",
        "n_unmapped",
        "status",
    ])?;

    for r in rows {
        wtr.write_record([
            r.file.clone(),
            r.material_id.clone(),
            r.atoms.to_string(),
            r.workflows.clone(),
            r.siblings.to_string(),
            r.unmapped.to_string(),
            r.status.clone(),
        ])?;
    }

    wtr.flush().map_err(|e| MpError::FileWriteError {
        path: output_path.display().to_string(),
        source: e,
    })?;

    Ok(())
}
