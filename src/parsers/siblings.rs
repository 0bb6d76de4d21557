//! # 辅助文件关联
//!
//! 扫描主文件所在目录中的其他 `.json` 文件，按 `material_id`（回退
//! `task_id`）与主文档匹配，并按键的存在分派给各工作流提取器。
//!
//! ## 分派规则（按顺序独立判断，同一文件可触发多个）
//! - `elasticity` → 弹性
//! - `eos` → 状态方程
//! - `ph_bs` / `ph_dos` → 声子
//! - `property_name == "thermo"` → 热力学
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`, `commands/scan.rs` 使用
//! - 使用 `parsers/{elastic,eos,phonon,thermo}.rs`

use super::json::{self, Document};
use super::{elastic, eos, loader, phonon, thermo};
use crate::models::Archive;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// 本工具写出的归档文件后缀，不作为辅助文件
pub const ARCHIVE_SUFFIX: &str = ".archive.json";

/// 标识不匹配时的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SiblingPolicy {
    /// 跳过该文件，继续处理其余文件
    #[default]
    Skip,
    /// 停止处理所有剩余文件
    Halt,
}

type Predicate = fn(&Document) -> bool;
type Handler = fn(&Document, &mut Archive);

/// (工作流类型, 判定, 提取)
const EXTRACTORS: &[(&str, Predicate, Handler)] = &[
    ("elastic", elastic::applies, elastic::parse_elastic),
    ("equation_of_state", eos::applies, eos::parse_eos),
    ("phonon", phonon::applies, phonon::parse_phonon),
    ("thermodynamics", thermo::applies, thermo::parse_thermo),
];

/// 一次关联的统计
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SiblingReport {
    /// 标识匹配并已分派的文件
    pub matched: Vec<PathBuf>,
    /// 无法读取或解析的文件
    pub unreadable: Vec<PathBuf>,
    /// 标识不匹配的文件
    pub mismatched: Vec<PathBuf>,
    /// 因 `Halt` 策略未处理的文件
    pub not_visited: Vec<PathBuf>,
}

/// 列出主文件所在目录中的其他 `.json` 文件（按文件名排序）
pub fn list_siblings(mainfile: &Path) -> Vec<PathBuf> {
    let dir = match mainfile.parent() {
        Some(d) if !d.as_os_str().is_empty() => d,
        _ => Path::new("."),
    };
    let main_name = mainfile.file_name();

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            log::warn!("Cannot list directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut siblings: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.is_file() && p.file_name() != main_name)
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .map(|n| n.ends_with(".json") && !n.ends_with(ARCHIVE_SUFFIX))
                .unwrap_or(false)
        })
        .collect();

    siblings.sort();
    siblings
}

/// 文档标识: `material_id`，缺失时取 `task_id`（`null` 视为缺失）
pub fn document_id(doc: &Document) -> Option<&Value> {
    json::get(doc, "material_id").or_else(|| json::get(doc, "task_id"))
}

/// 主文档标识，只看 `material_id`
pub fn primary_id(doc: &Document) -> Option<&Value> {
    json::get(doc, "material_id")
}

/// 文档会触发的工作流类型
pub fn workflow_kinds(doc: &Document) -> Vec<&'static str> {
    EXTRACTORS
        .iter()
        .filter(|(_, applies, _)| applies(doc))
        .map(|(kind, _, _)| *kind)
        .collect()
}

/// 依次执行所有适用的提取器
pub fn dispatch(doc: &Document, archive: &mut Archive) {
    for (kind, applies, extract) in EXTRACTORS {
        if applies(doc) {
            log::debug!("Extracting {} workflow", kind);
            extract(doc, archive);
        }
    }
}

/// 关联并提取主文件的所有辅助文件
pub fn parse_siblings(
    mainfile: &Path,
    primary: &Document,
    archive: &mut Archive,
    policy: SiblingPolicy,
) -> SiblingReport {
    let mut report = SiblingReport::default();
    let primary_id = primary_id(primary);

    let siblings = list_siblings(mainfile);
    for (i, path) in siblings.iter().enumerate() {
        let doc = match loader::load_document(path) {
            Ok(doc) => doc,
            Err(e) => {
                log::debug!("Skipping sibling: {}", e);
                report.unreadable.push(path.clone());
                continue;
            }
        };

        if document_id(&doc) != primary_id {
            report.mismatched.push(path.clone());
            match policy {
                SiblingPolicy::Skip => {
                    log::debug!("{} belongs to another material, skipped", path.display());
                    continue;
                }
                SiblingPolicy::Halt => {
                    log::warn!(
                        "{} belongs to another material; {} remaining sibling(s) not processed",
                        path.display(),
                        siblings.len() - i - 1
                    );
                    report.not_visited.extend(siblings[i + 1..].iter().cloned());
                    break;
                }
            }
        }

        dispatch(&doc, archive);
        report.matched.push(path.clone());
    }

    report
}
