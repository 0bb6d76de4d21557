//! # 主文件收集器
//!
//! 根据输入路径收集 Materials Project 材料文档（主文件）。
//!
//! ## 识别规则
//! - 文件名匹配 `.*mp.*materials.*\.json.*`
//! - 文件开头包含 `"pymatgen_version":`
//!
//! ## 依赖关系
//! - 被 `commands/parse.rs`, `commands/scan.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob` 过滤文件名，`regex` 识别主文件

use crate::error::{MpError, Result};
use regex::Regex;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use walkdir::WalkDir;

/// 主文件名模式
pub const MAINFILE_NAME_RE: &str = r".*mp.*materials.*\.json.*";

/// 主文件内容标记
pub const MAINFILE_CONTENTS_MARKER: &str = "\"pymatgen_version\":";

/// 内容检查读取的字节数
const HEAD_BYTES: u64 = 64 * 1024;

fn mainfile_name_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MAINFILE_NAME_RE).ok()).as_ref()
}

/// 文件名是否符合主文件模式
pub fn matches_mainfile_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .zip(mainfile_name_re())
        .map(|(n, re)| re.is_match(n))
        .unwrap_or(false)
}

/// 文件开头是否包含 pymatgen 版本标记
pub fn has_mainfile_contents(path: &Path) -> bool {
    let file = match File::open(path) {
        Ok(f) => f,
        Err(_) => return false,
    };

    let mut head = Vec::new();
    if file.take(HEAD_BYTES).read_to_end(&mut head).is_err() {
        return false;
    }
    // 截断处可能切开多字节字符
    String::from_utf8_lossy(&head).contains(MAINFILE_CONTENTS_MARKER)
}

/// 是否为主文件
pub fn is_mainfile(path: &Path) -> bool {
    matches_mainfile_name(path) && has_mainfile_contents(path)
}

/// 主文件收集器
pub struct FileCollector {
    /// 输入路径
    input: PathBuf,
    /// 文件名过滤模式
    pattern: glob::Pattern,
    /// 是否递归
    recursive: bool,
}

impl FileCollector {
    /// 创建新的收集器，`pattern` 为 glob 文件名过滤
    pub fn new(input: PathBuf, pattern: &str) -> Result<Self> {
        let pattern = glob::Pattern::new(pattern).map_err(|e| {
            MpError::InvalidArgument(format!("Invalid pattern '{}': {}", pattern, e))
        })?;
        Ok(Self {
            input,
            pattern,
            recursive: false,
        })
    }

    /// 设置是否递归搜索
    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集所有主文件（排序）
    ///
    /// 单文件输入总是返回该文件本身，由调用方决定是否警告。
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if self.input.is_file() {
            return Ok(vec![self.input.clone()]);
        }

        if !self.input.is_dir() {
            return Err(MpError::DirectoryNotFound {
                path: self.input.display().to_string(),
            });
        }

        let max_depth = if self.recursive { usize::MAX } else { 1 };

        let mut files: Vec<PathBuf> = WalkDir::new(&self.input)
            .max_depth(max_depth)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                e.file_name()
                    .to_str()
                    .map(|n| self.pattern.matches(n))
                    .unwrap_or(false)
            })
            .map(|e| e.into_path())
            .filter(|p| is_mainfile(p))
            .collect();

        files.sort();
        Ok(files)
    }
}
