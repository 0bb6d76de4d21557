//! # JSON 文档加载
//!
//! 读取并解析 JSON 文件，要求顶层为对象。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs`, `parsers/siblings.rs`, `batch/collector.rs` 使用

use super::json::Document;
use crate::error::{MpError, Result};
use serde_json::Value;
use std::fs;
use std::path::Path;

/// 读取 JSON 文档
pub fn load_document(path: &Path) -> Result<Document> {
    let content = fs::read_to_string(path).map_err(|e| MpError::FileReadError {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_document(&content, path)
}

/// 从字符串内容解析 JSON 文档
pub fn parse_document(content: &str, path: &Path) -> Result<Document> {
    let value: Value = serde_json::from_str(content).map_err(|e| MpError::JsonError {
        path: path.display().to_string(),
        source: e,
    })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(MpError::InvalidFormat(format!(
            "{}: top-level JSON value is {}, expected an object",
            path.display(),
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
