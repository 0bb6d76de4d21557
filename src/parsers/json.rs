//! # JSON 取值工具
//!
//! 从 `serde_json::Value` 中宽松地提取数值、数组和字符串。
//! 类型不符时返回 `None`，由调用方决定跳过还是记录警告。
//!
//! ## 依赖关系
//! - 被 `parsers/` 各子模块使用

use serde_json::{Map, Value};

/// JSON 对象类型别名
pub type Document = Map<String, Value>;

/// 取键值，`null` 视为缺失
pub fn get<'a>(doc: &'a Document, key: &str) -> Option<&'a Value> {
    doc.get(key).filter(|v| !v.is_null())
}

/// 取数值
pub fn get_f64(doc: &Document, key: &str) -> Option<f64> {
    get(doc, key).and_then(Value::as_f64)
}

/// 数值数组
pub fn f64_list(value: &Value) -> Option<Vec<f64>> {
    value.as_array()?.iter().map(Value::as_f64).collect()
}

/// 二维数值数组（不要求每行等长）
pub fn f64_matrix(value: &Value) -> Option<Vec<Vec<f64>>> {
    value.as_array()?.iter().map(f64_list).collect()
}

/// 字符串；数字按其文本形式接受
pub fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        // MongoDB 导出的日期: {"$date": "..."}
        Value::Object(map) => map.get("$date").and_then(as_text),
        _ => None,
    }
}

/// 字符串数组
pub fn text_list(value: &Value) -> Option<Vec<String>> {
    value.as_array()?.iter().map(as_text).collect()
}

/// 整数；整值浮点数也接受
pub fn as_int(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.is_finite())
            .map(|f| f as i64)
    })
}

/// 转置矩形矩阵，行长不一致时返回 `None`
pub fn transpose(matrix: &[Vec<f64>]) -> Option<Vec<Vec<f64>>> {
    let n_cols = matrix.first().map(Vec::len).unwrap_or(0);
    if matrix.iter().any(|row| row.len() != n_cols) {
        return None;
    }
    Some(
        (0..n_cols)
            .map(|j| matrix.iter().map(|row| row[j]).collect())
            .collect(),
    )
}
