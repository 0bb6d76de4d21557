//! # 批量执行器
//!
//! 并行解析多个主文件。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代，结果保持输入顺序
//! - 进度条显示
//! - 错误收集与汇总报告
//!
//! ## 依赖关系
//! - 被 `commands/parse.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{MpError, Result};
use crate::utils::progress;

use rayon::prelude::*;
use std::path::PathBuf;

/// 单个文件处理结果
#[derive(Debug, Clone)]
pub enum ProcessResult<T> {
    /// 处理成功
    Success(T),
    /// 跳过（如输出已存在）
    Skipped(String),
    /// 处理失败
    Failed(String, String), // (文件路径, 错误信息)
}

/// 批量处理结果统计
#[derive(Debug)]
pub struct BatchResult<T> {
    /// 成功的结果（按输入顺序）
    pub success: Vec<T>,
    /// 跳过的文件
    pub skipped: Vec<String>,
    /// 失败详情
    pub failures: Vec<(String, String)>,
}

impl<T> Default for BatchResult<T> {
    fn default() -> Self {
        BatchResult {
            success: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
        }
    }
}

impl<T> BatchResult<T> {
    /// 合并处理结果
    pub fn merge(&mut self, result: ProcessResult<T>) {
        match result {
            ProcessResult::Success(value) => self.success.push(value),
            ProcessResult::Skipped(path) => self.skipped.push(path),
            ProcessResult::Failed(path, err) => self.failures.push((path, err)),
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success.len() + self.skipped.len() + self.failures.len()
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器，`jobs == 0` 时使用全部 CPU
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行处理文件列表
    pub fn run<T, F>(&self, files: Vec<PathBuf>, processor: F) -> Result<BatchResult<T>>
    where
        T: Send,
        F: Fn(&PathBuf) -> ProcessResult<T> + Sync + Send,
    {
        let pb = progress::create_progress_bar(files.len() as u64, "Parsing");

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
            .map_err(|e| MpError::Other(format!("Cannot start worker pool: {}", e)))?;

        let results: Vec<ProcessResult<T>> = pool.install(|| {
            files
                .par_iter()
                .map(|file| {
                    let result = processor(file);
                    pb.inc(1);
                    result
                })
                .collect()
        });

        pb.finish_and_clear();

        let mut batch_result = BatchResult::default();
        for result in results {
            batch_result.merge(result);
        }

        Ok(batch_result)
    }
}
