//! # 批量执行器
//!
//! 并行解析日志文件，结果按输入顺序返回。
//!
//! ## 功能
//! - 基于 rayon 的并行迭代（`--jobs`，0 表示全部核心）
//! - 进度条显示
//! - 失败统计与汇总报告
//!
//! 合并阶段依赖输入顺序（标签集"较长者胜出"、警告与总能量输出），
//! 因此这里只负责并行解析，不做任何合并。
//!
//! ## 依赖关系
//! - 被 `commands/report.rs` 调用
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::error::{GedsError, Result};
use crate::utils::progress;

use rayon::prelude::*;
use std::path::{Path, PathBuf};

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct BatchResult {
    /// 成功数量
    pub success: usize,
    /// 失败数量
    pub failed: usize,
    /// 失败详情 (文件路径, 错误信息)
    pub failures: Vec<(String, String)>,
}

impl BatchResult {
    /// 记录单个文件的处理结果
    pub fn record(&mut self, path: &Path, error: Option<&GedsError>) {
        match error {
            None => self.success += 1,
            Some(err) => {
                self.failed += 1;
                self.failures
                    .push((path.display().to_string(), err.to_string()));
            }
        }
    }

    /// 总处理数量
    pub fn total(&self) -> usize {
        self.success + self.failed
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 并行作业数
    jobs: usize,
}

impl BatchRunner {
    /// 创建新的批量执行器
    pub fn new(jobs: usize) -> Self {
        let jobs = if jobs == 0 { num_cpus::get() } else { jobs };
        Self { jobs }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// 并行处理文件列表，返回值与输入一一对应
    pub fn run<T, F>(&self, files: &[PathBuf], processor: F) -> Vec<Result<T>>
    where
        T: Send,
        F: Fn(&Path) -> Result<T> + Sync + Send,
    {
        let pb = progress::create_progress_bar(files.len() as u64, "Parsing");

        let parse_all = || -> Vec<Result<T>> {
            files
                .par_iter()
                .map(|file| {
                    let result = processor(file);
                    pb.inc(1);
                    result
                })
                .collect()
        };

        // 线程池创建失败时退回全局线程池
        let results = match rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .build()
        {
            Ok(pool) => pool.install(parse_all),
            Err(_) => parse_all(),
        };

        pb.finish_and_clear();
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_keep_input_order() {
        let files: Vec<PathBuf> = (0..32).map(|i| PathBuf::from(format!("{i}.log"))).collect();
        let runner = BatchRunner::new(4);
        let results = runner.run(&files, |path| {
            let stem = path.file_stem().unwrap().to_string_lossy().to_string();
            if stem == "7" {
                Err(GedsError::FileNotFound { path: stem })
            } else {
                Ok(stem)
            }
        });

        assert_eq!(results.len(), 32);
        assert_eq!(results[0].as_ref().unwrap(), "0");
        assert_eq!(results[31].as_ref().unwrap(), "31");
        assert!(results[7].is_err());
    }

    #[test]
    fn test_batch_result_counts() {
        let mut summary = BatchResult::default();
        summary.record(Path::new("a.log"), None);
        let err = GedsError::LogFormat {
            path: "b.log".into(),
            anchor: "RUN TITLE".into(),
        };
        summary.record(Path::new("b.log"), Some(&err));
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.failures[0].0, "b.log");
    }

    #[test]
    fn test_zero_jobs_uses_all_cores() {
        assert_eq!(BatchRunner::new(0).jobs(), num_cpus::get());
    }
}
