//! # 统一错误处理模块
//!
//! 定义 geds 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// geds 统一错误类型
#[derive(Error, Debug)]
pub enum GedsError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ─────────────────────────────────────────────────────────────
    // 日志解析错误（仅终止当前文件）
    // ─────────────────────────────────────────────────────────────
    #[error("{path}: anchor '{anchor}' not found before end of log")]
    LogFormat { path: String, anchor: String },

    #[error("{path}: malformed {context} line: '{line}'")]
    LogValue {
        path: String,
        context: String,
        line: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // ─────────────────────────────────────────────────────────────
    // CSV 错误
    // ─────────────────────────────────────────────────────────────
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    // ─────────────────────────────────────────────────────────────
    // 其他
    // ─────────────────────────────────────────────────────────────
    #[error("No log files found matching pattern: {pattern}")]
    NoFilesFound { pattern: String },

    #[error("None of the {count} log file(s) could be parsed")]
    NoRuns { count: usize },
}

impl GedsError {
    /// 是否为只影响单个日志文件的解析错误
    pub fn is_log_error(&self) -> bool {
        matches!(
            self,
            GedsError::LogFormat { .. }
                | GedsError::LogValue { .. }
                | GedsError::FileReadError { .. }
                | GedsError::FileNotFound { .. }
        )
    }
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, GedsError>;
