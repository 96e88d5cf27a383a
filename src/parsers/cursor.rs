//! # 日志游标
//!
//! 对单个日志的顺序读取，只暴露三个原语：`skip`、`find_line`、`rewind`。
//! 所有提取逻辑都通过它们表达，不直接操作文件位置。
//!
//! 行保留换行符，因此空行 (`"\n"`) 与输入结束 (`""`) 可以区分。
//! 构造时一次性读入内容，文件句柄在返回前即已释放。
//!
//! ## 依赖关系
//! - 被 `parsers/` 下所有提取器使用

use crate::error::{GedsError, Result};
use std::fs;
use std::path::Path;

/// 日志游标
#[derive(Debug, Clone)]
pub struct Cursor {
    /// 来源（用于错误信息）
    source: String,
    lines: Vec<String>,
    position: usize,
}

impl Cursor {
    /// 从文本内容创建
    pub fn new(content: &str, source: impl Into<String>) -> Self {
        Cursor {
            source: source.into(),
            lines: content.split_inclusive('\n').map(str::to_string).collect(),
            position: 0,
        }
    }

    /// 读取日志文件
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GedsError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = fs::read(path).map_err(|e| GedsError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(Self::new(
            &String::from_utf8_lossy(&content),
            path.display().to_string(),
        ))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// 跳过 n 行，返回最后读到的一行；到达末尾时返回空串
    pub fn skip(&mut self, n: usize) -> String {
        let mut line = String::new();
        for _ in 0..n {
            match self.lines.get(self.position) {
                Some(next) => {
                    line = next.clone();
                    self.position += 1;
                }
                None => return String::new(),
            }
        }
        line
    }

    /// 前进到包含 `pattern` 的行并返回该行；找不到时返回空串
    pub fn find_line(&mut self, pattern: &str) -> String {
        while let Some(line) = self.lines.get(self.position) {
            self.position += 1;
            if line.contains(pattern) {
                return line.clone();
            }
        }
        String::new()
    }

    /// 回到开头
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// 同 `find_line`，找不到时返回 `LogFormat` 错误
    pub fn require(&mut self, pattern: &str) -> Result<String> {
        let line = self.find_line(pattern);
        if line.is_empty() {
            return Err(self.missing(pattern));
        }
        Ok(line)
    }

    /// 构造缺少锚点的错误
    pub fn missing(&self, anchor: &str) -> GedsError {
        GedsError::LogFormat {
            path: self.source.clone(),
            anchor: anchor.trim().to_string(),
        }
    }

    /// 构造数值格式错误
    pub fn malformed(&self, context: &str, line: &str) -> GedsError {
        GedsError::LogValue {
            path: self.source.clone(),
            context: context.to_string(),
            line: line.trim_end().to_string(),
        }
    }
}
