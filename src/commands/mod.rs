//! # 命令执行模块
//!
//! 实现报告生成的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `batch/`, `parsers/`, `tables/`, `render/`, `utils/`
//! - 子模块: report, totals

pub mod report;
pub mod totals;

use crate::cli::Cli;
use crate::error::Result;

/// 执行命令
pub fn run(cli: Cli) -> Result<()> {
    report::execute(cli)
}
