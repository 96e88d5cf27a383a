//! # 解析器模块
//!
//! 将单个 GAMESS EDS 日志解析为 `ParsedRun`。前导部分决定后续运行哪些提取器：
//!
//! ```text
//! preamble ─┬─ subsystem energies（每个簇，相关计算两遍）
//!           ├─ many-body energies（子体系数 > 3）
//!           ├─ field energies + properties（有限场）
//!           └─ total energies（--totals）
//! ```
//!
//! 任一提取器失败即放弃整个文件，不会产出部分填充的结果。
//!
//! ## 依赖关系
//! - 被 `commands/report.rs` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: cursor, preamble, energy, property, total

pub mod cursor;
pub mod energy;
pub mod preamble;
pub mod property;
pub mod total;

use crate::config::ReportConfig;
use crate::error::Result;
use crate::models::ParsedRun;
use cursor::Cursor;
use std::path::Path;

/// 读取并解析日志文件
pub fn parse_log_file(path: &Path, config: &ReportConfig) -> Result<ParsedRun> {
    let mut cursor = Cursor::from_path(path)?;
    parse_log(&mut cursor, path, config)
}

/// 解析已载入的日志内容（`path` 只用于命名）
#[cfg(test)]
pub fn parse_log_content(content: &str, path: &Path, config: &ReportConfig) -> Result<ParsedRun> {
    let mut cursor = Cursor::new(content, path.display().to_string());
    parse_log(&mut cursor, path, config)
}

fn parse_log(cursor: &mut Cursor, path: &Path, config: &ReportConfig) -> Result<ParsedRun> {
    let record = preamble::read_preamble(cursor, path)?;
    let mut run = ParsedRun::new(record);

    energy::read_subsystem_energies(cursor, &run.record, &mut run.labels, &mut run.energies)?;

    if run.record.many_body {
        energy::read_many_body_energies(cursor, &run.record, &mut run.labels, &mut run.energies)?;
    }

    if run.record.finite_field {
        energy::read_field_energies(cursor, &run.record, &mut run.labels, &mut run.energies)?;
        let properties = property::read_properties(cursor, &mut run.labels, &mut run.warnings)?;
        run.properties = Some(properties);
    }

    if config.collect_totals {
        run.totals = Some(total::read_total_energies(cursor, &run.record)?);
    }

    Ok(run)
}
