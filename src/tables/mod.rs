//! # 汇总模块
//!
//! 把所有成功解析的文件合并成按规范标签对齐的对比表。
//!
//! ```text
//! ParsedRun × N ──sort──▶ energy::run_table      (每个文件)
//!                         energy::cluster_tables (簇编号一致时)
//!                         energy::many_body_table
//!                         energy::field_table
//!                         property::property_tables
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/report.rs` 使用
//! - 使用 `models/`
//! - 子模块: energy, ordering, property

pub mod energy;
pub mod ordering;
pub mod property;

use crate::config::SortMode;
use crate::models::{ComparisonTable, LabelRegistry, ParsedRun};

/// 首列最小宽度
pub const MIN_TITLE_WIDTH: usize = 25;

/// 一次批处理的全部对比表
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// 按输出顺序排列的能量表
    pub energy: Vec<ComparisonTable>,
    /// Total/Excess/Sum 性质表
    pub property_totals: Vec<ComparisonTable>,
    /// Interaction 性质表
    pub property_interaction: Vec<ComparisonTable>,
    /// 是否生成了跨文件簇对比表
    pub compared: bool,
    /// 首列宽度
    pub title_width: usize,
}

impl Report {
    pub fn has_properties(&self) -> bool {
        !self.property_totals.is_empty()
    }
}

/// 按文件排序后构建全部对比表
pub fn build_report(runs: &[ParsedRun], registry: &LabelRegistry, sort_mode: SortMode) -> Report {
    let mut ordered: Vec<&ParsedRun> = runs.iter().collect();
    ordering::sort_runs(&mut ordered, sort_mode);

    let labels = registry.labels();
    let subsystem = labels.subsystem.as_slice();
    let many_body = labels.many_body.as_slice();

    let mut report = Report {
        title_width: ordered
            .iter()
            .map(|r| r.name().chars().count() + 1)
            .fold(MIN_TITLE_WIDTH, usize::max),
        ..Default::default()
    };

    report
        .energy
        .extend(ordered.iter().map(|run| energy::run_table(run, subsystem)));

    let clusters = energy::cluster_tables(&ordered, subsystem);
    report.compared = !clusters.is_empty();
    report.energy.extend(clusters);

    if ordered.iter().any(|r| r.record.many_body) {
        report.energy.push(energy::many_body_table(&ordered, many_body));
    }

    let finite_field: Vec<&ParsedRun> = ordered
        .iter()
        .copied()
        .filter(|r| r.record.finite_field)
        .collect();
    if !finite_field.is_empty() {
        report.energy.push(energy::field_table(&ordered, many_body));
        let (totals, interaction) = property::property_tables(&finite_field, labels);
        report.property_totals = totals;
        report.property_interaction = interaction;
    }

    report
}
