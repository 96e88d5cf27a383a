//! # 电性质对比表
//!
//! 每个物理量两张表，行为有限场文件：
//! - Total + Excess + Sum of Interaction 三组列
//! - Interaction 一组列
//!
//! ## 依赖关系
//! - 被 `tables/mod.rs` 使用
//! - 使用 `models/`

use crate::models::table::ColumnGroup;
use crate::models::{
    Cell, ComparisonTable, ParsedRun, PropertyCategory, PropertyQuantity, RunLabels, TermAxis,
    TermLabel, ValueKind,
};

pub const TOTALS_SECTION: &str = "Total, Excess and Sum of Interaction Induced Properties";
pub const INTERACTION_SECTION: &str = "Interaction Induced Properties";

/// 列分组：类别、分组标题与该类别的规范标签
fn column_groups(labels: &RunLabels, interaction: bool) -> Vec<(PropertyCategory, &'static str, &[TermLabel])> {
    if interaction {
        vec![(
            PropertyCategory::Interaction,
            "Finite Field Estimates of Interaction Induced Properties",
            labels.interaction_property.as_slice(),
        )]
    } else {
        vec![
            (PropertyCategory::Total, "Total Properties", labels.total_property.as_slice()),
            (PropertyCategory::Excess, "Excess Properties", labels.excess_property.as_slice()),
            (
                PropertyCategory::SumInteraction,
                "Sum of Interaction Properties",
                labels.sum_property.as_slice(),
            ),
        ]
    }
}

fn quantity_table(
    runs: &[&ParsedRun],
    labels: &RunLabels,
    quantity: PropertyQuantity,
    interaction: bool,
) -> ComparisonTable {
    let caption = if interaction { INTERACTION_SECTION } else { TOTALS_SECTION };
    let mut table = ComparisonTable::new(caption, ValueKind::Property(quantity), TermAxis::Columns);
    table.description = Some(quantity.description().to_string());

    let groups = column_groups(labels, interaction);
    for (_, title, terms) in &groups {
        table.groups.push(ColumnGroup {
            title: title.to_string(),
            span: terms.len(),
        });
        table
            .columns
            .extend(terms.iter().map(|t| t.as_str().to_string()));
    }

    for run in runs {
        let Some(properties) = &run.properties else {
            continue;
        };
        let cells = groups
            .iter()
            .flat_map(|(category, _, terms)| {
                terms.iter().map(move |term| {
                    properties
                        .value(*category, term, quantity)
                        .map_or(Cell::Missing, Cell::Value)
                })
            })
            .collect();
        table.push_row(run.name(), cells);
    }
    table
}

/// 各物理量的 (Total/Excess/Sum 表, Interaction 表)
pub fn property_tables(
    runs: &[&ParsedRun],
    labels: &RunLabels,
) -> (Vec<ComparisonTable>, Vec<ComparisonTable>) {
    let totals = PropertyQuantity::ALL
        .iter()
        .map(|q| quantity_table(runs, labels, *q, false))
        .collect();
    let interaction = PropertyQuantity::ALL
        .iter()
        .map(|q| quantity_table(runs, labels, *q, true))
        .collect();
    (totals, interaction)
}
