//! # 相互作用能对比表
//!
//! - 单文件表：能量项 × 簇编号
//! - 跨文件表：每个簇一张，能量项 × 文件（仅当各文件簇编号集合完全相同）
//! - 多体表：多体能量项 × 文件（无外场）
//! - 外场表：多体/外场能量项 × (文件, 外场)
//!
//! 缺失的组合填占位符。
//!
//! ## 依赖关系
//! - 被 `tables/mod.rs` 使用
//! - 使用 `models/`, `tables/ordering.rs`

use super::ordering::sort_fields;
use crate::models::energy::FieldEnergies;
use crate::models::{Cell, ClusterId, ComparisonTable, FieldVector, ParsedRun, TermAxis, TermLabel, ValueKind};
use std::collections::BTreeSet;

pub const MANY_BODY_CAPTION: &str = "Many-body energy terms for selected systems";
pub const FIELD_CAPTION: &str = "Many-body energy terms for selected fields";

fn cell(value: Option<&String>) -> Cell {
    value.map_or(Cell::Missing, |v| Cell::Numeral(v.clone()))
}

fn cluster_cell(energies: Option<&FieldEnergies>, term: &TermLabel, cluster: ClusterId) -> Cell {
    cell(energies.and_then(|e| e.cluster_value(term, cluster)))
}

fn many_body_cell(energies: Option<&FieldEnergies>, term: &TermLabel) -> Cell {
    cell(energies.and_then(|e| e.many_body_value(term)))
}

/// 单个文件的子体系能量表
pub fn run_table(run: &ParsedRun, terms: &[TermLabel]) -> ComparisonTable {
    let record = &run.record;
    let caption = format!("File: {} Run Title: {}", record.path.display(), record.title);
    let mut table = ComparisonTable::new(caption, ValueKind::Energy, TermAxis::Rows);

    let baseline = run.energies.baseline();
    let clusters: Vec<ClusterId> = baseline.cluster_ids().into_iter().collect();
    table.columns = clusters.iter().map(ClusterId::to_string).collect();

    for term in terms {
        let cells = clusters
            .iter()
            .map(|c| cluster_cell(Some(baseline), term, *c))
            .collect();
        table.push_row(term.subsystem_display(), cells);
    }
    table
}

/// 各文件的簇编号集合是否完全一致（至少两个文件）
pub fn clusters_comparable(runs: &[&ParsedRun]) -> bool {
    if runs.len() < 2 {
        return false;
    }
    let first = runs[0].energies.baseline().cluster_ids();
    runs[1..]
        .iter()
        .all(|run| run.energies.baseline().cluster_ids() == first)
}

/// 跨文件的簇对比表；簇编号集合不一致时返回空
pub fn cluster_tables(runs: &[&ParsedRun], terms: &[TermLabel]) -> Vec<ComparisonTable> {
    if !clusters_comparable(runs) {
        return Vec::new();
    }

    let clusters: BTreeSet<ClusterId> = runs[0].energies.baseline().cluster_ids();
    clusters
        .into_iter()
        .map(|cluster| {
            let mut table = ComparisonTable::new(
                format!("Subsystem No: {}", cluster),
                ValueKind::Energy,
                TermAxis::Rows,
            );
            table.columns = runs.iter().map(|r| r.name().to_string()).collect();
            for term in terms {
                let cells = runs
                    .iter()
                    .map(|r| cluster_cell(Some(r.energies.baseline()), term, cluster))
                    .collect();
                table.push_row(term.subsystem_display(), cells);
            }
            table
        })
        .collect()
}

/// 无外场的多体能量表
pub fn many_body_table(runs: &[&ParsedRun], terms: &[TermLabel]) -> ComparisonTable {
    let mut table = ComparisonTable::new(MANY_BODY_CAPTION, ValueKind::Energy, TermAxis::Rows);
    table.columns = runs.iter().map(|r| r.name().to_string()).collect();
    for term in terms {
        let cells = runs
            .iter()
            .map(|r| many_body_cell(r.energies.get(&FieldVector::ZERO), term))
            .collect();
        table.push_row(term.many_body_display(), cells);
    }
    table
}

/// 外场能量表：列为 (文件, 外场)，外场按 Y → Z → X 排序
pub fn field_table(runs: &[&ParsedRun], terms: &[TermLabel]) -> ComparisonTable {
    let mut table = ComparisonTable::new(FIELD_CAPTION, ValueKind::Energy, TermAxis::Rows);

    let columns: Vec<(&ParsedRun, FieldVector)> = runs
        .iter()
        .flat_map(|run| {
            let mut fields = run.energies.fields();
            sort_fields(&mut fields);
            fields.into_iter().map(move |field| (*run, field))
        })
        .collect();

    table.columns = columns.iter().map(|(_, field)| field.to_string()).collect();
    table.column_notes = columns.iter().map(|(run, _)| run.name().to_string()).collect();

    for term in terms {
        let cells = columns
            .iter()
            .map(|(run, field)| many_body_cell(run.energies.get(field), term))
            .collect();
        table.push_row(term.many_body_display(), cells);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReportConfig;
    use crate::parsers::{fixtures, parse_log_content};
    use std::path::Path;

    fn parse(name: &str, log: &str) -> ParsedRun {
        parse_log_content(log, Path::new(name), &ReportConfig::default()).unwrap()
    }

    fn terms(names: &[&str]) -> Vec<TermLabel> {
        names.iter().map(|n| TermLabel::new(*n)).collect()
    }

    #[test]
    fn test_run_table_fills_placeholders() {
        let run = parse(
            "a.log",
            &fixtures::cluster_log(&[
                (1, &[("DE(HF)", "1.0"), ("DE(EL,HF)", "0.5")][..]),
                (2, &[("DE(HF)", "2.0")][..]),
            ]),
        );
        let table = run_table(&run, &terms(&["DE(HF)", "DE(EL,HF)"]));

        assert_eq!(table.caption, "File: a.log Run Title: CUSTOM");
        assert_eq!(table.columns, vec!["1", "2"]);
        assert_eq!(table.row("DE(HF)").unwrap().cells[1], Cell::Numeral("2.0".into()));
        assert_eq!(table.row("DE(EL,HF)").unwrap().cells[1], Cell::Missing);
    }

    #[test]
    fn test_cross_file_gating() {
        let one_two = fixtures::cluster_log(&[(1, &[("DE(HF)", "1.0")][..]), (2, &[("DE(HF)", "2.0")][..])]);
        let one_three = fixtures::cluster_log(&[(1, &[("DE(HF)", "1.0")][..]), (3, &[("DE(HF)", "3.0")][..])]);

        let a = parse("a.log", &one_two);
        let b = parse("b.log", &one_two);
        let c = parse("c.log", &one_three);

        assert!(clusters_comparable(&[&a, &b]));
        assert!(!clusters_comparable(&[&a, &b, &c]));
        assert!(!clusters_comparable(&[&a]));
        assert!(cluster_tables(&[&a, &b, &c], &terms(&["DE(HF)"])).is_empty());

        let tables = cluster_tables(&[&a, &b], &terms(&["DE(HF)"]));
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[1].caption, "Subsystem No: 2");
        assert_eq!(tables[1].columns, vec!["a", "b"]);
    }

    #[test]
    fn test_field_columns_follow_field_order() {
        let mut run = parse("ff.log", &fixtures::single_cluster_log("FF", "0.1"));
        let label = TermLabel::new("E(MNB)");
        for (field, value) in [
            (FieldVector::new(-0.001, 0.0, 0.0), "-1"),
            (FieldVector::new(0.001, 0.0, 0.0), "1"),
        ] {
            run.energies
                .entry(field)
                .many_body
                .insert(label.clone(), value.to_string());
        }

        let table = field_table(&[&run], &[label]);
        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[0], FieldVector::ZERO.to_string());
        assert_eq!(table.columns[1], FieldVector::new(0.001, 0.0, 0.0).to_string());
        assert_eq!(table.column_notes, vec!["ff", "ff", "ff"]);
        assert_eq!(
            table.rows[0].cells,
            vec![Cell::Missing, Cell::Numeral("1".into()), Cell::Numeral("-1".into())]
        );
        assert_eq!(table.rows[0].label, "E");
    }
}
