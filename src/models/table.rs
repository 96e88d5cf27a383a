//! # 对比表
//!
//! 汇总阶段产出、渲染阶段消费的二维表：表头行、标签列与单元格矩阵。
//! 单元格保存未换算的原子单位数值，缺失组合用占位符表示。
//!
//! ## 依赖关系
//! - 被 `tables/`, `render/` 使用
//! - 使用 `models/property.rs`

use super::property::PropertyQuantity;

/// 表中数值的物理含义（决定单位换算与格式）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Energy,
    Property(PropertyQuantity),
}

/// 分量标签所在的轴
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermAxis {
    Rows,
    Columns,
}

/// 单元格
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// 日志中的原始数值文本
    Numeral(String),
    /// 已解析的数值
    Value(f64),
    /// 缺失组合
    Missing,
}

impl Cell {
    /// 占位符文本
    pub const PLACEHOLDER: &'static str = "-";

    /// 数值（原始文本无法解析时为 None）
    pub fn number(&self) -> Option<f64> {
        match self {
            Cell::Numeral(text) => crate::models::field::parse_fortran_float(text.trim()),
            Cell::Value(v) => Some(*v),
            Cell::Missing => None,
        }
    }

    /// 非数值单元格按标签样式输出时的文本
    pub fn text(&self) -> String {
        match self {
            Cell::Numeral(text) => text.trim().to_string(),
            Cell::Value(v) => v.to_string(),
            Cell::Missing => Cell::PLACEHOLDER.to_string(),
        }
    }
}

/// 表中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub label: String,
    pub cells: Vec<Cell>,
}

/// 跨越若干列的分组标题
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnGroup {
    pub title: String,
    pub span: usize,
}

/// 对比表
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonTable {
    /// 表前注释
    pub caption: String,
    /// 可选的物理量说明（性质表）
    pub description: Option<String>,
    pub kind: ValueKind,
    pub term_axis: TermAxis,
    pub columns: Vec<String>,
    /// 与列一一对应的附注（如外场列所属文件），可为空
    pub column_notes: Vec<String>,
    /// 列分组标题，可为空
    pub groups: Vec<ColumnGroup>,
    pub rows: Vec<TableRow>,
}

impl ComparisonTable {
    pub fn new(caption: impl Into<String>, kind: ValueKind, term_axis: TermAxis) -> Self {
        ComparisonTable {
            caption: caption.into(),
            description: None,
            kind,
            term_axis,
            columns: Vec::new(),
            column_notes: Vec::new(),
            groups: Vec::new(),
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, label: impl Into<String>, cells: Vec<Cell>) {
        self.rows.push(TableRow {
            label: label.into(),
            cells,
        });
    }

    #[cfg(test)]
    pub fn row(&self, label: &str) -> Option<&TableRow> {
        self.rows.iter().find(|r| r.label == label)
    }

    pub fn cell(&self, row: usize, column: usize) -> Option<&Cell> {
        self.rows.get(row).and_then(|r| r.cells.get(column))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_number() {
        assert_eq!(Cell::Numeral(" -0.25 ".into()).number(), Some(-0.25));
        assert_eq!(Cell::Numeral("********".into()).number(), None);
        assert_eq!(Cell::Value(1.5).number(), Some(1.5));
        assert_eq!(Cell::Missing.number(), None);
        assert_eq!(Cell::Missing.text(), "-");
    }

    #[test]
    fn test_row_lookup() {
        let mut table = ComparisonTable::new("t", ValueKind::Energy, TermAxis::Rows);
        table.columns = vec!["a".into()];
        table.push_row("DE(HF)", vec![Cell::Numeral("1.0".into())]);
        assert!(table.row("DE(HF)").is_some());
        assert_eq!(table.cell(0, 0), Some(&Cell::Numeral("1.0".into())));
    }
}
