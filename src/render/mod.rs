//! # 渲染模块
//!
//! 把对比表写成纯文本、CSV 或 LaTeX。每张表有两种布局：
//!
//! - 记录布局（`energies.*`, `properties.*`）：簇/文件/外场为行，能量项为列
//! - 能量项布局（`tenergies.*`, `troperties.*`）：能量项为行
//!
//! 数值在这里才按选定单位换算；`--relative` 时改为相对同一行首/末值的百分比。
//! 无法解析的单元格（占位符等）按标签样式右对齐输出。
//!
//! ## 依赖关系
//! - 被 `commands/report.rs` 使用
//! - 使用 `tables/`, `units.rs`, `config.rs`
//! - 使用 `csv` crate 输出 CSV
//! - 子模块: tex

pub mod tex;

use crate::config::{OutputFormat, RelativeMode, ReportConfig};
use crate::error::Result;
use crate::models::{Cell, ComparisonTable, TermAxis, ValueKind};
use crate::tables::property::{INTERACTION_SECTION, TOTALS_SECTION};
use crate::tables::Report;
use crate::units::{round_to, UnitSpec, PROPERTY_MIN_WIDTH};

/// 表的输出布局
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// 每条记录（簇、文件或外场）一行
    Records,
    /// 每个能量/性质分量一行
    Terms,
}

/// 一个输出文件
#[derive(Debug, Clone)]
pub struct RenderedFile {
    pub stem: &'static str,
    pub content: String,
}

/// 一行中的单元
#[derive(Debug, Clone, PartialEq)]
enum Field {
    /// 首列（左对齐）
    Title(String),
    /// 表头或非数值单元格（右对齐）
    Label(String),
    /// 已格式化的数值（右对齐，比标签宽 2）
    Value(String),
}

// ─────────────────────────────────────────────────────────────
// 输出目标
// ─────────────────────────────────────────────────────────────

trait TableSink {
    fn comment(&mut self, text: &str) -> Result<()>;
    fn blank(&mut self) -> Result<()>;
    /// 原样输出的行（CSV 忽略）
    fn raw(&mut self, line: &str);
    fn row(&mut self, fields: &[Field], width: usize, note: Option<&str>) -> Result<()>;
    fn finish(self: Box<Self>) -> Result<String>;
}

/// 纯文本与 LaTeX
struct TextSink {
    tex: bool,
    title_width: usize,
    out: String,
}

impl TextSink {
    fn comment_char(&self) -> char {
        if self.tex {
            '%'
        } else {
            '#'
        }
    }

    fn cell(&self, field: &Field, width: usize) -> String {
        let tw = self.title_width;
        match (field, self.tex) {
            (Field::Title(s), false) => format!("\"{:<tw$}\"", s),
            (Field::Title(s), true) => format!("{:<tw$}", s),
            (Field::Label(s), false) => format!("\"{:>width$}\"", s),
            (Field::Label(s), true) => format!(" {:>width$} ", s),
            (Field::Value(s), _) => format!("{:>w$}", s, w = width + 2),
        }
    }
}

impl TableSink for TextSink {
    fn comment(&mut self, text: &str) -> Result<()> {
        let c = self.comment_char();
        if text.is_empty() {
            self.out.push_str(&format!("{}\n", c));
        } else {
            self.out.push_str(&format!("{} {}\n", c, text));
        }
        Ok(())
    }

    fn blank(&mut self) -> Result<()> {
        self.out.push('\n');
        Ok(())
    }

    fn raw(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn row(&mut self, fields: &[Field], width: usize, note: Option<&str>) -> Result<()> {
        let separator = if self.tex { " &" } else { "; " };
        let cells: Vec<String> = fields.iter().map(|f| self.cell(f, width)).collect();
        let mut line = cells.join(separator);
        if self.tex {
            line.push(' ');
            line.push_str(tex::ROW_END);
        }
        if let Some(note) = note {
            if self.tex {
                line.push_str(&format!(" % {}", note));
            } else {
                line.push_str(&format!("; # {}", note));
            }
        }
        self.out.push_str(&line);
        self.out.push('\n');
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<String> {
        Ok(self.out)
    }
}

/// 分号分隔的 CSV（每条记录单独写出，表间空行直接追加）
struct CsvSink {
    out: Vec<u8>,
}

impl CsvSink {
    fn write(&mut self, record: &[String]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .from_writer(Vec::new());
        writer.write_record(record)?;
        let bytes = writer
            .into_inner()
            .map_err(|e| csv::Error::from(e.into_error()))?;
        self.out.extend(bytes);
        Ok(())
    }
}

impl TableSink for CsvSink {
    fn comment(&mut self, text: &str) -> Result<()> {
        let line = if text.is_empty() {
            "#".to_string()
        } else {
            format!("# {}", text)
        };
        self.write(&[line])
    }

    fn blank(&mut self) -> Result<()> {
        self.out.push(b'\n');
        Ok(())
    }

    fn raw(&mut self, _line: &str) {}

    fn row(&mut self, fields: &[Field], _width: usize, note: Option<&str>) -> Result<()> {
        let mut record: Vec<String> = fields
            .iter()
            .map(|f| match f {
                Field::Title(s) | Field::Label(s) | Field::Value(s) => s.trim().to_string(),
            })
            .collect();
        if let Some(note) = note {
            record.push(format!("# {}", note));
        }
        self.write(&record)
    }

    fn finish(self: Box<Self>) -> Result<String> {
        Ok(String::from_utf8_lossy(&self.out).into_owned())
    }
}

// ─────────────────────────────────────────────────────────────
// 渲染器
// ─────────────────────────────────────────────────────────────

/// Python `str.center` 的居中规则（余数的分配方式与其一致）
pub fn center(text: &str, width: usize, fill: char) -> String {
    let len = text.chars().count();
    if width <= len {
        return text.to_string();
    }
    let margin = width - len;
    let left = margin / 2 + (margin & width & 1);
    let right = margin - left;
    format!(
        "{}{}{}",
        fill.to_string().repeat(left),
        text,
        fill.to_string().repeat(right)
    )
}

fn text_len(s: &str) -> usize {
    s.chars().count()
}

/// 表中作为"记录"的轴：标签与附注
fn records(table: &ComparisonTable) -> Vec<(&str, Option<&str>)> {
    match table.term_axis {
        TermAxis::Rows => table
            .columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), table.column_notes.get(i).map(String::as_str)))
            .collect(),
        TermAxis::Columns => table.rows.iter().map(|r| (r.label.as_str(), None)).collect(),
    }
}

/// 表中作为"分量"的轴
fn terms(table: &ComparisonTable) -> Vec<&str> {
    match table.term_axis {
        TermAxis::Rows => table.rows.iter().map(|r| r.label.as_str()).collect(),
        TermAxis::Columns => table.columns.iter().map(String::as_str).collect(),
    }
}

/// (记录, 分量) → 表中的 (行, 列)
fn position(table: &ComparisonTable, record: usize, term: usize) -> (usize, usize) {
    match table.term_axis {
        TermAxis::Rows => (term, record),
        TermAxis::Columns => (record, term),
    }
}

pub struct Renderer<'a> {
    config: &'a ReportConfig,
    title_width: usize,
}

impl<'a> Renderer<'a> {
    pub fn new(config: &'a ReportConfig, title_width: usize) -> Self {
        Renderer {
            config,
            title_width,
        }
    }

    fn comment_char(&self) -> &'static str {
        match self.config.format {
            OutputFormat::Tex => "%",
            _ => "#",
        }
    }

    fn sink(&self) -> Box<dyn TableSink> {
        match self.config.format {
            OutputFormat::Csv => Box::new(CsvSink { out: Vec::new() }),
            format => Box::new(TextSink {
                tex: format == OutputFormat::Tex,
                title_width: self.title_width,
                out: String::new(),
            }),
        }
    }

    fn unit(&self, kind: ValueKind) -> UnitSpec {
        match kind {
            ValueKind::Energy => self.config.energy_unit.spec(),
            ValueKind::Property(quantity) => self.config.property_unit.spec(quantity.group()),
        }
    }

    fn term_label(&self, term: &str) -> String {
        if self.config.format == OutputFormat::Tex {
            tex::tex_label(term)
        } else {
            term.to_string()
        }
    }

    /// 一组表共用的最小列宽：单位下限与分量标签长度
    fn base_width(&self, tables: &[ComparisonTable], min_width: usize) -> usize {
        tables
            .iter()
            .flat_map(|t| terms(t))
            .map(|term| {
                let plain = text_len(term);
                if self.config.format == OutputFormat::Tex {
                    plain.max(text_len(&tex::tex_label(term)) + 2)
                } else {
                    plain
                }
            })
            .fold(min_width, usize::max)
    }

    fn reference(&self, table: &ComparisonTable, row: usize) -> Option<f64> {
        let cells = &table.rows.get(row)?.cells;
        let cell = match self.config.relative? {
            RelativeMode::First => cells.first(),
            RelativeMode::Last => cells.last(),
        }?;
        cell.number().filter(|r| *r != 0.0)
    }

    fn format_cell(&self, table: &ComparisonTable, row: usize, column: usize) -> Field {
        let cell = table.cell(row, column).unwrap_or(&Cell::Missing);
        let Some(value) = cell.number() else {
            return Field::Label(cell.text());
        };
        if let Some(reference) = self.reference(table, row) {
            return Field::Value(format!("{:.1}", round_to(100.0 * value / reference, 1)));
        }
        Field::Value(self.unit(table.kind).format(value))
    }

    fn write_table(
        &self,
        sink: &mut dyn TableSink,
        table: &ComparisonTable,
        layout: Layout,
        base_width: usize,
    ) -> Result<()> {
        let c = self.comment_char();
        let records = records(table);
        let terms = terms(table);
        let tex = self.config.format == OutputFormat::Tex;

        let (header, width) = match layout {
            Layout::Records => (terms.clone(), base_width),
            Layout::Terms => {
                let labels: Vec<&str> = records.iter().map(|(r, _)| *r).collect();
                let width = labels.iter().map(|l| text_len(l)).fold(base_width, usize::max);
                (labels, width)
            }
        };

        match &table.description {
            Some(description) => {
                sink.comment(description)?;
                sink.comment("")?;
            }
            None => {
                sink.comment(&table.caption)?;
                sink.blank()?;
            }
        }

        if self.config.format == OutputFormat::Txt && !table.groups.is_empty() {
            sink.raw(&self.banner(table, width));
        }
        if tex {
            sink.raw(&tex::tabular_begin(header.len()));
        }

        let mut fields = vec![Field::Title(c.to_string())];
        fields.extend(header.iter().map(|h| Field::Label(h.to_string())));
        sink.row(&fields, width, None)?;

        if tex && layout == Layout::Records {
            let mut fields = vec![Field::Title(c.to_string())];
            fields.extend(header.iter().map(|h| Field::Label(tex::tex_label(h))));
            sink.row(&fields, width, None)?;
        }

        match layout {
            Layout::Records => {
                for (r, (record, note)) in records.iter().enumerate() {
                    let mut fields = vec![Field::Title(record.to_string())];
                    for t in 0..terms.len() {
                        let (row, column) = position(table, r, t);
                        fields.push(self.format_cell(table, row, column));
                    }
                    sink.row(&fields, width, *note)?;
                }
            }
            Layout::Terms => {
                for (t, term) in terms.iter().enumerate() {
                    let mut fields = vec![Field::Title(self.term_label(term))];
                    for r in 0..records.len() {
                        let (row, column) = position(table, r, t);
                        fields.push(self.format_cell(table, row, column));
                    }
                    sink.row(&fields, width, tex.then_some(*term))?;
                }
            }
        }

        if tex {
            sink.raw(tex::TABULAR_END);
        }
        sink.blank()
    }

    /// 纯文本性质表的分组标题行
    fn banner(&self, table: &ComparisonTable, width: usize) -> String {
        let mut line = format!(
            "\"{}{}|",
            self.comment_char(),
            center("Property", self.title_width, '_')
        );
        for group in &table.groups {
            let span = (group.span * (width + 4)).saturating_sub(1);
            line.push_str(&center(&group.title, span, '_'));
            line.push('|');
        }
        line.push('"');
        line
    }

    fn render_energies(&self, tables: &[ComparisonTable], layout: Layout) -> Result<String> {
        let base = self.base_width(tables, self.config.energy_unit.spec().min_width);
        let mut sink = self.sink();
        for table in tables {
            self.write_table(sink.as_mut(), table, layout, base)?;
        }
        sink.finish()
    }

    fn render_properties(&self, report: &Report, layout: Layout) -> Result<String> {
        let all: Vec<ComparisonTable> = report
            .property_totals
            .iter()
            .chain(report.property_interaction.iter())
            .cloned()
            .collect();
        let base = self.base_width(&all, PROPERTY_MIN_WIDTH);

        let mut sink = self.sink();
        for (section, tables) in [
            (TOTALS_SECTION, &report.property_totals),
            (INTERACTION_SECTION, &report.property_interaction),
        ] {
            sink.comment(section)?;
            sink.comment("")?;
            for table in tables {
                self.write_table(sink.as_mut(), table, layout, base)?;
            }
        }
        sink.finish()
    }

    /// 渲染全部输出文件（不写盘）
    pub fn render(&self, report: &Report) -> Result<Vec<RenderedFile>> {
        let mut files = vec![
            RenderedFile {
                stem: "energies",
                content: self.render_energies(&report.energy, Layout::Records)?,
            },
            RenderedFile {
                stem: "tenergies",
                content: self.render_energies(&report.energy, Layout::Terms)?,
            },
        ];
        if report.has_properties() {
            files.push(RenderedFile {
                stem: "properties",
                content: self.render_properties(report, Layout::Records)?,
            });
            files.push(RenderedFile {
                stem: "troperties",
                content: self.render_properties(report, Layout::Terms)?,
            });
        }
        Ok(files)
    }
}
