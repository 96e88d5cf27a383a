//! # 子体系总能量输出
//!
//! `--totals` 时，每合并一个文件就把它的总能量追加到 `toten.txt`
//! （CSV 模式下为 `toten.csv`，按行序列化）。
//!
//! 文本格式（每个子体系一段）：
//! ```text
//! # Subsystem 3
//! #                 Field                       SCF                       MP2
//!  0.0000  0.0000  0.0000   -152.040000000000000   -152.550000000000000
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/report.rs` 使用
//! - 使用 `models/run.rs`
//! - 使用 `csv` + `serde` 输出 CSV

use crate::config::{OutputFormat, ReportConfig};
use crate::error::{GedsError, Result};
use crate::models::{ParsedRun, TotalEnergies, TotalLevel};

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// CSV 中的一行
#[derive(Debug, Serialize)]
struct TotalRow<'a> {
    file: &'a str,
    subsystem: u32,
    fx: f64,
    fy: f64,
    fz: f64,
    level: TotalLevel,
    energy: f64,
}

/// 单个文件的文本段落
pub fn format_totals(run: &ParsedRun, totals: &TotalEnergies) -> String {
    let mut out = format!("# File: {}\n", run.record.path.display());
    let Some(baseline) = totals.baseline() else {
        return out;
    };
    let Some(scf) = baseline.get(&TotalLevel::Scf) else {
        return out;
    };

    for subsystem in scf.keys() {
        out.push_str(&format!("# Subsystem {} \n", subsystem));

        let mut header = format!("# {:>21}", "Field");
        for level in baseline.keys() {
            header.push_str(&format!("{:>26}", level.to_string()));
        }
        out.push_str(&header);
        out.push('\n');

        for (field, levels) in &totals.fields {
            let mut row = format!("{:7.4} {:7.4} {:7.4}", field.x(), field.y(), field.z());
            for level in baseline.keys() {
                match levels.get(level).and_then(|m| m.get(subsystem)) {
                    Some(energy) => row.push_str(&format!("{:26.15}", energy)),
                    None => row.push_str(&format!("{:>26}", "-")),
                }
            }
            out.push_str(&row);
            out.push('\n');
        }
    }
    out
}

enum Sink {
    Text(BufWriter<File>),
    Csv(csv::Writer<File>),
}

/// 总能量输出文件
pub struct TotalsWriter {
    path: PathBuf,
    sink: Sink,
}

fn write_error(path: &Path, source: std::io::Error) -> GedsError {
    GedsError::FileWriteError {
        path: path.display().to_string(),
        source,
    }
}

impl TotalsWriter {
    pub fn create(config: &ReportConfig) -> Result<Self> {
        let (name, csv) = match config.format {
            OutputFormat::Csv => ("toten.csv", true),
            _ => ("toten.txt", false),
        };
        let path = config.output_dir.join(name);

        let sink = if csv {
            Sink::Csv(
                csv::WriterBuilder::new()
                    .delimiter(b';')
                    .from_path(&path)?,
            )
        } else {
            let file = File::create(&path).map_err(|e| write_error(&path, e))?;
            Sink::Text(BufWriter::new(file))
        };
        Ok(TotalsWriter { path, sink })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 追加一个文件的总能量
    pub fn append(&mut self, run: &ParsedRun, totals: &TotalEnergies) -> Result<()> {
        match &mut self.sink {
            Sink::Text(writer) => writer
                .write_all(format_totals(run, totals).as_bytes())
                .map_err(|e| write_error(&self.path, e)),
            Sink::Csv(writer) => {
                for (field, levels) in &totals.fields {
                    for (level, energies) in levels {
                        for (subsystem, energy) in energies {
                            writer.serialize(TotalRow {
                                file: run.name(),
                                subsystem: subsystem.0,
                                fx: field.x(),
                                fy: field.y(),
                                fz: field.z(),
                                level: *level,
                                energy: *energy,
                            })?;
                        }
                    }
                }
                Ok(())
            }
        }
    }

    pub fn finish(self) -> Result<()> {
        let path = self.path;
        match self.sink {
            Sink::Text(mut writer) => writer.flush().map_err(|e| write_error(&path, e)),
            Sink::Csv(mut writer) => writer.flush().map_err(|e| write_error(&path, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{fixtures, parse_log_content};
    use std::fs;
    use tempfile::TempDir;

    fn parse_with_totals(log: &str, path: &str) -> ParsedRun {
        let config = ReportConfig {
            collect_totals: true,
            ..Default::default()
        };
        parse_log_content(log, Path::new(path), &config).unwrap()
    }

    fn parsed_with_totals() -> ParsedRun {
        parse_with_totals(&fixtures::single_cluster_log("DIMER", "-0.004839"), "dimer.log")
    }

    fn write_csv(run: &ParsedRun, dir: &TempDir) -> String {
        let config = ReportConfig {
            format: OutputFormat::Csv,
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        };
        let mut writer = TotalsWriter::create(&config).unwrap();
        writer.append(run, run.totals.as_ref().unwrap()).unwrap();
        let path = writer.path().to_path_buf();
        writer.finish().unwrap();
        fs::read_to_string(path).unwrap()
    }

    #[test]
    fn test_text_layout() {
        let run = parsed_with_totals();
        let text = format_totals(&run, run.totals.as_ref().unwrap());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# File: dimer.log");
        assert_eq!(lines[1], "# Subsystem 1 ");
        assert_eq!(lines[2], format!("# {:>21}{:>26}", "Field", "SCF"));
        assert_eq!(
            lines[3],
            format!("{:7.4} {:7.4} {:7.4}{:26.15}", 0.0, 0.0, 0.0, -76.01)
        );
        assert_eq!(text.matches("# Subsystem").count(), 3);
    }

    #[test]
    fn test_csv_rows() {
        let dir = TempDir::new().unwrap();
        let content = write_csv(&parsed_with_totals(), &dir);
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "file;subsystem;fx;fy;fz;level;energy");
        assert_eq!(lines.len(), 4);
        assert!(lines[3].starts_with("dimer;3;"));
        assert!(lines[3].contains(";SCF;"));
    }

    #[test]
    fn test_correlated_text_layout() {
        let run = parse_with_totals(&fixtures::correlated_log("CC"), "cc.log");
        let text = format_totals(&run, run.totals.as_ref().unwrap());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[2],
            format!("# {:>21}{:>26}{:>26}{:>26}", "Field", "SCF", "MP2", "CCSDTQ")
        );
        assert_eq!(
            lines[3],
            format!(
                "{:7.4} {:7.4} {:7.4}{:26.15}{:26.15}{:26.15}",
                0.0,
                0.0,
                0.0,
                -76.01,
                -76.01 + -0.2,
                -76.01 + -0.25
            )
        );
        assert_eq!(lines[7], "# Subsystem 3 ");
        assert!(lines[9].ends_with(&format!("{:26.15}", -152.04 + -0.62)));
    }

    #[test]
    fn test_correlated_csv_rows() {
        let dir = TempDir::new().unwrap();
        let run = parse_with_totals(&fixtures::correlated_log("CC"), "cc.log");
        let content = write_csv(&run, &dir);
        let lines: Vec<&str> = content.lines().collect();

        // 1 个外场 × 3 个级别 × 3 个子体系
        assert_eq!(lines.len(), 10);
        assert!(lines[4].starts_with("cc;1;") && lines[4].contains(";MP2;"));
        assert!(lines[9].starts_with("cc;3;") && lines[9].contains(";CCSDTQ;"));
        assert_eq!(content.matches(";CCSDTQ;").count(), 3);
    }
}
