//! # 报告生成
//!
//! 完整流程：
//! 1. 收集日志文件（文件/目录，glob 模式）
//! 2. 并行解析（结果保持输入顺序）
//! 3. 按输入顺序合并：打印警告、合并规范标签集、追加总能量
//! 4. 构建对比表并渲染到输出目录
//! 5. 终端汇总表
//!
//! 单个文件解析失败只跳过该文件；全部失败时返回 `NoRuns`。
//!
//! ## 依赖关系
//! - 使用 `cli/` 定义的参数
//! - 使用 `batch/`, `parsers/`, `tables/`, `render/`
//! - 使用 `utils/output.rs` 与 `tabled` 输出终端信息

use super::totals::TotalsWriter;
use crate::batch::{BatchResult, BatchRunner, FileCollector};
use crate::cli::Cli;
use crate::config::ReportConfig;
use crate::error::{GedsError, Result};
use crate::models::{LabelRegistry, ParsedRun};
use crate::parsers;
use crate::render::Renderer;
use crate::tables;
use crate::utils::output;

use std::fs;
use std::path::PathBuf;
use tabled::{Table, Tabled};

/// 终端汇总表的一行
#[derive(Debug, Clone, Tabled)]
struct RunRow {
    #[tabled(rename = "File")]
    file: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Subsystems")]
    subsystems: usize,
    #[tabled(rename = "Method")]
    method: String,
    #[tabled(rename = "Many-body")]
    many_body: String,
    #[tabled(rename = "Fields")]
    fields: usize,
    #[tabled(rename = "Warnings")]
    warnings: usize,
}

impl From<&ParsedRun> for RunRow {
    fn from(run: &ParsedRun) -> Self {
        let yes_no = |flag: bool| if flag { "yes" } else { "no" }.to_string();
        RunRow {
            file: run.name().to_string(),
            title: run.record.title.clone(),
            subsystems: run.record.subsystems,
            method: run.record.correlation.to_string(),
            many_body: yes_no(run.record.many_body),
            fields: run.energies.fields().len(),
            warnings: run.warnings.len(),
        }
    }
}

/// 展开命令行输入
fn collect_files(cli: &Cli) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for input in &cli.logs {
        let collector = FileCollector::new(input.clone())
            .with_pattern(&cli.pattern)?
            .recursive(cli.recursive);
        let found = collector.collect();
        if found.is_empty() {
            output::print_warning(&format!(
                "No files matching '{}' in '{}'",
                cli.pattern,
                input.display()
            ));
        }
        files.extend(found);
    }

    if files.is_empty() {
        return Err(GedsError::NoFilesFound {
            pattern: cli.pattern.clone(),
        });
    }
    Ok(files)
}

/// 打印单个文件的解析细节（`--debug`）
fn print_run_details(run: &ParsedRun) {
    let record = &run.record;
    output::print_debug(&format!(
        "{}: title '{}', {} subsystems / {} monomers, {}, many-body {}, finite field {}",
        record.path.display(),
        record.title,
        record.subsystems,
        record.monomers,
        record.correlation,
        record.many_body,
        record.finite_field
    ));
    output::print_debug(&format!(
        "{}: {} subsystem terms, {} many-body terms, {} fields",
        record.path.display(),
        run.labels.subsystem.len(),
        run.labels.many_body.len(),
        run.energies.fields().len()
    ));
}

/// 按输入顺序合并解析结果
fn merge_runs(
    files: &[PathBuf],
    results: Vec<Result<ParsedRun>>,
    config: &ReportConfig,
) -> Result<(Vec<ParsedRun>, LabelRegistry, BatchResult)> {
    let mut registry = LabelRegistry::new();
    let mut runs = Vec::new();
    let mut summary = BatchResult::default();
    let mut totals = if config.collect_totals {
        Some(TotalsWriter::create(config)?)
    } else {
        None
    };

    for (path, result) in files.iter().zip(results) {
        match result {
            Ok(run) => {
                summary.record(path, None);
                if config.debug {
                    print_run_details(&run);
                }
                for warning in &run.warnings {
                    output::print_warning(warning);
                }
                registry.merge(&run.labels);
                if let (Some(writer), Some(run_totals)) = (totals.as_mut(), run.totals.as_ref()) {
                    writer.append(&run, run_totals)?;
                }
                runs.push(run);
            }
            Err(err) if err.is_log_error() => {
                summary.record(path, Some(&err));
                output::print_skip(&format!("Skipping '{}'", path.display()));
            }
            Err(err) => return Err(err),
        }
    }

    if let Some(writer) = totals {
        let path = writer.path().to_path_buf();
        writer.finish()?;
        output::print_success(&format!("Total energies saved to '{}'", path.display()));
    }

    Ok((runs, registry, summary))
}

/// 执行报告生成
pub fn execute(cli: Cli) -> Result<()> {
    let config = cli.config();
    output::print_header("GAMESS EDS Report");

    let files = collect_files(&cli)?;
    output::print_info(&format!("Found {} log file(s)", files.len()));

    fs::create_dir_all(&config.output_dir).map_err(|e| GedsError::FileWriteError {
        path: config.output_dir.display().to_string(),
        source: e,
    })?;

    let runner = BatchRunner::new(config.jobs);
    if config.debug {
        output::print_debug(&format!("Parsing with {} thread(s)", runner.jobs()));
    }
    let results = runner.run(&files, |path| parsers::parse_log_file(path, &config));

    let (runs, registry, summary) = merge_runs(&files, results, &config)?;
    if runs.is_empty() {
        return Err(GedsError::NoRuns {
            count: summary.total(),
        });
    }

    let report = tables::build_report(&runs, &registry, config.sort_mode);
    if runs.len() > 1 && !report.compared {
        output::print_info("Cluster ids differ between files, per-cluster comparison skipped");
    }

    let renderer = Renderer::new(&config, report.title_width);
    for rendered in renderer.render(&report)? {
        let path = config.output_path(rendered.stem);
        fs::write(&path, rendered.content).map_err(|e| GedsError::FileWriteError {
            path: path.display().to_string(),
            source: e,
        })?;
        output::print_success(&format!("Saved '{}'", path.display()));
    }

    output::print_header("Parsed Runs");
    let rows: Vec<RunRow> = runs.iter().map(RunRow::from).collect();
    println!("{}", Table::new(&rows));

    if !summary.failures.is_empty() {
        output::print_header("Skipped Files");
        for (path, reason) in &summary.failures {
            output::print_error(&format!("{}: {}", path, reason));
        }
    }

    output::print_separator();
    output::print_done(&format!(
        "{} parsed, {} failed (energy unit: {}, property unit: {})",
        summary.success, summary.failed, config.energy_unit, config.property_unit
    ));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::fixtures;
    use clap::Parser;
    use tempfile::TempDir;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_end_to_end_two_logs() {
        let dir = TempDir::new().unwrap();
        let logs = dir.path().join("logs");
        let out = dir.path().join("out");
        fs::create_dir(&logs).unwrap();
        fs::write(logs.join("a.log"), fixtures::single_cluster_log("FIRST", "1.0")).unwrap();
        fs::write(logs.join("b.log"), fixtures::single_cluster_log("SECOND", "2.0")).unwrap();
        fs::write(logs.join("broken.log"), "not a gamess log\n").unwrap();

        let args = cli(&[
            "geds",
            "-e",
            "mh",
            "-t",
            "-j",
            "2",
            "--output-dir",
            out.to_str().unwrap(),
            logs.to_str().unwrap(),
        ]);
        execute(args).unwrap();

        let energies = fs::read_to_string(out.join("energies.txt")).unwrap();
        assert!(energies.contains("Run Title: FIRST"));
        assert!(energies.contains("# Subsystem No: 3"));
        assert!(energies.contains("1000.000"));
        assert!(energies.contains("2000.000"));

        let transposed = fs::read_to_string(out.join("tenergies.txt")).unwrap();
        let row = transposed
            .lines()
            .filter(|l| l.starts_with("\"DE(HF)"))
            .last()
            .unwrap();
        assert!(row.contains("1000.000") && row.contains("2000.000"));

        assert!(out.join("toten.txt").exists());
        assert!(!out.join("properties.txt").exists());
    }

    #[test]
    fn test_end_to_end_finite_field() {
        let dir = TempDir::new().unwrap();
        let logs = dir.path().join("logs");
        let out = dir.path().join("out");
        fs::create_dir(&logs).unwrap();
        fs::write(logs.join("ff.log"), fixtures::finite_field_log("FIELDS")).unwrap();

        execute(cli(&[
            "geds",
            "-e",
            "mh",
            "--output-dir",
            out.to_str().unwrap(),
            logs.to_str().unwrap(),
        ]))
        .unwrap();

        let energies = fs::read_to_string(out.join("energies.txt")).unwrap();
        assert!(energies.contains("# Many-body energy terms for selected fields"));
        let field_row = energies
            .lines()
            .find(|l| l.starts_with("\" 0.0010,  0.0000,  0.0000"))
            .unwrap();
        assert!(field_row.contains("-4.900") && field_row.contains("-2.000"));
        assert!(field_row.ends_with("ff"));
        assert!(energies.lines().any(|l| l.starts_with("\"-0.0010,  0.0000,  0.0000")));

        let properties = fs::read_to_string(out.join("properties.txt")).unwrap();
        assert!(properties.starts_with("# Total, Excess and Sum of Interaction Induced Properties"));
        assert!(properties.contains("# Dipole Moment Vector i=z"));
        assert!(properties.contains("HF,CLUSTER1") && properties.contains("MP2,CLUSTER1"));
        assert!(properties.contains("# Interaction Induced Properties"));
        assert!(properties.contains("HF,DE"));
        let name = logs.join("ff").display().to_string();
        assert!(properties
            .lines()
            .any(|l| l.starts_with(&format!("\"{name}")) && l.contains("2.0000")));

        let transposed = fs::read_to_string(out.join("troperties.txt")).unwrap();
        assert!(transposed
            .lines()
            .any(|l| l.starts_with("\"HF,CLUSTER1") && l.contains("2.0000")));

        assert!(!out.join("toten.txt").exists());
    }

    #[test]
    fn test_all_runs_failing() {
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("bad.log");
        fs::write(&log, "nothing here\n").unwrap();
        let out = dir.path().join("out");

        let err = execute(cli(&[
            "geds",
            "--output-dir",
            out.to_str().unwrap(),
            log.to_str().unwrap(),
        ]))
        .unwrap_err();
        assert!(matches!(err, GedsError::NoRuns { count: 1 }));
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let err = execute(cli(&["geds", dir.path().to_str().unwrap()])).unwrap_err();
        assert!(matches!(err, GedsError::NoFilesFound { .. }));
    }
}
