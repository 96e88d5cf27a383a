//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数，并一次性转换为 `ReportConfig`。
//!
//! ```text
//! geds [OPTIONS] <LOGS>...
//! ```
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 参数传递给 `commands/report.rs`

use crate::batch::DEFAULT_PATTERN;
use crate::config::{EnergyUnit, OutputFormat, PropertyUnit, RelativeMode, ReportConfig, SortMode};
use clap::Parser;
use std::path::PathBuf;

/// geds - GAMESS EDS 日志汇总工具
#[derive(Parser, Debug)]
#[command(name = "geds")]
#[command(author = "Robert Gora")]
#[command(version)]
#[command(
    about = "Collect interaction energies and induced electric properties from GAMESS EDS logs",
    long_about = None
)]
pub struct Cli {
    /// GAMESS EDS log files or directories containing them
    #[arg(required = true, value_name = "LOGS")]
    pub logs: Vec<PathBuf>,

    /// Output format
    #[arg(short = 'o', long = "out", value_enum, ignore_case = true, default_value_t = OutputFormat::Txt)]
    pub format: OutputFormat,

    /// Energy units
    #[arg(short = 'e', long, value_enum, ignore_case = true, default_value_t = EnergyUnit::Au)]
    pub energy_units: EnergyUnit,

    /// Units of electric properties
    #[arg(short = 'p', long, value_enum, ignore_case = true, default_value_t = PropertyUnit::Au)]
    pub property_units: PropertyUnit,

    /// Ordering of log files in the tables
    #[arg(short = 's', long, value_enum, ignore_case = true, default_value_t = SortMode::Lexical)]
    pub sort: SortMode,

    /// Print values relative to the first or last value of each row (in %)
    #[arg(short = 'r', long, value_enum, ignore_case = true)]
    pub relative: Option<RelativeMode>,

    /// Collect total energies of subsystems into 'toten.txt'
    #[arg(short = 't', long, default_value_t = false)]
    pub totals: bool,

    /// Print per-file parsing details
    #[arg(short = 'd', long, default_value_t = false)]
    pub debug: bool,

    /// Number of parallel parsers (0 = all cores)
    #[arg(short = 'j', long, default_value_t = 0)]
    pub jobs: usize,

    /// Directory where the output files are written
    #[arg(long, default_value = ".")]
    pub output_dir: PathBuf,

    /// File pattern for directory inputs (comma separated)
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pub pattern: String,

    /// Recurse into directory inputs
    #[arg(long, default_value_t = false)]
    pub recursive: bool,
}

impl Cli {
    /// 构造报告配置
    pub fn config(&self) -> ReportConfig {
        ReportConfig {
            format: self.format,
            energy_unit: self.energy_units,
            property_unit: self.property_units,
            sort_mode: self.sort,
            relative: self.relative,
            collect_totals: self.totals,
            debug: self.debug,
            jobs: self.jobs,
            output_dir: self.output_dir.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["geds", "a.log"]).unwrap();
        let config = cli.config();
        assert_eq!(config.format, OutputFormat::Txt);
        assert_eq!(config.energy_unit, EnergyUnit::Au);
        assert_eq!(config.property_unit, PropertyUnit::Au);
        assert_eq!(config.relative, None);
        assert!(!config.collect_totals);
        assert_eq!(cli.pattern, "*.log");
    }

    #[test]
    fn test_options() {
        let cli = Cli::try_parse_from([
            "geds", "-o", "csv", "-e", "KCAL", "-p", "esu", "-s", "float", "-r", "last", "-t",
            "a.log", "b.log",
        ])
        .unwrap();
        let config = cli.config();
        assert_eq!(cli.logs.len(), 2);
        assert_eq!(config.format, OutputFormat::Csv);
        assert_eq!(config.energy_unit, EnergyUnit::Kcal);
        assert_eq!(config.property_unit, PropertyUnit::Esu);
        assert_eq!(config.sort_mode, SortMode::Float);
        assert_eq!(config.relative, Some(RelativeMode::Last));
        assert!(config.collect_totals);
    }

    #[test]
    fn test_usage_errors() {
        assert!(Cli::try_parse_from(["geds"]).is_err());
        assert!(Cli::try_parse_from(["geds", "-e", "ev", "a.log"]).is_err());
    }
}
