//! # 运行配置
//!
//! 由命令行参数一次性构造的不可变配置，显式传递给解析、汇总与渲染各阶段。
//!
//! ## 依赖关系
//! - 被 `cli/`, `commands/`, `parsers/`, `tables/`, `render/` 使用
//! - 使用 `clap::ValueEnum` 派生选项枚举

use clap::ValueEnum;
use std::path::PathBuf;

/// 输出格式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Plain fixed-width text
    #[default]
    Txt,
    /// Semicolon separated values
    Csv,
    /// LaTeX tabular environments
    Tex,
}

impl OutputFormat {
    /// 输出文件扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Txt => "txt",
            OutputFormat::Csv => "csv",
            OutputFormat::Tex => "tex",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// 能量单位
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum EnergyUnit {
    /// kcal/mol
    Kcal,
    /// kJ/mol
    Kj,
    /// meV
    Mev,
    /// milli-Hartree
    Mh,
    /// Hartree (atomic units)
    #[default]
    Au,
}

impl std::fmt::Display for EnergyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnergyUnit::Kcal => write!(f, "kcal/mol"),
            EnergyUnit::Kj => write!(f, "kJ/mol"),
            EnergyUnit::Mev => write!(f, "meV"),
            EnergyUnit::Mh => write!(f, "mEh"),
            EnergyUnit::Au => write!(f, "Eh"),
        }
    }
}

/// 电性质单位
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum PropertyUnit {
    /// Atomic units
    #[default]
    Au,
    /// Milli atomic units
    Mau,
    /// SI units
    Si,
    /// SI divided by the vacuum permittivity
    Asi,
    /// Electrostatic units
    Esu,
}

impl std::fmt::Display for PropertyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyUnit::Au => write!(f, "au"),
            PropertyUnit::Mau => write!(f, "mau"),
            PropertyUnit::Si => write!(f, "SI"),
            PropertyUnit::Asi => write!(f, "SI/4πε0"),
            PropertyUnit::Esu => write!(f, "esu"),
        }
    }
}

/// 文件排序方式
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Lexicographic order of file names
    #[default]
    Lexical,
    /// Compare the decimal numbers embedded in file names
    Float,
}

/// 相对值模式（以行内第一个或最后一个值为参考）
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum RelativeMode {
    /// Use the first value of each row as 100 %
    First,
    /// Use the last value of each row as 100 %
    Last,
}

/// 报告生成配置
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub format: OutputFormat,
    pub energy_unit: EnergyUnit,
    pub property_unit: PropertyUnit,
    pub sort_mode: SortMode,
    pub relative: Option<RelativeMode>,
    pub collect_totals: bool,
    pub debug: bool,
    pub jobs: usize,
    pub output_dir: PathBuf,
}

impl Default for ReportConfig {
    fn default() -> Self {
        ReportConfig {
            format: OutputFormat::Txt,
            energy_unit: EnergyUnit::Au,
            property_unit: PropertyUnit::Au,
            sort_mode: SortMode::Lexical,
            relative: None,
            collect_totals: false,
            debug: false,
            jobs: 1,
            output_dir: PathBuf::from("."),
        }
    }
}

impl ReportConfig {
    /// 输出文件路径（位于输出目录下）
    pub fn output_path(&self, stem: &str) -> PathBuf {
        self.output_dir
            .join(format!("{}.{}", stem, self.format.extension()))
    }
}
