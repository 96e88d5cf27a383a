//! # 单次计算（单个日志文件）数据模型
//!
//! 存储日志前导部分的元数据以及该文件解析出的全部结果。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `tables/`, `commands/report.rs` 使用
//! - 使用 `models/energy.rs`, `models/property.rs`, `models/labels.rs`

use super::energy::RunEnergies;
use super::field::FieldVector;
use super::labels::{ClusterId, RunLabels};
use super::property::PropertySet;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// 电子相关处理级别
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrelationLevel {
    None,
    Mp2,
    CoupledCluster(String),
}

impl CorrelationLevel {
    /// 由 MPLEVL 与 CCTYP 关键字确定
    pub fn from_keywords(mp_level: u32, cc_keyword: &str) -> Self {
        let cc = cc_keyword.trim();
        if !cc.is_empty() && !cc.eq_ignore_ascii_case("NONE") {
            CorrelationLevel::CoupledCluster(cc.to_uppercase())
        } else if mp_level == 2 {
            CorrelationLevel::Mp2
        } else {
            CorrelationLevel::None
        }
    }

    /// 是否需要读取带 `(CORR)` 后缀的第二遍能量项
    pub fn is_correlated(&self) -> bool {
        !matches!(self, CorrelationLevel::None)
    }

    /// 是否包含 CCSD(TQ) 总能量
    pub fn has_ccsd_tq(&self) -> bool {
        matches!(self, CorrelationLevel::CoupledCluster(m) if m.contains("CCSD(TQ"))
    }
}

impl std::fmt::Display for CorrelationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CorrelationLevel::None => write!(f, "SCF"),
            CorrelationLevel::Mp2 => write!(f, "MP2"),
            CorrelationLevel::CoupledCluster(method) => write!(f, "{}", method),
        }
    }
}

/// 日志前导部分的元数据
#[derive(Debug, Clone, PartialEq)]
pub struct RunRecord {
    /// 日志文件路径
    pub path: PathBuf,
    /// 显示名（路径去掉 `.log`）
    pub name: String,
    /// RUN TITLE
    pub title: String,
    /// 单体数
    pub monomers: usize,
    /// 子体系数
    pub subsystems: usize,
    /// 相关处理级别
    pub correlation: CorrelationLevel,
    /// 多体分解（子体系数 > 3）
    pub many_body: bool,
    /// 有限场性质计算
    pub finite_field: bool,
}

impl RunRecord {
    /// 需要读取的相互作用能段落数（非单体子体系）
    pub fn cluster_count(&self) -> usize {
        self.subsystems.saturating_sub(self.monomers)
    }
}

/// 文件路径 → 显示名
pub fn display_name(path: &std::path::Path) -> String {
    path.display().to_string().replace(".log", "")
}

/// 总能量级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum TotalLevel {
    #[serde(rename = "SCF")]
    Scf,
    #[serde(rename = "MP2")]
    Mp2,
    #[serde(rename = "CCSDTQ")]
    CcsdTq,
}

impl std::fmt::Display for TotalLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TotalLevel::Scf => write!(f, "SCF"),
            TotalLevel::Mp2 => write!(f, "MP2"),
            TotalLevel::CcsdTq => write!(f, "CCSDTQ"),
        }
    }
}

/// 单个外场下各级别的子体系总能量
pub type LevelTotals = BTreeMap<TotalLevel, BTreeMap<ClusterId, f64>>;

/// 一个文件的总能量（外场按首次出现顺序）
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TotalEnergies {
    pub fields: Vec<(FieldVector, LevelTotals)>,
}

impl TotalEnergies {
    pub fn entry(&mut self, field: FieldVector) -> &mut LevelTotals {
        let index = match self.fields.iter().position(|(f, _)| *f == field) {
            Some(index) => index,
            None => {
                self.fields.push((field, LevelTotals::new()));
                self.fields.len() - 1
            }
        };
        &mut self.fields[index].1
    }

    pub fn baseline(&self) -> Option<&LevelTotals> {
        self.fields
            .iter()
            .find(|(f, _)| f.is_zero())
            .map(|(_, totals)| totals)
    }
}

/// 单个文件的完整解析结果
#[derive(Debug, Clone)]
pub struct ParsedRun {
    pub record: RunRecord,
    pub energies: RunEnergies,
    pub properties: Option<PropertySet>,
    pub totals: Option<TotalEnergies>,
    pub labels: RunLabels,
    /// 非致命的一致性警告
    pub warnings: Vec<String>,
}

impl ParsedRun {
    pub fn new(record: RunRecord) -> Self {
        ParsedRun {
            record,
            energies: RunEnergies::new(),
            properties: None,
            totals: None,
            labels: RunLabels::default(),
            warnings: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.record.name
    }
}
