//! # 相互作用能数据模型
//!
//! 每个文件、每个外场下的能量项。数值保持日志中的原始文本（原子单位），
//! 只在渲染时解析与换算。
//!
//! ## 依赖关系
//! - 被 `parsers/energy.rs`, `tables/energy.rs` 使用
//! - 使用 `models/field.rs`, `models/labels.rs`

use super::field::FieldVector;
use super::labels::{ClusterId, TermLabel};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// 日志中的原始数值文本
pub type Numeral = String;

/// 单个外场下的能量项
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldEnergies {
    /// 子体系能量项：标签 → (簇编号 → 数值)
    pub clusters: HashMap<TermLabel, BTreeMap<ClusterId, Numeral>>,
    /// 多体分解/外场能量项：标签 → 数值
    pub many_body: HashMap<TermLabel, Numeral>,
}

impl FieldEnergies {
    pub fn cluster_value(&self, label: &TermLabel, cluster: ClusterId) -> Option<&Numeral> {
        self.clusters.get(label).and_then(|m| m.get(&cluster))
    }

    pub fn many_body_value(&self, label: &TermLabel) -> Option<&Numeral> {
        self.many_body.get(label)
    }

    /// 该外场下出现过的全部簇编号（升序）
    pub fn cluster_ids(&self) -> BTreeSet<ClusterId> {
        self.clusters
            .values()
            .flat_map(|m| m.keys().copied())
            .collect()
    }
}

/// 一个文件的全部能量，按外场首次出现顺序保存
#[derive(Debug, Clone, PartialEq)]
pub struct RunEnergies {
    fields: Vec<(FieldVector, FieldEnergies)>,
}

impl Default for RunEnergies {
    fn default() -> Self {
        RunEnergies {
            fields: vec![(FieldVector::ZERO, FieldEnergies::default())],
        }
    }
}

impl RunEnergies {
    /// 仅含无外场基准的空记录
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, field: &FieldVector) -> bool {
        self.fields.iter().any(|(f, _)| f == field)
    }

    pub fn get(&self, field: &FieldVector) -> Option<&FieldEnergies> {
        self.fields.iter().find(|(f, _)| f == field).map(|(_, e)| e)
    }

    /// 取得（必要时创建）某外场下的能量项
    pub fn entry(&mut self, field: FieldVector) -> &mut FieldEnergies {
        let index = match self.fields.iter().position(|(f, _)| *f == field) {
            Some(index) => index,
            None => {
                self.fields.push((field, FieldEnergies::default()));
                self.fields.len() - 1
            }
        };
        &mut self.fields[index].1
    }

    /// 无外场基准
    pub fn baseline(&self) -> &FieldEnergies {
        self.get(&FieldVector::ZERO)
            .unwrap_or_else(|| &self.fields[0].1)
    }

    pub fn baseline_mut(&mut self) -> &mut FieldEnergies {
        self.entry(FieldVector::ZERO)
    }

    /// 外场列表（首次出现顺序）
    pub fn fields(&self) -> Vec<FieldVector> {
        self.fields.iter().map(|(f, _)| *f).collect()
    }
}
