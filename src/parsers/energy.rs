//! # 相互作用能提取
//!
//! 三类能量段落：
//! - 各子体系簇的 `  INTERACTION ENERGY TERMS`（相关计算时读两遍，第二遍加 `(CORR)` 后缀）
//! - 多体分解的 `MANY BODY INTERACTION ENERGY TERMS`（后缀 `(MNB)`，无簇维度）
//! - 有限场计算中每个 `APPLIED FIELD` 之后的能量段落（后缀 `(MNB)`，按外场存放）
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 调用
//! - 使用 `parsers/cursor.rs`, `models/energy.rs`, `models/labels.rs`

use super::cursor::Cursor;
use super::preamble::digit_fields;
use crate::error::Result;
use crate::models::energy::{FieldEnergies, RunEnergies};
use crate::models::field::FieldVector;
use crate::models::labels::{
    ClusterId, OrderedLabelSet, RunLabels, TermLabel, CORR_SUFFIX, MNB_SUFFIX,
};
use crate::models::run::RunRecord;

const CLUSTER_ANCHOR: &str = "  INTERACTION ENERGY TERMS";
const MANY_BODY_ANCHOR: &str = "MANY BODY INTERACTION ENERGY TERMS";
const FIELD_MARKER: &str = "APPLIED FIELD";
const BLOCK_END: &str = "--------------------";

/// 读取段落表头之后的 "标签 数值" 行，直到虚线或输入结束
fn read_term_block(cursor: &mut Cursor) -> Result<Vec<(String, String)>> {
    let mut terms = Vec::new();
    loop {
        let line = cursor.skip(1);
        if line.is_empty() || line.contains(BLOCK_END) {
            break;
        }
        if !line.contains('(') {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        let term = match tokens.len() {
            4 => (format!("{} {}", tokens[0], tokens[1]), tokens[2].to_string()),
            n if n >= 2 => (tokens[0].to_string(), tokens[1].to_string()),
            _ => return Err(cursor.malformed("energy term", &line)),
        };
        terms.push(term);
    }
    Ok(terms)
}

/// 读取下一个子体系簇的相互作用能
pub fn read_cluster_energies(
    cursor: &mut Cursor,
    suffix: &str,
    labels: &mut OrderedLabelSet,
    energies: &mut FieldEnergies,
) -> Result<()> {
    let header = cursor.require(CLUSTER_ANCHOR)?;
    let cluster = digit_fields(&header)
        .get(2)
        .and_then(|t| t.parse::<u32>().ok())
        .map(ClusterId)
        .ok_or_else(|| cursor.malformed("cluster header", &header))?;
    cursor.skip(4);

    for (label, value) in read_term_block(cursor)? {
        let label = TermLabel::new(label).with_suffix(suffix);
        labels.insert(label.clone());
        energies
            .clusters
            .entry(label)
            .or_default()
            .insert(cluster, value);
    }
    Ok(())
}

/// 读取全部子体系簇（零场）
pub fn read_subsystem_energies(
    cursor: &mut Cursor,
    record: &RunRecord,
    labels: &mut RunLabels,
    energies: &mut RunEnergies,
) -> Result<()> {
    let baseline = energies.baseline_mut();
    for _ in 0..record.cluster_count() {
        read_cluster_energies(cursor, "", &mut labels.subsystem, baseline)?;
        if record.correlation.is_correlated() {
            read_cluster_energies(cursor, CORR_SUFFIX, &mut labels.subsystem, baseline)?;
        }
    }
    Ok(())
}

/// 从当前位置起，读取第 `occurrence` 个多体分解段落
fn read_many_body_block(
    cursor: &mut Cursor,
    occurrence: usize,
    labels: &mut OrderedLabelSet,
    energies: &mut FieldEnergies,
) -> Result<()> {
    for _ in 0..occurrence {
        cursor.require(MANY_BODY_ANCHOR)?;
    }
    cursor.skip(4);
    store_many_body_terms(cursor, labels, energies)
}

fn store_many_body_terms(
    cursor: &mut Cursor,
    labels: &mut OrderedLabelSet,
    energies: &mut FieldEnergies,
) -> Result<()> {
    for (label, value) in read_term_block(cursor)? {
        let label = TermLabel::new(label).with_suffix(MNB_SUFFIX);
        labels.insert(label.clone());
        energies.many_body.insert(label, value);
    }
    Ok(())
}

/// 零场多体分解（相关计算取第 3 个段落，否则第 2 个）
pub fn read_many_body_energies(
    cursor: &mut Cursor,
    record: &RunRecord,
    labels: &mut RunLabels,
    energies: &mut RunEnergies,
) -> Result<()> {
    cursor.rewind();
    let occurrence = if record.correlation.is_correlated() { 3 } else { 2 };
    read_many_body_block(cursor, occurrence, &mut labels.many_body, energies.baseline_mut())
}

/// 有限场计算：每个新出现的外场下的能量
///
/// 同一外场只读取一次；重新定位时使用标记行的完整文本而不是模式。
pub fn read_field_energies(
    cursor: &mut Cursor,
    record: &RunRecord,
    labels: &mut RunLabels,
    energies: &mut RunEnergies,
) -> Result<()> {
    cursor.rewind();
    loop {
        let marker = cursor.find_line(FIELD_MARKER);
        if marker.is_empty() {
            break;
        }
        let field = FieldVector::from_marker_line(&marker)
            .ok_or_else(|| cursor.malformed("applied field", &marker))?;
        if energies.contains(&field) {
            continue;
        }
        labels.fields.insert(field);

        cursor.rewind();
        cursor.require(&marker)?;
        let target = energies.entry(field);
        if record.many_body {
            read_many_body_block(cursor, 1, &mut labels.many_body, target)?;
        } else {
            cursor.require(CLUSTER_ANCHOR)?;
            cursor.skip(4);
            store_many_body_terms(cursor, &mut labels.many_body, target)?;
        }
    }
    Ok(())
}
