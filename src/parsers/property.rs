//! # 有限场电性质提取
//!
//! 依次读取四个段落（子体系总性质、相互作用诱导性质、诱导性质之和、超额性质），
//! 每个 `BASED RESULTS` 行开始一条记录。
//!
//! 日志中同时给出张量与由张量导出的标量（|μ|、⟨α⟩、Δα、β(Z)、⟨γ⟩）。
//! 始终保存由张量重新计算的标量；日志中的标量只用于一致性检查，
//! 偏差超过容差时记录一条警告。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 调用
//! - 使用 `parsers/cursor.rs`, `models/property.rs`, `models/labels.rs`

use super::cursor::Cursor;
use crate::error::Result;
use crate::models::field::parse_fortran_float;
use crate::models::labels::{OrderedLabelSet, RunLabels, TermLabel};
use crate::models::property::{
    PropertyCategory, PropertySet, PropertyValues, Tensor3, Vector3,
};

const SECTION_END: &str = "==============================";
const RECORD_MARKER: &str = "BASED RESULTS";

const DIPOLE_TOLERANCE: f64 = 1e-5;
const ALPHA_TOLERANCE: f64 = 1e-4;
const BETA_TOLERANCE: f64 = 1e-4;
const GAMMA_TOLERANCE: f64 = 1e-2;

/// 读取四类性质
pub fn read_properties(
    cursor: &mut Cursor,
    labels: &mut RunLabels,
    warnings: &mut Vec<String>,
) -> Result<PropertySet> {
    let mut properties = PropertySet::default();
    cursor.rewind();

    for category in PropertyCategory::ALL {
        cursor.require(category.anchor())?;
        cursor.skip(1);

        let label_set = category_labels(labels, category);
        let values = properties.category_mut(category);
        loop {
            let line = cursor.skip(1);
            if line.is_empty() || line.contains(SECTION_END) {
                break;
            }
            if !line.contains(RECORD_MARKER) {
                continue;
            }

            let label = record_label(category, &line)
                .ok_or_else(|| cursor.malformed("property header", &line))?;
            label_set.insert(label.clone());
            let record = PropertyReader::new(cursor, &label, warnings).read()?;
            values.insert(label, record);
        }
    }

    Ok(properties)
}

fn category_labels(labels: &mut RunLabels, category: PropertyCategory) -> &mut OrderedLabelSet {
    match category {
        PropertyCategory::Total => &mut labels.total_property,
        PropertyCategory::Interaction => &mut labels.interaction_property,
        PropertyCategory::SumInteraction => &mut labels.sum_property,
        PropertyCategory::Excess => &mut labels.excess_property,
    }
}

/// 由 `BASED RESULTS` 行构造标签
pub fn record_label(category: PropertyCategory, line: &str) -> Option<TermLabel> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return None;
    }
    let coupled_cluster = tokens[1].contains("CC");
    let last = tokens[tokens.len() - 1];
    let second_last = tokens[tokens.len() - 2];

    let label = match category {
        PropertyCategory::Interaction | PropertyCategory::SumInteraction => {
            let term = second_last.split('-').next().unwrap_or(second_last);
            if tokens.len() == 3 {
                tokens[0].to_string()
            } else if coupled_cluster {
                format!("{},{}", tokens[..3].concat(), term)
            } else {
                format!("{},{}", tokens[0], term)
            }
        }
        PropertyCategory::Total | PropertyCategory::Excess => {
            if coupled_cluster {
                format!("{},{}{}", tokens[..3].concat(), second_last, last)
            } else {
                format!("{},{}{}", tokens[0], second_last, last)
            }
        }
    };
    Some(TermLabel::new(label))
}

/// 单条性质记录的读取器
///
/// 从 `BASED RESULTS` 行之后按固定的跳行序列读取：
/// μ → |μ| → α → ⟨α⟩ → Δα → β → β(Z) → γ → ⟨γ⟩
pub struct PropertyReader<'a> {
    cursor: &'a mut Cursor,
    label: &'a TermLabel,
    warnings: &'a mut Vec<String>,
}

impl<'a> PropertyReader<'a> {
    pub fn new(cursor: &'a mut Cursor, label: &'a TermLabel, warnings: &'a mut Vec<String>) -> Self {
        PropertyReader {
            cursor,
            label,
            warnings,
        }
    }

    pub fn read(mut self) -> Result<PropertyValues> {
        let dipole = self.vector(4)?;
        let parsed_norm = self.scalar(2, 1, "dipole moment")?;
        let dipole_norm = self.checked(
            parsed_norm,
            PropertyValues::dipole_norm_of(&dipole),
            DIPOLE_TOLERANCE,
            "dipole moment",
        );

        let alpha = self.tensor(2)?;
        let parsed = self.scalar(2, 1, "<alpha>")?;
        let alpha_isotropic = self.checked(
            parsed,
            PropertyValues::isotropic_alpha_of(&alpha),
            ALPHA_TOLERANCE,
            "<alpha>",
        );
        let parsed = self.scalar(1, 3, "<alpha,ani>")?;
        let alpha_anisotropy = self.checked(
            parsed,
            PropertyValues::alpha_anisotropy_of(&alpha),
            ALPHA_TOLERANCE,
            "<alpha,ani>",
        );

        let beta = self.tensor(2)?;
        let parsed = self.scalar(2, 3, "<beta,vec>")?;
        let beta_vector = self.checked(
            parsed,
            PropertyValues::beta_vector_of(&beta),
            BETA_TOLERANCE,
            "<beta,vec>",
        );

        let gamma = self.tensor(2)?;
        let parsed = self.scalar(2, 1, "<gamma>")?;
        let gamma_isotropic = self.checked(
            parsed,
            PropertyValues::isotropic_gamma_of(&gamma),
            GAMMA_TOLERANCE,
            "<gamma>",
        );

        Ok(PropertyValues {
            dipole,
            dipole_norm,
            alpha,
            alpha_isotropic,
            alpha_anisotropy,
            beta,
            beta_vector,
            gamma,
            gamma_isotropic,
        })
    }

    fn number(&self, token: Option<&str>, context: &str, line: &str) -> Result<f64> {
        token
            .and_then(parse_fortran_float)
            .ok_or_else(|| self.cursor.malformed(context, line))
    }

    /// 跳过 `skip` 行后整行为 3 个分量
    fn vector(&mut self, skip: usize) -> Result<Vector3> {
        let line = self.cursor.skip(skip);
        let mut tokens = line.split_whitespace();
        let mut vector = [0.0; 3];
        for component in vector.iter_mut() {
            *component = self.number(tokens.next(), "dipole vector", &line)?;
        }
        Ok(vector)
    }

    /// 跳过 `skip` 行后连续 3 行，每行去掉首个标记后为 3 个分量
    fn tensor(&mut self, skip: usize) -> Result<Tensor3> {
        self.cursor.skip(skip);
        let mut tensor = [[0.0; 3]; 3];
        for row in tensor.iter_mut() {
            let line = self.cursor.skip(1);
            let mut tokens = line.split_whitespace().skip(1);
            for component in row.iter_mut() {
                *component = self.number(tokens.next(), "tensor row", &line)?;
            }
        }
        Ok(tensor)
    }

    /// 跳过 `skip` 行后第 `index` 个标记
    fn scalar(&mut self, skip: usize, index: usize, context: &str) -> Result<f64> {
        let line = self.cursor.skip(skip);
        self.number(line.split_whitespace().nth(index), context, &line)
    }

    /// 一致性检查：返回导出值，偏差过大时记录警告
    fn checked(&mut self, parsed: f64, derived: f64, tolerance: f64, quantity: &str) -> f64 {
        if (parsed - derived).abs() > tolerance {
            self.warnings.push(format!(
                "{}: large difference in {} for {} (log {}, derived {})",
                self.cursor.source(),
                quantity,
                self.label,
                parsed,
                derived
            ));
        }
        derived
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::fixtures;

    fn log(norm: &str) -> String {
        fixtures::property_sections(norm)
    }

    #[test]
    fn test_record_labels() {
        let line = " HF BASED RESULTS FOR DE-HF TERM\n";
        assert_eq!(
            record_label(PropertyCategory::Interaction, line).unwrap().as_str(),
            "HF,DE"
        );
        assert_eq!(
            record_label(PropertyCategory::SumInteraction, " HF BASED RESULTS\n")
                .unwrap()
                .as_str(),
            "HF"
        );
        let cc = " R-CCSD(T) CCSD(T) BASED RESULTS FOR 2-BODY CLUSTER 1\n";
        assert_eq!(
            record_label(PropertyCategory::Total, cc).unwrap().as_str(),
            "R-CCSD(T)CCSD(T)BASED,CLUSTER1"
        );
        assert_eq!(
            record_label(
                PropertyCategory::Excess,
                " MP2 BASED RESULTS FOR 2-BODY CLUSTER 1"
            )
            .unwrap()
            .as_str(),
            "MP2,CLUSTER1"
        );
        assert!(record_label(PropertyCategory::Total, " A B\n").is_none());
    }

    #[test]
    fn test_consistent_record_has_no_warnings() {
        let mut cursor = Cursor::new(&log("3.000000"), "ff.log");
        let mut labels = RunLabels::default();
        let mut warnings = Vec::new();

        let properties = read_properties(&mut cursor, &mut labels, &mut warnings).unwrap();

        assert!(warnings.is_empty(), "{warnings:?}");
        let values = properties.interaction[&TermLabel::new("HF,DE")];
        assert_eq!(values.dipole, [1.0, 2.0, 2.0]);
        assert_eq!(values.alpha[2][2], 12.0);
        assert!((values.alpha_isotropic - 11.0).abs() < 1e-12);
        assert!((values.alpha_anisotropy - 2.0).abs() < 1e-12);
        assert!((values.beta_vector - 3.0).abs() < 1e-12);
        assert!((values.gamma_isotropic - 84.0).abs() < 1e-9);
        assert_eq!(labels.total_property.as_slice()[0].as_str(), "HF,CLUSTER1");
        assert_eq!(labels.excess_property.as_slice()[0].as_str(), "MP2,CLUSTER1");
        assert_eq!(properties.sum_interaction.len(), 1);
    }

    #[test]
    fn test_dipole_mismatch_keeps_derived_norm() {
        let mut cursor = Cursor::new(&log("3.00001"), "ff.log");
        let mut labels = RunLabels::default();
        let mut warnings = Vec::new();

        let properties = read_properties(&mut cursor, &mut labels, &mut warnings).unwrap();

        assert_eq!(warnings.len(), 4);
        assert!(warnings[0].contains("dipole moment"));
        assert_eq!(properties.total[&TermLabel::new("HF,CLUSTER1")].dipole_norm, 3.0);
    }

    #[test]
    fn test_malformed_tensor_is_log_value_error() {
        let broken = log("3.000000").replacen("11.000000     0.000000", "**********     0.000000", 1);
        let mut cursor = Cursor::new(&broken, "ff.log");
        let mut labels = RunLabels::default();
        let mut warnings = Vec::new();
        let err = read_properties(&mut cursor, &mut labels, &mut warnings).unwrap_err();
        assert!(matches!(err, crate::error::GedsError::LogValue { .. }));
    }
}
