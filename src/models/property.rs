//! # 电性质数据模型
//!
//! 有限场计算得到的偶极矩、极化率与一/二阶超极化率。
//!
//! ## 张量元素
//! 对比表中矢量取 z 分量，张量取展平后的第 8 个元素：
//! ```text
//!            Mu:     Alpha:     Beta:         Gamma:
//! [0 1 2]    x y z   xx xy xz   xxx xxy xxz   xxxx xxyy xxzz
//! [3 4 5]            yx yy yz   yyx yyy yyz   yyxx yyyy yyzz
//! [6 7 8]            zx zy zz   zzx zzy zzz   zzxx zzyy zzzz
//! ```
//!
//! ## 依赖关系
//! - 被 `parsers/property.rs`, `tables/property.rs`, `units.rs` 使用
//! - 使用 `models/labels.rs`

use super::labels::TermLabel;
use std::collections::HashMap;

pub type Vector3 = [f64; 3];
pub type Tensor3 = [[f64; 3]; 3];

/// 性质段落类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyCategory {
    Total,
    Interaction,
    SumInteraction,
    Excess,
}

impl PropertyCategory {
    pub const ALL: [PropertyCategory; 4] = [
        PropertyCategory::Total,
        PropertyCategory::Interaction,
        PropertyCategory::SumInteraction,
        PropertyCategory::Excess,
    ];

    /// 日志中的段落锚点
    pub fn anchor(&self) -> &'static str {
        match self {
            PropertyCategory::Total => "ELECTRIC PROPERTIES OF SUBSYSTEMS",
            PropertyCategory::Interaction => "  INTERACTION INDUCED PROPERTIES",
            PropertyCategory::SumInteraction => "SUM OF INTERACTION INDUCED PROPERTIES",
            PropertyCategory::Excess => "EXCESS PROPERTIES",
        }
    }
}

/// 物理量之间共享换算因子的分组
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyGroup {
    Dipole,
    Polarizability,
    FirstHyperpolarizability,
    SecondHyperpolarizability,
}

/// 对比表中的物理量
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyQuantity {
    DipoleVector,
    DipoleMagnitude,
    Polarizability,
    IsotropicPolarizability,
    AnisotropicPolarizability,
    FirstHyperpolarizability,
    FirstHyperpolarizabilityVector,
    SecondHyperpolarizability,
    SecondHyperpolarizabilityIsotropic,
}

impl PropertyQuantity {
    pub const ALL: [PropertyQuantity; 9] = [
        PropertyQuantity::DipoleVector,
        PropertyQuantity::DipoleMagnitude,
        PropertyQuantity::Polarizability,
        PropertyQuantity::IsotropicPolarizability,
        PropertyQuantity::AnisotropicPolarizability,
        PropertyQuantity::FirstHyperpolarizability,
        PropertyQuantity::FirstHyperpolarizabilityVector,
        PropertyQuantity::SecondHyperpolarizability,
        PropertyQuantity::SecondHyperpolarizabilityIsotropic,
    ];

    pub fn group(&self) -> PropertyGroup {
        use PropertyQuantity::*;
        match self {
            DipoleVector | DipoleMagnitude => PropertyGroup::Dipole,
            Polarizability | IsotropicPolarizability | AnisotropicPolarizability => {
                PropertyGroup::Polarizability
            }
            FirstHyperpolarizability | FirstHyperpolarizabilityVector => {
                PropertyGroup::FirstHyperpolarizability
            }
            SecondHyperpolarizability | SecondHyperpolarizabilityIsotropic => {
                PropertyGroup::SecondHyperpolarizability
            }
        }
    }

    /// 表头说明
    pub fn description(&self) -> &'static str {
        use PropertyQuantity::*;
        match self {
            DipoleVector => "Dipole Moment Vector i=z",
            DipoleMagnitude => "Total Dipole Moment",
            Polarizability => "Polarizability Tensor i=zz",
            IsotropicPolarizability => "Isotropic Polarizability",
            AnisotropicPolarizability => {
                "Anisotropy of Polarizability (Z-axis is the rotation axis)"
            }
            FirstHyperpolarizability => "First hyperpolarizability tensor i=zzz",
            FirstHyperpolarizabilityVector => {
                "Vector component of hyperpolarizability tensor (Z is the permanent dipole moment direction)"
            }
            SecondHyperpolarizability => "Second hyperpolarizability tensor i=zzzz",
            SecondHyperpolarizabilityIsotropic => {
                "Scalar component of second hyperpolarizability tensor given by the isotropic average"
            }
        }
    }

    /// 对比表中显示的标量
    pub fn select(&self, values: &PropertyValues) -> f64 {
        use PropertyQuantity::*;
        match self {
            DipoleVector => values.dipole[2],
            DipoleMagnitude => values.dipole_norm,
            Polarizability => values.alpha[2][2],
            IsotropicPolarizability => values.alpha_isotropic,
            AnisotropicPolarizability => values.alpha_anisotropy,
            FirstHyperpolarizability => values.beta[2][2],
            FirstHyperpolarizabilityVector => values.beta_vector,
            SecondHyperpolarizability => values.gamma[2][2],
            SecondHyperpolarizabilityIsotropic => values.gamma_isotropic,
        }
    }
}

/// 单个标签下的全部性质（原子单位，标量均为由张量导出的值）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PropertyValues {
    pub dipole: Vector3,
    pub dipole_norm: f64,
    pub alpha: Tensor3,
    pub alpha_isotropic: f64,
    pub alpha_anisotropy: f64,
    pub beta: Tensor3,
    pub beta_vector: f64,
    pub gamma: Tensor3,
    pub gamma_isotropic: f64,
}

impl PropertyValues {
    pub fn dipole_norm_of(mu: &Vector3) -> f64 {
        mu.iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    pub fn isotropic_alpha_of(alpha: &Tensor3) -> f64 {
        (alpha[0][0] + alpha[1][1] + alpha[2][2]) / 3.0
    }

    /// Z 为转动轴
    pub fn alpha_anisotropy_of(alpha: &Tensor3) -> f64 {
        alpha[2][2] - alpha[0][0]
    }

    /// 3/5 × 第 z 列之和（Z 为永久偶极方向）
    pub fn beta_vector_of(beta: &Tensor3) -> f64 {
        0.6 * (beta[0][2] + beta[1][2] + beta[2][2])
    }

    pub fn isotropic_gamma_of(gamma: &Tensor3) -> f64 {
        let trace = gamma[0][0] + gamma[1][1] + gamma[2][2];
        (trace + 2.0 * (gamma[0][1] + gamma[1][2] + gamma[0][2])) / 5.0
    }
}

/// 一个文件的四类性质
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySet {
    pub total: HashMap<TermLabel, PropertyValues>,
    pub interaction: HashMap<TermLabel, PropertyValues>,
    pub sum_interaction: HashMap<TermLabel, PropertyValues>,
    pub excess: HashMap<TermLabel, PropertyValues>,
}

impl PropertySet {
    pub fn category(&self, category: PropertyCategory) -> &HashMap<TermLabel, PropertyValues> {
        match category {
            PropertyCategory::Total => &self.total,
            PropertyCategory::Interaction => &self.interaction,
            PropertyCategory::SumInteraction => &self.sum_interaction,
            PropertyCategory::Excess => &self.excess,
        }
    }

    pub fn category_mut(
        &mut self,
        category: PropertyCategory,
    ) -> &mut HashMap<TermLabel, PropertyValues> {
        match category {
            PropertyCategory::Total => &mut self.total,
            PropertyCategory::Interaction => &mut self.interaction,
            PropertyCategory::SumInteraction => &mut self.sum_interaction,
            PropertyCategory::Excess => &mut self.excess,
        }
    }

    pub fn value(
        &self,
        category: PropertyCategory,
        label: &TermLabel,
        quantity: PropertyQuantity,
    ) -> Option<f64> {
        self.category(category)
            .get(label)
            .map(|values| quantity.select(values))
    }
}
