//! # 单位换算与数值格式
//!
//! 能量与电性质在渲染时才从原子单位换算，每种单位给出换算因子、
//! 数值格式、舍入位数与最小列宽。
//!
//! | 单位 | 因子 | 格式 | 最小列宽 |
//! |------|------|------|----------|
//! | kcal | 627.509541 | `.3f` | 14 |
//! | kj   | 627.509541 × 4.184 | `.3f` | 14 |
//! | mev  | 27211.3845 | `.3f` | 14 |
//! | mh   | 1000 | `.3f` | 14 |
//! | au   | 1 | `.12e` | 23 |
//!
//! 科学计数法采用 C 风格的指数（`-1.234500000000e-02`）。
//!
//! ## 依赖关系
//! - 被 `render/` 使用
//! - 使用 `config.rs`, `models/property.rs`

use crate::config::{EnergyUnit, PropertyUnit};
use crate::models::property::PropertyGroup;

/// 数值格式（小数位数）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    Fixed(usize),
    Scientific(usize),
}

/// 某一物理量在选定单位下的换算与输出规则
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitSpec {
    pub factor: f64,
    pub format: NumberFormat,
    /// 换算后舍入的小数位数（科学计数法不舍入）
    pub rounding: Option<i32>,
    pub min_width: usize,
}

impl UnitSpec {
    const fn fixed(factor: f64, decimals: usize, min_width: usize) -> Self {
        UnitSpec {
            factor,
            format: NumberFormat::Fixed(decimals),
            rounding: Some(decimals as i32),
            min_width,
        }
    }

    const fn scientific(factor: f64, decimals: usize, min_width: usize) -> Self {
        UnitSpec {
            factor,
            format: NumberFormat::Scientific(decimals),
            rounding: None,
            min_width,
        }
    }

    /// 原子单位 → 目标单位（含舍入）
    pub fn convert(&self, value: f64) -> f64 {
        let converted = value * self.factor;
        match self.rounding {
            Some(decimals) => round_to(converted, decimals),
            None => converted,
        }
    }

    /// 换算并格式化（不补齐宽度）
    pub fn format(&self, value: f64) -> String {
        let converted = self.convert(value);
        match self.format {
            NumberFormat::Fixed(decimals) => format!("{:.*}", decimals, converted),
            NumberFormat::Scientific(decimals) => format_scientific(converted, decimals),
        }
    }
}

impl EnergyUnit {
    pub fn spec(&self) -> UnitSpec {
        const HARTREE_TO_KCAL: f64 = 627.509541;
        match self {
            EnergyUnit::Kcal => UnitSpec::fixed(HARTREE_TO_KCAL, 3, 14),
            EnergyUnit::Kj => UnitSpec::fixed(HARTREE_TO_KCAL * 4.184, 3, 14),
            EnergyUnit::Mev => UnitSpec::fixed(27211.3845, 3, 14),
            EnergyUnit::Mh => UnitSpec::fixed(1.0e3, 3, 14),
            EnergyUnit::Au => UnitSpec::scientific(1.0, 12, 23),
        }
    }
}

/// 电性质的最小列宽
pub const PROPERTY_MIN_WIDTH: usize = 10;

impl PropertyUnit {
    /// 偶极、极化率、一阶与二阶超极化率的换算因子
    pub fn factors(&self) -> [f64; 4] {
        match self {
            PropertyUnit::Au => [1.0, 1.0, 1.0, 1.0],
            PropertyUnit::Mau => [1.0e3, 1.0e3, 1.0e3, 1.0e3],
            PropertyUnit::Si => [8.478358e-30, 1.648778e-41, 3.206361e-53, 6.235377e-65],
            PropertyUnit::Asi => [8.4784e-30, 1.8621e-30, 3.6213e-42, 7.0423e-54],
            PropertyUnit::Esu => [2.5418e-18, 1.4817e-25, 8.6392e-33, 5.0367e-40],
        }
    }

    pub fn spec(&self, group: PropertyGroup) -> UnitSpec {
        let index = match group {
            PropertyGroup::Dipole => 0,
            PropertyGroup::Polarizability => 1,
            PropertyGroup::FirstHyperpolarizability => 2,
            PropertyGroup::SecondHyperpolarizability => 3,
        };
        let factor = self.factors()[index];
        match self {
            PropertyUnit::Au => {
                let decimals = [4, 3, 2, 1][index];
                UnitSpec::fixed(factor, decimals, PROPERTY_MIN_WIDTH)
            }
            PropertyUnit::Mau => UnitSpec::fixed(factor, 1, PROPERTY_MIN_WIDTH),
            PropertyUnit::Si => UnitSpec::scientific(factor, 5, PROPERTY_MIN_WIDTH),
            PropertyUnit::Asi | PropertyUnit::Esu => {
                UnitSpec::scientific(factor, 4, PROPERTY_MIN_WIDTH)
            }
        }
    }
}

/// 四舍五入到指定小数位
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    let rounded = (value * scale).round() / scale;
    if rounded.is_finite() {
        rounded
    } else {
        value
    }
}

/// C 风格科学计数法：指数带符号且至少两位
pub fn format_scientific(value: f64, decimals: usize) -> String {
    let raw = format!("{:.*e}", decimals, value);
    match raw.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{}e{}{:02}", mantissa, sign, exponent.abs())
        }
        None => raw,
    }
}
