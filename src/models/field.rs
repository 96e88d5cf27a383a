//! # 外加电场向量
//!
//! 有限场计算中的外加电场 (Fx, Fy, Fz)，以及三个单轴比较函数。
//!
//! ## 排序规则
//! 三个比较函数各自只看一个分量，按 Y → Z → X 依次做稳定排序，
//! 最后一次 (X) 为主键。它们并不构成全序（零向量只在左操作数位置被识别），
//! 因此只交给 `tables::ordering::stable_sort_by` 使用。
//!
//! ## 依赖关系
//! - 被 `parsers/energy.rs`, `parsers/total.rs`, `tables/` 使用

use std::cmp::Ordering;
use std::fmt;

/// 外加电场向量（原子单位）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldVector(pub [f64; 3]);

impl FieldVector {
    /// 无外场基准
    pub const ZERO: FieldVector = FieldVector([0.0, 0.0, 0.0]);

    pub fn new(x: f64, y: f64, z: f64) -> Self {
        FieldVector([x, y, z])
    }

    pub fn x(&self) -> f64 {
        self.0[0]
    }

    pub fn y(&self) -> f64 {
        self.0[1]
    }

    pub fn z(&self) -> f64 {
        self.0[2]
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|c| *c == 0.0)
    }

    /// 从 "APPLIED FIELD" 行末尾三个数解析
    pub fn from_marker_line(line: &str) -> Option<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 3 {
            return None;
        }
        let tail = &tokens[tokens.len() - 3..];
        Some(FieldVector::new(
            parse_fortran_float(tail[0])?,
            parse_fortran_float(tail[1])?,
            parse_fortran_float(tail[2])?,
        ))
    }
}

impl fmt::Display for FieldVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:7.4}, {:7.4}, {:7.4}", self.0[0], self.0[1], self.0[2])
    }
}

/// 解析浮点数，兼容 Fortran 的 `D` 指数
pub fn parse_fortran_float(token: &str) -> Option<f64> {
    token
        .parse::<f64>()
        .ok()
        .or_else(|| token.replace(['D', 'd'], "E").parse::<f64>().ok())
}

/// 单分量比较：零分量在前；两负数时绝对值大的在前，否则大值在前。
/// `descending = false` 时两种情况均反转（Z 轴）。
fn compare_component(a: f64, b: f64, descending: bool) -> Ordering {
    if a == 0.0 {
        return Ordering::Less;
    }
    if b == 0.0 {
        return Ordering::Greater;
    }
    let natural = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
    let order = if a < 0.0 && b < 0.0 {
        natural
    } else {
        natural.reverse()
    };
    if descending {
        order
    } else {
        order.reverse()
    }
}

/// X 轴比较函数（左操作数为零向量时恒为 Less）
pub fn compare_x(a: &FieldVector, b: &FieldVector) -> Ordering {
    if a.is_zero() {
        return Ordering::Less;
    }
    compare_component(a.x(), b.x(), true)
}

/// Y 轴比较函数（左操作数为零向量时为 Equal）
pub fn compare_y(a: &FieldVector, b: &FieldVector) -> Ordering {
    if a.is_zero() {
        return Ordering::Equal;
    }
    compare_component(a.y(), b.y(), true)
}

/// Z 轴比较函数（符号约定与 X/Y 相反）
pub fn compare_z(a: &FieldVector, b: &FieldVector) -> Ordering {
    if a.is_zero() {
        return Ordering::Equal;
    }
    compare_component(a.z(), b.z(), false)
}
