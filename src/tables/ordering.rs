//! # 排序规则
//!
//! - 外场：依次以 Y、Z、X 单轴比较函数做三次稳定排序（最后一次起主导作用）
//! - 文件：默认按显示名字典序；`--sort float` 时比较名字中嵌入的小数
//!
//! 外场比较函数不构成全序，不能交给标准库的排序（可能 panic 或结果依赖实现）。
//! 这里使用固定比较序列的稳定排序：先识别开头的有序段（严格降序段就地翻转），
//! 再对剩余元素做二分插入，结果只由比较函数决定。
//!
//! ## 依赖关系
//! - 被 `tables/` 使用
//! - 使用 `models/field.rs`

use crate::config::SortMode;
use crate::models::field::{compare_x, compare_y, compare_z, FieldVector};
use crate::models::ParsedRun;
use regex::Regex;
use std::cmp::Ordering;
use std::sync::OnceLock;

/// 稳定排序，比较函数不必满足全序
pub fn stable_sort_by<T, F>(items: &mut [T], mut compare: F)
where
    F: FnMut(&T, &T) -> Ordering,
{
    let n = items.len();
    if n < 2 {
        return;
    }

    let mut run = 2;
    if compare(&items[1], &items[0]) == Ordering::Less {
        while run < n && compare(&items[run], &items[run - 1]) == Ordering::Less {
            run += 1;
        }
        items[..run].reverse();
    } else {
        while run < n && compare(&items[run], &items[run - 1]) != Ordering::Less {
            run += 1;
        }
    }

    for start in run..n {
        let (mut left, mut right) = (0, start);
        while left < right {
            let mid = left + (right - left) / 2;
            if compare(&items[start], &items[mid]) == Ordering::Less {
                right = mid;
            } else {
                left = mid + 1;
            }
        }
        items[left..=start].rotate_right(1);
    }
}

/// 外场排序：Y → Z → X
pub fn sort_fields(fields: &mut [FieldVector]) {
    stable_sort_by(fields, compare_y);
    stable_sort_by(fields, compare_z);
    stable_sort_by(fields, compare_x);
}

fn decimals(name: &str) -> Vec<f64> {
    static DECIMAL: OnceLock<Regex> = OnceLock::new();
    DECIMAL
        .get_or_init(|| Regex::new(r"\d+\.\d+").expect("static regex"))
        .find_iter(name)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// 按名字中嵌入的小数比较；任一方没有小数时退回字典序
pub fn compare_names_float(a: &str, b: &str) -> Ordering {
    let (x, y) = (decimals(a), decimals(b));
    if x.is_empty() || y.is_empty() {
        return a.cmp(b);
    }
    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
}

/// 按排序模式对解析结果排序
pub fn sort_runs(runs: &mut [&ParsedRun], mode: SortMode) {
    match mode {
        SortMode::Lexical => stable_sort_by(runs, |a, b| a.name().cmp(b.name())),
        SortMode::Float => stable_sort_by(runs, |a, b| compare_names_float(a.name(), b.name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(values: &[(f64, f64, f64)]) -> Vec<FieldVector> {
        values
            .iter()
            .map(|&(x, y, z)| FieldVector::new(x, y, z))
            .collect()
    }

    #[test]
    fn test_stable_sort_total_order() {
        let mut items = vec![(3, 'a'), (1, 'b'), (2, 'c'), (1, 'd'), (3, 'e'), (0, 'f')];
        stable_sort_by(&mut items, |a, b| a.0.cmp(&b.0));
        assert_eq!(
            items,
            vec![(0, 'f'), (1, 'b'), (1, 'd'), (2, 'c'), (3, 'a'), (3, 'e')]
        );

        let mut descending = vec![5, 4, 3, 2, 1];
        stable_sort_by(&mut descending, |a, b| a.cmp(b));
        assert_eq!(descending, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_zero_field_first() {
        let expected = fields(&[(0.0, 0.0, 0.0), (0.0, 1.0, 0.0), (1.0, 0.0, 0.0), (-1.0, 0.0, 0.0)]);

        let mut a = fields(&[(0.0, 0.0, 0.0), (1.0, 0.0, 0.0), (-1.0, 0.0, 0.0), (0.0, 1.0, 0.0)]);
        sort_fields(&mut a);
        assert_eq!(a, expected);

        let mut b = fields(&[(0.0, 1.0, 0.0), (-1.0, 0.0, 0.0), (1.0, 0.0, 0.0), (0.0, 0.0, 0.0)]);
        sort_fields(&mut b);
        assert_eq!(b, expected);
    }

    #[test]
    fn test_field_order_golden() {
        let mut set = fields(&[
            (1.0, 0.0, 0.0),
            (0.0, 0.0, -1.0),
            (-1.0, 0.0, 0.0),
            (0.0, 0.0, 0.0),
            (0.0, 1.0, 0.0),
        ]);
        sort_fields(&mut set);
        assert_eq!(
            set,
            fields(&[
                (0.0, 0.0, 0.0),
                (0.0, 0.0, -1.0),
                (0.0, 1.0, 0.0),
                (1.0, 0.0, 0.0),
                (-1.0, 0.0, 0.0),
            ])
        );
    }

    #[test]
    fn test_finite_field_stencil_order() {
        let mut set = fields(&[
            (0.001, 0.0, 0.0),
            (-0.001, 0.0, 0.0),
            (0.0, 0.001, 0.0),
            (0.0, -0.001, 0.0),
            (0.0, 0.0, 0.002),
            (0.0, 0.0, -0.002),
            (0.002, 0.0, 0.0),
            (-0.002, 0.0, 0.0),
            (0.0, 0.0, 0.0),
            (0.0, 0.0, 0.001),
            (0.0, 0.0, -0.001),
        ]);
        sort_fields(&mut set);
        assert_eq!(
            set,
            fields(&[
                (0.0, 0.0, 0.0),
                (0.0, 0.0, 0.002),
                (0.0, 0.0, 0.001),
                (0.0, 0.0, -0.002),
                (0.0, 0.0, -0.001),
                (0.0, 0.001, 0.0),
                (0.0, -0.001, 0.0),
                (0.002, 0.0, 0.0),
                (0.001, 0.0, 0.0),
                (-0.002, 0.0, 0.0),
                (-0.001, 0.0, 0.0),
            ])
        );
    }

    #[test]
    fn test_float_name_order() {
        let mut names = vec!["h2o_10.0", "h2o_2.5", "h2o_2.25", "plain", "h2o_1.0"];
        stable_sort_by(&mut names, |a, b| compare_names_float(a, b));
        assert_eq!(names, vec!["h2o_1.0", "h2o_2.25", "h2o_2.5", "h2o_10.0", "plain"]);

        assert_eq!(compare_names_float("b", "a_1.5"), Ordering::Greater);
        assert_eq!(compare_names_float("r_1.5_2.0", "r_1.5_1.0"), Ordering::Greater);
    }
}
