//! # LaTeX 辅助
//!
//! 能量/性质分量标签转为数学模式，以及 `tabular` 环境的首尾行。
//!
//! ```text
//! DE(HF)        → $\Delta E^{\rm HF}$
//! E(EL,HF)      → $\epsilon_{\rm EL}^{\rm HF}$
//! E(DEL(HF))    → $\epsilon^{\rm DEL(HF)}$
//! ```
//!
//! ## 依赖关系
//! - 被 `render/mod.rs` 使用

use crate::models::labels::{CORR_SUFFIX, MNB_SUFFIX};
use regex::Regex;
use std::sync::OnceLock;

pub const ROW_END: &str = "\\\\";
pub const TABULAR_END: &str = "\\end{tabular}\\\\";

struct LabelPatterns {
    nested: Regex,
    simple: Regex,
    pair: Regex,
}

fn patterns() -> &'static LabelPatterns {
    static PATTERNS: OnceLock<LabelPatterns> = OnceLock::new();
    PATTERNS.get_or_init(|| LabelPatterns {
        nested: Regex::new(r"[A-Z]+\((\w+|\w-\w+)\(\w+\)\)").expect("static regex"),
        simple: Regex::new(r"[A-Z]+\(\w+\)").expect("static regex"),
        pair: Regex::new(r"[A-Z]+\(\w+,\w+\)").expect("static regex"),
    })
}

fn symbol(prefix: &str) -> &str {
    match prefix {
        "E" | "G" => "\\epsilon",
        "DE" | "DG" => "\\Delta E",
        other => other,
    }
}

/// 分量标签 → `$…$` 数学模式
pub fn tex_label(label: &str) -> String {
    let label = label.replace(CORR_SUFFIX, "").replace(MNB_SUFFIX, "");
    let parts: Vec<&str> = label.split(['(', ')']).collect();
    let part = |i: usize| parts.get(i).copied().unwrap_or_default();
    let p = patterns();

    let body = if p.nested.is_match(&label) {
        format!("{}^{{\\rm {}({})}}", symbol(part(0)), part(1), part(2))
    } else if p.simple.is_match(&label) {
        format!("{}^{{\\rm {}}}", symbol(part(0)), part(1))
    } else if p.pair.is_match(&label) {
        let (lower, upper) = part(1).split_once(',').unwrap_or((part(1), ""));
        format!("{}_{{\\rm {}}}^{{\\rm {}}}", symbol(part(0)), lower, upper)
    } else {
        label.clone()
    };
    format!("${}$", body)
}

/// `tabular` 环境首行：一列左对齐标签加 `columns` 列右对齐数值
pub fn tabular_begin(columns: usize) -> String {
    format!(
        "\\begin{{tabular}}{{@{{\\extracolsep{{\\fill}}}}l{}}}\\hline{}",
        " r".repeat(columns),
        ROW_END
    )
}
