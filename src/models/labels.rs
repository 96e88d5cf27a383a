//! # 标签与有序标签集
//!
//! 能量/性质分量标签 (`TermLabel`)、子体系编号 (`ClusterId`)，
//! 以及跨文件合并时决定渲染顺序的有序标签集。
//!
//! ## 合并规则
//! 每个类别独立比较：新文件的标签集严格更长时取而代之，否则沿用已有顺序。
//! 因此最终顺序来自（按处理顺序）第一个达到最大长度的文件。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `tables/` 使用
//! - 使用 `models/field.rs`

use super::field::FieldVector;
use std::fmt;

/// 相关能第二遍读取的后缀
pub const CORR_SUFFIX: &str = "(CORR)";
/// 多体分解/外场能量项的后缀
pub const MNB_SUFFIX: &str = "(MNB)";

/// 能量或性质分量标签
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TermLabel(String);

impl TermLabel {
    pub fn new(label: impl Into<String>) -> Self {
        TermLabel(label.into())
    }

    /// 追加后缀（空后缀原样返回）
    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.0.push_str(suffix);
        self
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 子体系表中显示的标签（去掉 `(CORR)`）
    pub fn subsystem_display(&self) -> String {
        self.0.replace(CORR_SUFFIX, "")
    }

    /// 多体/外场表中显示的标签（去掉 `(MNB)` 与空格）
    pub fn many_body_display(&self) -> String {
        self.0.replace(MNB_SUFFIX, "").replace(' ', "")
    }
}

impl fmt::Display for TermLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// 子体系（簇）编号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(pub u32);

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 插入有序、按成员判重的集合
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedSet<T> {
    items: Vec<T>,
}

impl<T> Default for OrderedSet<T> {
    fn default() -> Self {
        OrderedSet { items: Vec::new() }
    }
}

impl<T: PartialEq> OrderedSet<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加新元素；已存在时返回 false 且不改变顺序
    pub fn insert(&mut self, item: T) -> bool {
        if self.items.contains(&item) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: PartialEq> FromIterator<T> for OrderedSet<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut set = OrderedSet::new();
        for item in iter {
            set.insert(item);
        }
        set
    }
}

/// 有序标签集
pub type OrderedLabelSet = OrderedSet<TermLabel>;

/// 单个文件解析出的各类别标签集
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunLabels {
    pub subsystem: OrderedLabelSet,
    pub many_body: OrderedLabelSet,
    pub fields: OrderedSet<FieldVector>,
    pub total_property: OrderedLabelSet,
    pub interaction_property: OrderedLabelSet,
    pub sum_property: OrderedLabelSet,
    pub excess_property: OrderedLabelSet,
}

/// 跨文件的规范标签顺序
#[derive(Debug, Clone, Default)]
pub struct LabelRegistry {
    canonical: RunLabels,
}

/// 较长者胜出；长度相同保留已有顺序
fn keep_longest<T: PartialEq + Clone>(current: &mut OrderedSet<T>, candidate: &OrderedSet<T>) {
    if candidate.len() > current.len() {
        *current = candidate.clone();
    }
}

impl LabelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 按文件处理顺序合并一个文件的标签集
    pub fn merge(&mut self, run: &RunLabels) {
        let c = &mut self.canonical;
        keep_longest(&mut c.subsystem, &run.subsystem);
        keep_longest(&mut c.many_body, &run.many_body);
        keep_longest(&mut c.fields, &run.fields);
        keep_longest(&mut c.total_property, &run.total_property);
        keep_longest(&mut c.interaction_property, &run.interaction_property);
        keep_longest(&mut c.sum_property, &run.sum_property);
        keep_longest(&mut c.excess_property, &run.excess_property);
    }

    pub fn labels(&self) -> &RunLabels {
        &self.canonical
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(names: &[&str]) -> OrderedLabelSet {
        names.iter().map(|n| TermLabel::new(*n)).collect()
    }

    #[test]
    fn test_ordered_set_rejects_duplicates() {
        let mut set = OrderedLabelSet::new();
        assert!(set.insert(TermLabel::new("DE(HF)")));
        assert!(set.insert(TermLabel::new("DE(EL,HF)")));
        assert!(!set.insert(TermLabel::new("DE(HF)")));
        assert_eq!(set.len(), 2);
        assert_eq!(set.as_slice()[0].as_str(), "DE(HF)");
    }

    #[test]
    fn test_longest_set_wins() {
        let run_a = RunLabels {
            subsystem: labels(&["A", "B", "C"]),
            ..Default::default()
        };
        let run_b = RunLabels {
            subsystem: labels(&["E", "C", "A", "D", "B"]),
            ..Default::default()
        };

        let mut registry = LabelRegistry::new();
        registry.merge(&run_a);
        assert_eq!(registry.labels().subsystem, run_a.subsystem);
        registry.merge(&run_b);
        assert_eq!(registry.labels().subsystem, run_b.subsystem);

        // 更短的文件不再改变顺序
        registry.merge(&run_a);
        assert_eq!(registry.labels().subsystem, run_b.subsystem);
    }

    #[test]
    fn test_tie_keeps_earlier_order() {
        let first = RunLabels {
            many_body: labels(&["X(MNB)", "Y(MNB)"]),
            ..Default::default()
        };
        let second = RunLabels {
            many_body: labels(&["Y(MNB)", "X(MNB)"]),
            ..Default::default()
        };
        let mut registry = LabelRegistry::new();
        registry.merge(&first);
        registry.merge(&second);
        assert_eq!(registry.labels().many_body, first.many_body);
    }

    #[test]
    fn test_display_variants() {
        let corr = TermLabel::new("DE(HF)").with_suffix(CORR_SUFFIX);
        assert_eq!(corr.as_str(), "DE(HF)(CORR)");
        assert_eq!(corr.subsystem_display(), "DE(HF)");

        let mnb = TermLabel::new("E PL(HF)").with_suffix(MNB_SUFFIX);
        assert_eq!(mnb.many_body_display(), "EPL(HF)");
    }
}
