//! # 数据模型模块
//!
//! 定义日志解析结果、标签集与对比表的数据模型。
//!
//! ## 依赖关系
//! - 被 `parsers/`, `tables/`, `render/` 和 `commands/` 使用
//! - 子模块: field, labels, energy, property, run, table

pub mod energy;
pub mod field;
pub mod labels;
pub mod property;
pub mod run;
pub mod table;

pub use field::FieldVector;
pub use labels::{ClusterId, LabelRegistry, RunLabels, TermLabel};
pub use property::{PropertyCategory, PropertyQuantity};
pub use run::{ParsedRun, TotalEnergies, TotalLevel};
pub use table::{Cell, ComparisonTable, TermAxis, ValueKind};
