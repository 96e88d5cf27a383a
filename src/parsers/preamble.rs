//! # 日志前导部分读取
//!
//! 依次定位运行标题、`CONTRL OPTIONS` 中的 `MPLEVL=` 行、`BODY COMPLEX`
//! 行与 `FFEDS =` 行，得到决定后续提取流程的元数据。
//!
//! ## 依赖关系
//! - 被 `parsers/mod.rs` 调用
//! - 使用 `parsers/cursor.rs`, `models/run.rs`

use super::cursor::Cursor;
use crate::error::Result;
use crate::models::run::{display_name, CorrelationLevel, RunRecord};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

/// 按非数字字符切分行（首段在行首为非数字时为空串）
pub fn digit_fields(line: &str) -> Vec<&str> {
    static NON_DIGITS: OnceLock<Regex> = OnceLock::new();
    NON_DIGITS
        .get_or_init(|| Regex::new(r"\D+").expect("static regex"))
        .split(line)
        .collect()
}

/// 读取前导部分，游标停在 `FFEDS =` 行之后
pub fn read_preamble(cursor: &mut Cursor, path: &Path) -> Result<RunRecord> {
    cursor.require("RUN TITLE")?;
    let title = cursor.skip(2).trim().to_string();

    cursor.require("CONTRL OPTIONS")?;
    let line = cursor.require("MPLEVL= ")?;
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let mp_level = tokens
        .get(1)
        .and_then(|t| t.parse::<u32>().ok())
        .ok_or_else(|| cursor.malformed("MPLEVL", &line))?;
    let cc_keyword = tokens
        .get(5)
        .map(|t| t.chars().skip(1).collect::<String>())
        .unwrap_or_default();

    let line = cursor.require("BODY COMPLEX")?;
    let counts = digit_fields(&line);
    let parse_count = |index: usize| counts.get(index).and_then(|t| t.parse::<usize>().ok());
    let (subsystems, monomers) = match (parse_count(1), parse_count(2)) {
        (Some(s), Some(m)) => (s, m),
        _ => return Err(cursor.malformed("BODY COMPLEX", &line)),
    };

    let line = cursor.require("FFEDS =")?;
    let finite_field = line.split_whitespace().nth(11) == Some("T");

    Ok(RunRecord {
        path: path.to_path_buf(),
        name: display_name(path),
        title,
        monomers,
        subsystems,
        correlation: CorrelationLevel::from_keywords(mp_level, &cc_keyword),
        many_body: subsystems > 3,
        finite_field,
    })
}
