//! # 终端消息
//!
//! 报告流程中的状态行统一为 `[标签] 消息` 的形式。
//! 错误与日志一致性警告写到 stderr，其余写到 stdout；
//! 多行消息的后续行缩进到标签之后对齐。
//!
//! ## 依赖关系
//! - 被 `commands/` 模块和 `main.rs` 使用
//! - 使用 `colored` crate

use colored::{Color, ColoredString, Colorize};

/// 标题栏与分隔线的宽度
const RULE_WIDTH: usize = 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Level {
    Saved,
    Failed,
    Warning,
    Info,
    Skipped,
    Done,
    Debug,
}

impl Level {
    fn tag(self) -> &'static str {
        match self {
            Level::Saved => "[OK]",
            Level::Failed => "[ERR]",
            Level::Warning => "[WARN]",
            Level::Info => "[*]",
            Level::Skipped => "[SKIP]",
            Level::Done => "[DONE]",
            Level::Debug => "[DBG]",
        }
    }

    fn styled_tag(self) -> ColoredString {
        let tag = self.tag();
        match self {
            Level::Saved | Level::Done => tag.color(Color::Green).bold(),
            Level::Failed => tag.color(Color::Red).bold(),
            Level::Warning => tag.color(Color::Yellow).bold(),
            Level::Info => tag.color(Color::Blue).bold(),
            Level::Skipped => tag.dimmed(),
            Level::Debug => tag.color(Color::Magenta),
        }
    }

    fn to_stderr(self) -> bool {
        matches!(self, Level::Failed | Level::Warning)
    }
}

/// 组装一条状态行
fn status_line(level: Level, msg: &str) -> String {
    let indent = format!("\n{}", " ".repeat(level.tag().len() + 1));
    let body = msg.trim_end().replace('\n', &indent);
    let body = if level == Level::Debug {
        body.dimmed().to_string()
    } else {
        body
    };
    format!("{} {}", level.styled_tag(), body)
}

fn emit(level: Level, msg: &str) {
    let line = status_line(level, msg);
    if level.to_stderr() {
        eprintln!("{}", line);
    } else {
        println!("{}", line);
    }
}

/// 写出文件等成功完成的步骤
pub fn print_success(msg: &str) {
    emit(Level::Saved, msg);
}

pub fn print_error(msg: &str) {
    emit(Level::Failed, msg);
}

/// 日志一致性警告、无匹配文件等不中断流程的问题
pub fn print_warning(msg: &str) {
    emit(Level::Warning, msg);
}

pub fn print_info(msg: &str) {
    emit(Level::Info, msg);
}

/// 解析失败而被跳过的日志文件
pub fn print_skip(msg: &str) {
    emit(Level::Skipped, msg);
}

pub fn print_done(msg: &str) {
    emit(Level::Done, msg);
}

/// `--debug` 时的解析细节
pub fn print_debug(msg: &str) {
    emit(Level::Debug, msg);
}

/// `── 标题 ` 与补足到 `RULE_WIDTH` 的横线
fn header_parts(title: &str) -> (String, String) {
    let lead = format!("── {} ", title);
    let rest = RULE_WIDTH.saturating_sub(lead.chars().count());
    (lead, "─".repeat(rest))
}

/// 报告各阶段的标题栏
pub fn print_header(title: &str) {
    let (lead, rest) = header_parts(title);
    println!("\n{}{}", lead.bold(), rest.dimmed());
}

pub fn print_separator() {
    println!("{}", "─".repeat(RULE_WIDTH).dimmed());
}
