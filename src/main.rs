//! # geds - GAMESS EDS 日志汇总工具
//!
//! 从 GAMESS 能量分解 (EDS) 计算日志中提取相互作用能分量、
//! 多体/外场能量与诱导电性质，按文件对齐成对比表输出。
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── commands/   (报告生成流程)
//!   │     ├── batch/     (文件收集与并行解析)
//!   │     ├── parsers/   (日志解析器)
//!   │     ├── tables/    (对比表汇总)
//!   │     ├── render/    (txt/csv/tex 渲染)
//!   │     └── models/    (数据模型)
//!   ├── config.rs   (运行配置)
//!   ├── units.rs    (单位换算)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod config;
mod error;
mod models;
mod parsers;
mod render;
mod tables;
mod units;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
