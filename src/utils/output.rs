//! # 美化输出工具
//!
//! 提供统一的终端输出样式，并作为 `log` 的后端把解析器的
//! 诊断信息以同样的样式打印到 stderr。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块与 `main.rs` 使用
//! - 使用 `colored` crate, `log` crate

use colored::{ColoredString, Colorize};
use log::{Level, LevelFilter, Log, Metadata, Record};

/// 打印成功消息
pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印跳过消息
pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

/// `-v` 次数对应的日志级别
pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn tag(level: Level) -> ColoredString {
    match level {
        Level::Error => "[ERR]".red().bold(),
        Level::Warn => "[WARN]".yellow().bold(),
        Level::Info => "[*]".blue().bold(),
        Level::Debug => "[DBG]".dimmed(),
        Level::Trace => "[TRC]".dimmed(),
    }
}

/// 终端日志后端
pub struct TerminalLogger {
    level: LevelFilter,
}

impl Log for TerminalLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if record.level() >= Level::Debug {
            eprintln!(
                "{} {} {}",
                tag(record.level()),
                record.target().dimmed(),
                record.args()
            );
        } else {
            eprintln!("{} {}", tag(record.level()), record.args());
        }
    }

    fn flush(&self) {}
}

/// 安装终端日志后端，重复调用时保留第一次的设置
pub fn init_logger(verbosity: u8) {
    let level = level_for(verbosity);
    if log::set_boxed_logger(Box::new(TerminalLogger { level })).is_ok() {
        log::set_max_level(level);
    }
}
