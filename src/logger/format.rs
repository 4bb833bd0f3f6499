//! Log formatting and output
//!
//! Colored console line plus a plain line for the log file. Multi-line
//! messages are split so every line in the file carries the full prefix.

use super::config::ConsoleTarget;
use super::file::write_to_file;
use super::levels::LogLevel;
use super::tags::LogTag;
use chrono::Local;
use colored::*;
use std::io::{stderr, stdout, ErrorKind, Write};

const TAG_WIDTH: usize = 10;
const LEVEL_WIDTH: usize = 7;

pub fn format_and_log(tag: &LogTag, level: LogLevel, message: &str, console: ConsoleTarget) {
    let now = Local::now();
    let time = now.format("%H:%M:%S").to_string().dimmed();
    let timestamp = now.format("%Y-%m-%d %H:%M:%S").to_string();
    let tag_str = format_tag(tag);
    let level_str = format_level(level);
    let tag_plain = tag.to_plain_string();

    let continuation = " ".repeat(9 + TAG_WIDTH + LEVEL_WIDTH + 6);
    for (idx, line) in message.split('\n').enumerate() {
        if idx == 0 {
            print_console_safe(console, &format!("{} [{}] [{}] {}", time, tag_str, level_str, line));
        } else {
            print_console_safe(console, &format!("{}{}", continuation, line));
        }
        write_to_file(&format!(
            "{} [{}] [{}] {}",
            timestamp,
            tag_plain,
            level.as_str(),
            line
        ));
    }
}

fn format_tag(tag: &LogTag) -> ColoredString {
    let label = format!("{:<width$}", tag.to_plain_string(), width = TAG_WIDTH);
    match tag {
        LogTag::System => label.bright_yellow().bold(),
        LogTag::Config => label.bright_white().bold(),
        LogTag::Database => label.bright_blue().bold(),
        LogTag::Devices => label.bright_cyan().bold(),
        LogTag::Import => label.bright_magenta().bold(),
        LogTag::Webserver => label.bright_green().bold(),
        LogTag::Test => label.blue().bold(),
        LogTag::Other(_) => label.white().bold(),
    }
}

fn format_level(level: LogLevel) -> ColoredString {
    let label = format!("{:<width$}", level.as_str(), width = LEVEL_WIDTH);
    match level {
        LogLevel::Error => label.bright_red().bold(),
        LogLevel::Warning => label.bright_yellow().bold(),
        LogLevel::Info => label.white().bold(),
        LogLevel::Debug | LogLevel::Verbose => label.dimmed(),
    }
}

/// Print a console line but ignore broken pipe errors
fn print_console_safe(console: ConsoleTarget, message: &str) {
    let result = match console {
        ConsoleTarget::Stdout => {
            let mut out = stdout().lock();
            writeln!(out, "{}", message).and_then(|_| out.flush())
        }
        ConsoleTarget::Stderr => writeln!(stderr().lock(), "{}", message),
    };

    if let Err(e) = result {
        if e.kind() == ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        let _ = writeln!(stderr(), "Logger console error: {}", e);
    }
}
