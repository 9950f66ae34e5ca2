use colored::*;
use tracing::info;

use mcastmap_common::log::PRINT_TARGET;

use crate::terminal::colors;

pub const TOTAL_WIDTH: usize = 64;

#[macro_export]
macro_rules! mprint {
    () => {
        $crate::terminal::print::print("");
    };
    ($msg:expr) => {
        $crate::terminal::print::print($msg);
    };
}

pub fn print(msg: &str) {
    info!(target: PRINT_TARGET, raw_msg = msg);
}

pub fn banner(no_banner: bool, q_level: u8) {
    if no_banner || q_level > 0 {
        return;
    }

    let text: String = format!("⟦ MCASTMAP v{} ⟧ ", env!("CARGO_PKG_VERSION"));
    let (left, right) = padding(&text);
    let output: String = format!(
        "{}{}{}",
        "═".repeat(left).bright_black(),
        text.bright_green().bold(),
        "═".repeat(right).bright_black()
    );
    print(&output);
}

pub fn header(msg: &str, q_level: u8) {
    if q_level > 0 {
        return;
    }

    let title: String = format!("⟦ {} ⟧", msg.to_uppercase());
    let (left, right) = padding(&title);
    let line: ColoredString =
        format!("{}{}{}", "─".repeat(left), title.bright_green(), "─".repeat(right)).bright_black();
    print(&line.to_string());
}

pub fn fat_separator() {
    print(&"═".repeat(TOTAL_WIDTH).bright_black().to_string());
}

pub fn tree_head(idx: usize, name: &str, note: ColoredString) {
    let idx_str: String = format!("[{}]", idx.to_string().color(colors::ACCENT));
    let output: String = format!(
        "{} {} {}",
        idx_str.color(colors::SEPARATOR),
        name.color(colors::PRIMARY),
        note
    );
    print(&output);
}

/// Prints `(key, value)` pairs as the branches of one tree level.
pub fn as_tree_one_level(key_value_pair: &[(String, ColoredString)]) {
    let key_width: usize = key_value_pair
        .iter()
        .map(|(key, _)| key.chars().count())
        .max()
        .unwrap_or(0);

    for (i, (key, value)) in key_value_pair.iter().enumerate() {
        let last: bool = i + 1 == key_value_pair.len();
        let branch: ColoredString = if !last {
            "├─".bright_black()
        } else {
            "└─".bright_black()
        };
        let dots: String = ".".repeat(key_width + 1 - key.chars().count());
        let output: String = format!(
            " {} {}{}{} {}",
            branch,
            key.color(colors::TEXT_DEFAULT),
            dots.color(colors::SEPARATOR),
            ":".color(colors::SEPARATOR),
            value
        );
        print(&output);
    }
}

pub fn centerln(msg: &str) {
    let (left, right) = padding(msg);
    print(&format!("{}{}{}", " ".repeat(left), msg, " ".repeat(right)));
}

/// Columns left and right of `msg` when centred in `TOTAL_WIDTH`.
/// Colour codes do not count.
fn padding(msg: &str) -> (usize, usize) {
    let free: usize = TOTAL_WIDTH.saturating_sub(console::measure_text_width(msg));
    (free / 2, free - free / 2)
}

pub fn no_results(msg: &str) {
    centerln(&format!("{}", msg.red().bold()));
}
