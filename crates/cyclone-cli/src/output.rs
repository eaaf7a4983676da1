//! Terminal output formatting.

use std::collections::HashMap;

use colored::Colorize;
use cyclone_redis::HashField;
use unicode_width::UnicodeWidthStr;

/// Print a single value, `(nil)` when absent.
pub fn print_value(value: Option<&str>) {
    match value {
        Some(v) => println!("{}", v),
        None => println!("{}", "(nil)".dimmed()),
    }
}

pub fn print_count(count: usize) {
    println!("{}", count.to_string().cyan());
}

pub fn print_bool(value: bool) {
    if value {
        println!("{}", "true".green());
    } else {
        println!("{}", "false".yellow());
    }
}

pub fn print_ok() {
    println!("{}", "OK".green());
}

/// Print a list numbered from 1, the way redis-cli does.
pub fn print_list(items: &[String]) {
    if items.is_empty() {
        println!("{}", "(empty)".dimmed());
        return;
    }
    let width = items.len().to_string().len();
    for (i, item) in items.iter().enumerate() {
        println!("{:>width$}) {}", i + 1, item, width = width);
    }
}

pub fn print_optional_list(items: &[Option<String>]) {
    if items.is_empty() {
        println!("{}", "(empty)".dimmed());
        return;
    }
    let width = items.len().to_string().len();
    for (i, item) in items.iter().enumerate() {
        match item {
            Some(v) => println!("{:>width$}) {}", i + 1, v, width = width),
            None => println!("{:>width$}) {}", i + 1, "(nil)".dimmed(), width = width),
        }
    }
}

/// Print a hash as two aligned columns, sorted by field.
pub fn print_map(map: &HashMap<String, String>) {
    if map.is_empty() {
        println!("{}", "(empty)".dimmed());
        return;
    }
    let mut fields: Vec<_> = map.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let key_width = fields
        .iter()
        .map(|(k, _)| UnicodeWidthStr::width(k.as_str()))
        .max()
        .unwrap_or(0);
    let value_width = term_width().saturating_sub(key_width + 2).max(8);

    for (key, value) in fields {
        println!(
            "{}  {}",
            pad_right(key, key_width).bold(),
            truncate_visual(value, value_width)
        );
    }
}

pub fn print_field(field: &HashField) {
    println!("{} {}", field.key.bold(), field.value);
}

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}
