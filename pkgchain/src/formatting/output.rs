use owo_colors::OwoColorize;

/// Prints a boxed block of key/value lines.
pub fn print_summary_box(title: &str, items: &[(&str, String)]) {
    let separator = "─".repeat(50);
    println!("┌─ {} {}", title.cyan().bold(), separator.bright_black());
    for (key, value) in items {
        println!("│ {} {}", key.bright_black().bold(), value.bold().white());
    }
    println!("└{}", "─".repeat(60).bright_black());
}

pub fn print_key_value(key: &str, value: &str) {
    println!("  {} {}", key.bright_black().bold(), value.bold().white());
}
