use owo_colors::OwoColorize;

/// Prints a bracketed section title followed by a blank line.
pub fn print_section_header(title: &str) {
    println!("{}", format!("[{}]", title).cyan().bold());
    println!();
}
