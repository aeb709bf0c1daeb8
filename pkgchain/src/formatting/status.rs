//! Status symbols and one-line messages.

use owo_colors::OwoColorize;

#[derive(Debug, Clone, Copy)]
pub enum Status {
    Success,
    Error,
    Warning,
    Info,
}

impl Status {
    pub fn symbol(&self) -> &'static str {
        match self {
            Status::Success => "✓",
            Status::Error => "✗",
            Status::Warning => "⚠",
            Status::Info => "→",
        }
    }

    fn colored_symbol(&self) -> String {
        match self {
            Status::Success => self.symbol().green().to_string(),
            Status::Error => self.symbol().red().to_string(),
            Status::Warning => self.symbol().yellow().to_string(),
            Status::Info => self.symbol().cyan().to_string(),
        }
    }

    /// Symbol plus colored text. Only the first line of `message` is colored.
    pub fn format(&self, message: &str) -> String {
        let (head, rest) = match message.split_once('\n') {
            Some((head, rest)) => (head, Some(rest)),
            None => (message, None),
        };
        let head = match self {
            Status::Success => head.green().bold().to_string(),
            Status::Error => head.red().bold().to_string(),
            Status::Warning => head.yellow().bold().to_string(),
            Status::Info => head.cyan().to_string(),
        };
        match rest {
            Some(rest) => format!("{} {}\n{}", self.colored_symbol(), head, rest.bright_black()),
            None => format!("{} {}", self.colored_symbol(), head),
        }
    }
}

pub fn print_success(message: &str) {
    println!("  {}", Status::Success.format(message));
}

pub fn print_error(message: &str) {
    eprintln!("  {}", Status::Error.format(message));
}

pub fn print_warning(message: &str) {
    println!("  {}", Status::Warning.format(message));
}

pub fn print_info(message: &str) {
    println!("  {}", Status::Info.format(message));
}
