use std::path::Path;
use std::time::Instant;

use anyhow::Result;

use crate::formatting::{print_section_header, print_summary_box};

use super::Session;

/// Runs `script` across the ordered packages.
pub fn cmd_run_recursive(cwd: &Path, title: &str, script: &str, args: &[String]) -> Result<()> {
    let session = Session::open(cwd)?;
    print_section_header(title);

    let start = Instant::now();
    let ran = session.workspace.run_script_recursive(script, args)?;
    let elapsed = start.elapsed().as_secs_f64();

    println!();
    print_summary_box(
        title,
        &[
            ("Script", script.to_string()),
            ("Packages", ran.len().to_string()),
            ("Duration", format_duration(elapsed)),
        ],
    );
    Ok(())
}

fn format_duration(seconds: f64) -> String {
    if seconds < 1.0 {
        format!("{:.0}ms", seconds * 1000.0)
    } else if seconds < 60.0 {
        format!("{:.2}s", seconds)
    } else {
        format!("{}m {:.1}s", (seconds / 60.0) as u64, seconds % 60.0)
    }
}
