//! Inspection commands: dependency order and version actuality.

use std::path::Path;

use anyhow::{bail, Result};
use owo_colors::OwoColorize;
use pkgchain_core::{accepts_range, is_actual};

use crate::formatting::{
    print_actuality_table, print_key_value, print_order_table, print_section_header,
    print_success, print_warning, ActualityRow,
};

use super::Session;

pub fn cmd_order(cwd: &Path, json: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let graph = session.workspace.ordered_graph()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&graph)?);
        return Ok(());
    }

    print_section_header("Dependency Order");
    if graph.is_empty() {
        print_warning("No packages found");
        println!();
        return Ok(());
    }

    print_order_table(&graph);
    let cyclic: Vec<&str> = graph
        .cycle_members()
        .map(|node| node.symbolic_name.as_str())
        .collect();
    if !cyclic.is_empty() {
        println!();
        print_warning(&format!("Dependency cycle between: {}", cyclic.join(", ")));
    }
    println!();
    Ok(())
}

pub fn cmd_check(cwd: &Path, force_exact: bool, json: bool) -> Result<()> {
    let session = Session::open(cwd)?;
    let workspace = &session.workspace;
    let graph = workspace.ordered_graph()?;
    let project = workspace.manifest(cwd)?;
    let states = workspace.dependency_states(&project, &graph)?;

    let mut rows = Vec::with_capacity(states.len());
    for state in &states {
        rows.push(ActualityRow {
            name: state.name.clone(),
            declared: project.declared_range(&state.name).unwrap_or_default().to_string(),
            actual: state.actual_version.clone(),
            relaxed: accepts_range(&project, state, force_exact),
            actual_ok: is_actual(&project, state, force_exact)?,
        });
    }
    let stale: Vec<&str> = rows
        .iter()
        .filter(|row| !row.actual_ok)
        .map(|row| row.name.as_str())
        .collect();

    if json {
        let report = serde_json::json!({
            "package": project.name,
            "all_actual": stale.is_empty(),
            "stale_names": stale,
            "dependencies": states,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_section_header("Dependency Actuality");
        print_key_value("Package", &project.name);
        println!();
        if rows.is_empty() {
            print_success("No configured packages are used here");
        } else {
            print_actuality_table(&rows);
            println!();
            if stale.is_empty() {
                print_success("All dependencies are actual");
            } else {
                print_warning(&format!("Stale: {}", stale.join(", ").bold()));
            }
        }
        println!();
    }

    if !stale.is_empty() {
        bail!("{} stale dependencies in {}", stale.len(), project.name);
    }
    Ok(())
}
