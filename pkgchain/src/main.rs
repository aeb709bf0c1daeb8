mod commands;
mod formatting;
mod reporter;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pkgchain_core::BumpType;
use tracing::Level;

use crate::formatting::print_error;

#[derive(Parser)]
#[command(name = "pkgchain")]
#[command(about = "Link, build and publish chains of interdependent local packages")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory to run in instead of the current one.
    #[arg(long, global = true)]
    cwd: Option<PathBuf>,

    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long, global = true, action)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print configured packages in dependency order.
    #[command(visible_alias = "graph")]
    Order {
        #[arg(long, action)]
        json: bool,
    },
    /// Check whether this project's configured dependencies are up to date.
    Check {
        /// Require exact versions even for exempt or cyclic dependencies.
        #[arg(long, action)]
        exact: bool,
        #[arg(long, action)]
        json: bool,
    },
    /// Globally link configured packages used by this project.
    Link,
    #[command(visible_alias = "linkr")]
    LinkRecursive,
    Unlink,
    /// Install the latest published versions of configured packages.
    #[command(visible_alias = "il")]
    InstallLatest {
        #[arg(long, action)]
        link: bool,
        /// Apply to every package.json below the directory.
        #[arg(short, long, action)]
        recursive: bool,
    },
    /// Install latest and link afterwards.
    #[command(name = "ill", hide = true)]
    InstallLatestLink,
    #[command(visible_alias = "buildr")]
    Build,
    #[command(visible_alias = "typesr")]
    Types,
    #[command(visible_alias = "lintr")]
    Lint {
        #[arg(long, action)]
        fix: bool,
    },
    #[command(name = "lintfixr", hide = true)]
    LintFix,
    #[command(visible_alias = "testr")]
    Test,
    /// Run any script in every ordered package that declares it.
    #[command(visible_alias = "runr")]
    Run {
        script: String,
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Build, bump, push and publish this package.
    #[command(visible_alias = "bbpp")]
    Publish {
        #[arg(long, value_enum, default_value = "patch")]
        bump: BumpArg,
    },
    /// Commit everything, then build, bump, push and publish.
    #[command(visible_alias = "cbbpp")]
    CommitPublish {
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Refresh, commit and publish every configured package in order.
    #[command(visible_aliases = ["cbbppr", "boom"])]
    PublishAll {
        /// Commit with a fixed message instead of prompting.
        #[arg(long, action)]
        small_fix: bool,
    },
    #[command(name = "csfbbppr", hide = true)]
    PublishAllSmallFix,
    /// Pull every configured package, cloning the missing ones.
    #[command(visible_alias = "pocr")]
    Sync,
    /// Point peer dependencies of linked packages at this project's copies.
    FixLink {
        #[arg(short, long, action)]
        recursive: bool,
    },
    /// Run every `watch` script at once.
    Watch,
    /// Open the config files in $EDITOR.
    Edit,
    Ping,
}

#[derive(clap::ValueEnum, Clone, Copy)]
enum BumpArg {
    Major,
    Minor,
    Patch,
}

impl From<BumpArg> for BumpType {
    fn from(arg: BumpArg) -> Self {
        match arg {
            BumpArg::Major => BumpType::Major,
            BumpArg::Minor => BumpType::Minor,
            BumpArg::Patch => BumpType::Patch,
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let cwd = commands::resolve_cwd(cli.cwd)?;
    let cwd = cwd.as_path();

    match cli.command {
        Commands::Order { json } => commands::cmd_order(cwd, json)?,
        Commands::Check { exact, json } => commands::cmd_check(cwd, exact, json)?,
        Commands::Link => commands::cmd_link(cwd)?,
        Commands::LinkRecursive => commands::cmd_link_recursive(cwd)?,
        Commands::Unlink => commands::cmd_unlink(cwd)?,
        Commands::InstallLatest { link, recursive } => {
            commands::cmd_install_latest(cwd, link, recursive)?
        }
        Commands::InstallLatestLink => commands::cmd_install_latest(cwd, true, false)?,
        Commands::Build => commands::cmd_run_recursive(cwd, "Build", "build", &[])?,
        Commands::Types => commands::cmd_run_recursive(cwd, "Types", "types", &[])?,
        Commands::Lint { fix: false } => commands::cmd_run_recursive(cwd, "Lint", "lint", &[])?,
        Commands::Lint { fix: true } | Commands::LintFix => {
            commands::cmd_run_recursive(cwd, "Lint Fix", "lint", &["--fix".to_string()])?
        }
        Commands::Test => commands::cmd_run_recursive(cwd, "Test", "test", &[])?,
        Commands::Run { script, args } => {
            commands::cmd_run_recursive(cwd, &format!("Run {}", script), &script, &args)?
        }
        Commands::Publish { bump } => commands::cmd_publish(cwd, bump.into())?,
        Commands::CommitPublish { message } => commands::cmd_commit_publish(cwd, message)?,
        Commands::PublishAll { small_fix } => commands::cmd_publish_all(cwd, small_fix)?,
        Commands::PublishAllSmallFix => commands::cmd_publish_all(cwd, true)?,
        Commands::Sync => commands::cmd_sync(cwd)?,
        Commands::FixLink { recursive } => commands::cmd_fix_link(cwd, recursive)?,
        Commands::Watch => commands::cmd_watch(cwd)?,
        Commands::Edit => commands::cmd_edit(cwd)?,
        Commands::Ping => commands::cmd_ping(cwd)?,
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run(cli) {
        print_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}
