#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

mod commands;
mod logging;

use clap::Parser;
use distfix_core::paths::project_root;
use distfix_core::Config;
use miette::Result;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "distfix")]
#[command(author, version, about = "Rewrite and check import specifiers in compiled package output", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v for DEBUG, -vv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON formatted output (stable, machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Override the working directory
    #[arg(long, global = true, value_name = "PATH")]
    cwd: Option<PathBuf>,

    /// Compiler output directory, relative to the project root
    #[arg(long, global = true, value_name = "DIR", env = "DISTFIX_OUT_DIR")]
    out_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Print version information
    Version,

    /// Rewrite import specifiers in the output directory
    Transform {
        /// Rerun whenever the output directory changes
        #[arg(long)]
        watch: bool,
    },

    /// Compile the project with tsc, then transform its output
    Compile {
        /// Rerun whenever the sources or tsconfig.json change
        #[arg(long)]
        watch: bool,
    },

    /// Delete the output directory
    Clean,

    /// Bundle the type declarations into <out-dir>/index.d.ts with tsc
    Declare {
        /// Hand over to tsc's own watch mode
        #[arg(long)]
        watch: bool,
    },

    /// Clean, then compile and transform, ready for publishing
    Prepare,
}

/// Resolve the project root from `--cwd` or the process directory.
///
/// An explicit `--cwd` is taken as is. Otherwise the nearest ancestor
/// holding a `package.json` wins, so the tool can run from a subdirectory.
fn resolve_cwd(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return dunce::canonicalize(&path).unwrap_or(path);
    }

    let current = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let current = dunce::canonicalize(&current).unwrap_or(current);
    project_root(&current).unwrap_or(current)
}

fn watch_conflicts_with_json(command: Option<&Commands>, json: bool) -> bool {
    json && matches!(
        command,
        Some(
            Commands::Transform { watch: true }
                | Commands::Compile { watch: true }
                | Commands::Declare { watch: true }
        )
    )
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --watch streams many results; --json promises exactly one object
    if watch_conflicts_with_json(cli.command.as_ref(), cli.json) {
        eprintln!("error: --watch and --json cannot be combined");
        eprintln!("hint: --json requires exactly one output object; watch mode streams multiple results");
        std::process::exit(2);
    }

    let cwd = resolve_cwd(cli.cwd);

    let mut config = Config::new(cwd.clone())
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.json);
    if let Some(out_dir) = cli.out_dir {
        config = config.with_out_dir(out_dir);
    }

    logging::init(config.verbosity, config.json_logs);

    match cli.command {
        Some(Commands::Version) | None => commands::version::run(cli.json),
        Some(Commands::Transform { watch }) => {
            let span = tracing::info_span!("transform", cmd = "transform", cwd = %cwd.display());
            let _guard = span.enter();
            commands::transform::run(&config, cli.json, watch)
        }
        Some(Commands::Compile { watch }) => {
            let span = tracing::info_span!("compile", cmd = "compile", cwd = %cwd.display());
            let _guard = span.enter();
            commands::compile::run(&config, cli.json, watch)
        }
        Some(Commands::Clean) => commands::clean::run(&config, cli.json),
        Some(Commands::Declare { watch }) => commands::declare::run(&config, cli.json, watch),
        Some(Commands::Prepare) => {
            let span = tracing::info_span!("prepare", cmd = "prepare", cwd = %cwd.display());
            let _guard = span.enter();
            commands::prepare::run(&config, cli.json)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "distfix", "transform", "--json", "--cwd", "/tmp/pkg", "--out-dir", "build", "-vv",
        ])
        .unwrap();

        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.cwd, Some(PathBuf::from("/tmp/pkg")));
        assert_eq!(cli.out_dir, Some(PathBuf::from("build")));
        assert!(matches!(cli.command, Some(Commands::Transform { watch: false })));
    }

    #[test]
    fn test_watch_json_conflict() {
        let cli = Cli::try_parse_from(["distfix", "compile", "--watch", "--json"]).unwrap();
        assert!(watch_conflicts_with_json(cli.command.as_ref(), cli.json));

        let cli = Cli::try_parse_from(["distfix", "transform", "--json"]).unwrap();
        assert!(!watch_conflicts_with_json(cli.command.as_ref(), cli.json));

        let cli = Cli::try_parse_from(["distfix", "transform", "--watch"]).unwrap();
        assert!(!watch_conflicts_with_json(cli.command.as_ref(), cli.json));

        let cli = Cli::try_parse_from(["distfix", "declare", "--watch", "--json"]).unwrap();
        assert!(watch_conflicts_with_json(cli.command.as_ref(), cli.json));
    }

    #[test]
    fn test_publish_commands_parse() {
        let cli = Cli::try_parse_from(["distfix", "declare"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Declare { watch: false })));

        let cli = Cli::try_parse_from(["distfix", "prepare", "--out-dir", "lib"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Prepare)));
        assert_eq!(cli.out_dir, Some(PathBuf::from("lib")));

        assert!(Cli::try_parse_from(["distfix", "prepare", "--watch"]).is_err());
    }

    #[test]
    fn test_resolve_cwd_explicit_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let resolved = resolve_cwd(Some(dir.path().to_path_buf()));
        assert_eq!(resolved, dunce::canonicalize(dir.path()).unwrap());
    }
}
