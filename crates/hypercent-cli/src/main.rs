#![forbid(unsafe_code)]

mod cmd;
mod output;
mod writer;

use clap::{Parser, Subcommand};
use hypercent_core::timing::{self, TimingReport};
use output::OutputMode;
use std::{env, io};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "hcent: betweenness, closeness, harmonic, degree and PageRank over graphs and hypergraphs",
    long_about = None
)]
struct Cli {
    /// Enable debug logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit stage timing report to stderr.
    #[arg(long, global = true)]
    timing: bool,

    /// Output format (defaults to pretty on a TTY, text when piped).
    #[arg(long, value_enum, global = true)]
    format: Option<OutputMode>,

    /// Shorthand for `--format json`.
    #[arg(long, global = true, hide = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        about = "Compute centrality for every configured dataset",
        after_help = "EXAMPLES:\n    # Run datasets from ./hypercent.toml or ./dataset_init.txt\n    hcent run\n\n    # One-off hypergraph, betweenness only, 8 workers\n    hcent run --hypergraph corum.hypergraph --measure betweenness --threads 8"
    )]
    Run(cmd::run::RunArgs),

    #[command(
        about = "Show structural statistics for one input file",
        after_help = "EXAMPLES:\n    hcent stats corum.hypergraph --representation hypergraph"
    )]
    Stats(cmd::stats::StatsArgs),
}

/// Logs go to stderr. `HYPERCENT_LOG` takes an `EnvFilter` directive;
/// `HYPERCENT_LOG_FORMAT=json` switches to one JSON object per event.
fn init_tracing(verbose: bool) {
    let default = if verbose || env::var_os("DEBUG").is_some() {
        "hypercent=debug,hcent=debug,info"
    } else {
        "hypercent=info,hcent=info,warn"
    };
    let filter =
        EnvFilter::try_from_env("HYPERCENT_LOG").unwrap_or_else(|_| EnvFilter::new(default));

    let json = env::var("HYPERCENT_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let (json_layer, compact_layer) = if json {
        let layer = fmt::layer().json().with_ansi(false).with_writer(io::stderr);
        (Some(layer), None)
    } else {
        (None, Some(fmt::layer().compact().with_writer(io::stderr)))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(json_layer)
        .with(compact_layer)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let timing_on = cli.timing || timing::enabled_from_env();
    timing::enable(timing_on);

    let cwd = env::current_dir()?;
    let output = OutputMode::resolve(cli.format, cli.json);
    debug!(?output, cwd = %cwd.display(), "starting");

    let command_result = match &cli.command {
        Commands::Run(args) => timing::timed("cmd.run", || cmd::run::run_run(args, output, &cwd)),
        Commands::Stats(args) => {
            timing::timed("cmd.stats", || cmd::stats::run_stats(args, output, &cwd))
        }
    };

    if timing_on {
        print_timing(&timing::take_report())?;
    }

    command_result
}

/// Stage table, then the same numbers as JSON, on stderr.
fn print_timing(report: &TimingReport) -> anyhow::Result<()> {
    if report.is_empty() {
        eprintln!("timing report: no samples recorded");
        return Ok(());
    }
    eprint!("timing report:\n{report}");
    eprintln!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hypercent_metrics::Measure;

    #[test]
    fn timing_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["hcent", "run", "--timing"]);
        assert!(cli.timing);
        assert!(matches!(cli.command, Commands::Run(_)));
    }

    #[test]
    fn json_flag_and_format_parse_globally() {
        let cli = Cli::parse_from(["hcent", "--json", "stats", "x.graph", "--representation", "graph"]);
        assert!(cli.json);
        let cli = Cli::parse_from(["hcent", "run", "--format", "text"]);
        assert_eq!(cli.format, Some(OutputMode::Text));
    }

    #[test]
    fn run_collects_repeated_measures() {
        let cli = Cli::parse_from([
            "hcent",
            "run",
            "--measure",
            "betweenness",
            "--measure",
            "harmonic",
            "--representation",
            "hypergraph",
            "--threads",
            "4",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.measures, vec![Measure::Betweenness, Measure::Harmonic]);
        assert_eq!(args.representation, cmd::run::RepresentationArg::Hypergraph);
        assert_eq!(args.threads, Some(4));
    }

    #[test]
    fn unknown_measure_is_rejected() {
        assert!(Cli::try_parse_from(["hcent", "run", "--measure", "eigenvector"]).is_err());
    }

    #[test]
    fn stats_requires_representation() {
        assert!(Cli::try_parse_from(["hcent", "stats", "x.graph"]).is_err());
    }

    #[test]
    fn verbose_is_global() {
        let cli = Cli::parse_from(["hcent", "stats", "-v", "x", "--representation", "hypergraph"]);
        assert!(cli.verbose);
    }
}
