use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use square_control::config::AnalysisConfig;
use square_control::protocol::Session;

/// Reads commands on stdin and answers square-control queries on stdout.
#[derive(Parser, Debug)]
#[command(name = "square_control_cli", version)]
struct Cli {
    /// JSON file with analysis flags, e.g. {"capture_simulation": false}
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log position and option changes to stderr and echo them as `info string` replies
    #[arg(long)]
    debug: bool,
}

fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "warn"
    }
}

/// `RUST_LOG` wins when set; otherwise `--debug` opens up library events.
fn log_filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive(debug)))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.debug))
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => AnalysisConfig::default(),
    };

    let mut session = Session::new(config);
    session.set_debug(cli.debug);
    session.run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_flag_raises_default_level() {
        assert_eq!(default_directive(true), "debug");
        assert_eq!(default_directive(false), "warn");

        let cli = Cli::parse_from(["square_control_cli", "--debug"]);
        assert!(cli.debug);
        assert!(cli.config.is_none());
    }
}
