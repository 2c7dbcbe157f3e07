//! Command-line front end for metric-graph file conversion.
//!
//! Thin layer over the library's load/save surface; all graph semantics
//! live in `rwegraph`.

use anyhow::Result;
use clap::{Parser, Subcommand};
use rwegraph::MetricGraph;

#[derive(Parser)]
#[command(name = "rwegraph", version, about = "Metric-graph file tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a GEXF interchange file to the RWEG binary format.
    Gexf2rweg {
        /// Input file, with or without the .gexf extension.
        input: String,
        /// Output name; defaults to the input name with the .rweg extension.
        output: Option<String>,
        /// Overwrite an existing output file instead of picking a numbered
        /// name.
        #[arg(short, long)]
        force: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match Cli::parse().command {
        Command::Gexf2rweg {
            input,
            output,
            force,
        } => {
            let base = input.strip_suffix(".gexf").unwrap_or(&input);
            let mut graph = MetricGraph::new();
            rwegraph::gexf::load(&mut graph, base)?;
            let target = rwegraph::rweg::save(&graph, output.as_deref().unwrap_or(base), force)?;
            println!("{}", target.display());
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::Cli;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
