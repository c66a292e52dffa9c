#![deny(missing_docs)]

//! # pgplain CLI
//!
//! Command line front end for the extraction + substitution + injection
//! pipeline.
//!
//! Supported Commands:
//! - `pgtype`: emit the plain scalar vocabulary and the `Params` artifact.
//! - `rows`: emit the `Row` artifact with plain scalar field types.
//! - `ts`: replace the mirrored type-alias region in the TypeScript client.
//! - `all`: run every configured task in order.

use clap::{Parser, Subcommand};

use crate::error::CliResult;
use crate::run::TaskArgs;

mod error;
mod run;

#[derive(Parser, Debug)]
#[clap(author, version, about = "sqlc output de-wrapper")]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Emit db/pgtype.go and the extracted Params package.
    Pgtype(TaskArgs),
    /// Emit the extracted Row package with plain scalar types.
    Rows(TaskArgs),
    /// Replace the pgtype namespace inside the generated TypeScript client.
    Ts(TaskArgs),
    /// Run every configured task.
    All(TaskArgs),
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Pgtype(args) => run::execute("pgtype", args)?,
        Commands::Rows(args) => run::execute("rows", args)?,
        Commands::Ts(args) => run::execute("ts", args)?,
        Commands::All(args) => run::execute_all(args)?,
    }

    Ok(())
}
