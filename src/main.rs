use clap::Parser;
use miette::Result;
use tilex::cli::{Cli, Commands};
use tilex::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Tileset(args) => tilex::cli::tileset::run(args, &printer)?,
        Commands::Map(args) => tilex::cli::map::run(args, &printer)?,
        Commands::Build(args) => tilex::cli::build::run(args, &printer)?,
        Commands::Validate(args) => tilex::cli::validate::run(args, &printer)?,
        Commands::Init(args) => tilex::cli::init::run(args, &printer)?,
        Commands::Completions(args) => tilex::cli::completions::run(args)?,
    }

    Ok(())
}
