mod cli;

use std::fs;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;

use cx::config::Config;
use cx::{Transformer, logging};

use crate::cli::Cli;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_with_level(cli.log_level.as_deref());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cx: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> cx::Result<()> {
    let config = Config::from_project_toml(&cli.config)?;
    let transformer = Transformer::new(cli.transform_options(config));

    let source = match &cli.input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let result = if cli.shallow {
        transformer.run_shallow(&source)?
    } else {
        transformer.run(&source)?
    };

    let name = cli
        .input
        .as_ref()
        .map_or_else(|| "<stdin>".to_string(), |p| p.display().to_string());
    for diagnostic in &result.diagnostics {
        eprintln!("{}: {}", name, diagnostic);
    }

    // Output is only written once the whole run succeeded
    match &cli.output {
        Some(path) => fs::write(path, &result.output)?,
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(result.output.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
