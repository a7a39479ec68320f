//! retrofit - word vector retrofitting CLI
//!
//! Pulls words that share a lexicon group towards each other in a
//! pre-trained vector space.
//!
//! # Usage
//!
//! ```bash
//! # Mine a category lexicon from a Wikipedia dump
//! retrofit lexicon --dump jawiki-pages-articles.xml.bz2 --vectors vectors.txt -o categories.txt
//!
//! # Retrofit the vectors to it (10 passes)
//! retrofit run -i vectors.txt -l categories.txt -o retrofitted.txt -n 10
//!
//! # Shell completions
//! retrofit completions zsh
//! ```

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use retrofit::cli::commands;
use retrofit::cli::output::{format_error, init_logging};
use retrofit::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result: Result<(), String> = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::Lexicon(args) => commands::lexicon::run(args),
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "retrofit", &mut io::stdout());
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", format_error("retrofit", &e));
            ExitCode::FAILURE
        }
    }
}
