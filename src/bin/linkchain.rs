#![forbid(unsafe_code)]
//! Command-line driver for LinkChain: view, extend, save and verify a chain file.

use clap::{Parser, Subcommand};
use colored::*;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use linkchain::blockchain::{Blockchain, LoadOutcome};
use linkchain::cli::{chain_table, describe_load_outcome, load_blockchain_from_config};
use linkchain::config::{load_config, load_config_from, Config};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (default: ./config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Chain file to use instead of storage.path from the configuration
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Prints every block in the chain
    Show,
    /// Appends a block with the given data and saves the chain
    Add {
        /// Payload for the new block
        data: String,
    },
    /// Recomputes every hash and checks the links between blocks
    Verify,
    /// Interactive menu (the default)
    Menu,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };
    if let Some(file) = &cli.file {
        config.storage.path = file.display().to_string();
    }
    if let Some(level) = &cli.log_level {
        config.logging.level = level.clone();
    }

    tracing_subscriber::fmt()
        .with_max_level(config.logging.max_level()?)
        .with_writer(io::stderr)
        .init();

    let (mut chain, outcome) = load_blockchain_from_config(&config);
    if !outcome.is_loaded() {
        println!(
            "{}",
            describe_load_outcome(&outcome, &config.storage.path).yellow()
        );
    }

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Show => show(&chain),
        Commands::Add { data } => {
            let block = chain.append(data)?;
            println!(
                "{} #{} {}",
                "Added block".bright_green(),
                block.index(),
                block.hash().bright_white()
            );
            chain.save(&config.storage.path)?;
            println!("Chain saved to {}", config.storage.path.bright_cyan());
        }
        Commands::Verify => verify(&chain)?,
        Commands::Menu => menu(&mut chain, &config, &outcome)?,
    }

    Ok(())
}

fn show(chain: &Blockchain) {
    println!("{}", "Current chain:".bright_cyan().bold());
    println!("{}", chain_table(chain.blocks()));
}

fn verify(chain: &Blockchain) -> Result<(), Box<dyn std::error::Error>> {
    match chain.verify() {
        Ok(()) => {
            println!(
                "{} {} blocks, all hashes and links check out",
                "✔".bright_green(),
                chain.len()
            );
            Ok(())
        }
        Err(e) => {
            println!("{} {}", "✘".red().bold(), e.to_string().red());
            Err(e.into())
        }
    }
}

fn menu(
    chain: &mut Blockchain,
    config: &Config,
    outcome: &LoadOutcome,
) -> Result<(), Box<dyn std::error::Error>> {
    if outcome.is_loaded() {
        println!(
            "{}",
            describe_load_outcome(outcome, &config.storage.path).bright_green()
        );
    }

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!();
        println!("{}", "Menu:".bright_cyan().underline());
        println!("  1. View the chain");
        println!("  2. Add a new block");
        println!("  3. Save the chain to {}", config.storage.path);
        println!("  4. Exit");
        print!("Choose an option: ");
        io::stdout().flush()?;

        let Some(choice) = lines.next().transpose()? else {
            break;
        };

        match choice.trim() {
            "1" => show(chain),
            "2" => {
                print!("Data for the new block: ");
                io::stdout().flush()?;
                let Some(data) = lines.next().transpose()? else {
                    break;
                };
                chain.append(data)?;
                println!("{}", "New block added!".bright_green());
            }
            "3" => match chain.save(&config.storage.path) {
                Ok(()) => println!("Chain saved to {}", config.storage.path.bright_cyan()),
                Err(e) => println!("{} {}", "Save failed:".red().bold(), e),
            },
            "4" => {
                println!("Exiting...");
                break;
            }
            _ => println!("{}", "Invalid option. Try again.".yellow()),
        }
    }

    Ok(())
}
