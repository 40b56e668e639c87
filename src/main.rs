use clap::Parser;
use lostfound_explorer::cli::Args;
use lostfound_explorer::commands;
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(async {
        tokio::select! {
            result = commands::run(args) => result,
            signal = tokio::signal::ctrl_c() => {
                match signal {
                    Ok(()) => eprintln!("\nReceived CTRL+C, shutting down..."),
                    Err(e) => eprintln!("Failed to listen for CTRL+C: {}", e),
                }
                Ok(())
            }
        }
    });

    if let Err(error) = result {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("Lost & Found Station Explorer");
    println!("=============================");
    println!();
    println!("Aggregate railway lost-and-found records by station and explore");
    println!("them as a station map with selection-driven statistics.");
    println!();
    println!("USAGE:");
    println!("    lostfound-explorer --dataset <PATH> <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    summary     Statistics and map over the whole dataset");
    println!("    select      Statistics and map for one station");
    println!("    stations    Stations ranked by record count");
    println!("    session     Interactive JSON-lines selection session on stdin/stdout");
    println!();
    println!("EXAMPLES:");
    println!("    lostfound-explorer --dataset objets-trouves-restitution.csv summary");
    println!("    lostfound-explorer -d objets.csv select \"Paris Gare de Lyon\" --format json");
    println!("    echo '{{\"selectedStation\": \"Rennes\"}}' | lostfound-explorer -d objets.csv session");
    println!();
    println!("The dataset path may also be set with LOSTFOUND_DATASET.");
}
