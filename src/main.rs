mod catalog;
mod config;
mod error;
mod orbit;
mod shield;
mod visibility;
mod web;

#[cfg(test)]
mod test_support;

use clap::{Parser, Subcommand};
use std::process::ExitCode;

use crate::catalog::CatalogLoader;
use crate::config::Config;

#[derive(Parser)]
#[command(name = "sat-shield")]
#[command(about = "Overhead satellite visibility and privacy shield service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP service
    Serve {
        #[arg(short, long, default_value = "config.yaml")]
        config: String,
    },
    /// Check a config file and load its catalog once
    Validate {
        #[arg(short, long, default_value = "config.yaml")]
        config: String,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => serve(&config),
        Commands::Validate { config } => validate(&config),
    }
}

fn load_config(path: &str) -> Option<Config> {
    match Config::from_file(path) {
        Ok(config) => Some(config),
        Err(e) => {
            eprintln!("Error loading {}: {}", path, e);
            None
        }
    }
}

fn serve(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(web::run_server(config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn validate(path: &str) -> ExitCode {
    let Some(config) = load_config(path) else {
        return ExitCode::FAILURE;
    };

    let loader = CatalogLoader::new(config.catalog.catalog_file, config.catalog.tle_folder);
    match loader.load() {
        Ok(snapshot) => {
            println!("Config is valid ({} catalog objects)", snapshot.len());
            for entry in snapshot.entries() {
                let object = &entry.object;
                println!(
                    "  {}: {} [{}] i={:.1} P={:.1}min",
                    object.id,
                    object.name,
                    object.category,
                    object.orbit.inclination_deg,
                    object.orbit.period_minutes
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Catalog error: {}", e);
            ExitCode::FAILURE
        }
    }
}
