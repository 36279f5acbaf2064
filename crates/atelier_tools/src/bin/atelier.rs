#![forbid(unsafe_code)]

use std::env;

use atelier_adapter::config::AdapterConfig;
use atelier_adapter::{Journal, StudioRuntime};
use atelier_tools::studio_cli::{execute_studio_command, USAGE};

fn main() {
    if let Err(err) = run() {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

fn run() -> Result<(), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    let subcommand = args.first().ok_or_else(|| USAGE.to_string())?.as_str();
    let arg = args.get(1).map(String::as_str);

    let config = AdapterConfig::from_env();
    let runtime = if config.store_path.exists() {
        let journal = Journal::open(&config.store_path).map_err(|e| e.to_string())?;
        StudioRuntime::new_with_journal(journal).map_err(|e| e.to_string())?
    } else {
        StudioRuntime::default()
    };

    let output = execute_studio_command(&runtime, subcommand, arg)?;
    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
