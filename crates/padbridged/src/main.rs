mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use crossbeam_channel::bounded;

use padbridge_config::default_config_path;
use padbridge_gamepad::ControllerType;
use padbridged::{logging, mapping_yaml, print_error, print_info, probe, run_bridge, run_remap};

use crate::cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(e) = logging::setup(cli.verbose, cli.no_color) {
        eprintln!("unable to set up logger: {e}");
        return ExitCode::FAILURE;
    }

    let config_path = match cli.config {
        Some(path) => PathBuf::from(path),
        None => match default_config_path() {
            Ok(path) => path,
            Err(e) => {
                print_error!("failed to locate config: {e}");
                return ExitCode::FAILURE;
            }
        },
    };

    // Handle Ctrl+C to exit cleanly
    let (stop_tx, stop_rx) = bounded::<()>(1);
    if let Err(e) = ctrlc::set_handler(move || {
        let _ = stop_tx.try_send(());
    }) {
        print_error!("failed to set Ctrl+C handler: {e}");
        return ExitCode::FAILURE;
    }

    let outcome = match cli.command {
        Command::Run => run_bridge(&config_path, &stop_rx),
        Command::Map => run_remap(&config_path, &stop_rx).map(|mapping| {
            if let Some(mapping) = mapping {
                print_info!("add this to {}:", config_path.display());
                print_yaml(&mapping_yaml(&mapping));
            }
        }),
        Command::Probe => probe(&config_path).map(|controller| match controller {
            ControllerType::None => print_info!("no controller found"),
            controller => print_info!("would use the {controller} backend"),
        }),
    };

    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            print_error!("{e}");
            ExitCode::FAILURE
        }
    }
}

#[allow(clippy::print_stdout)]
fn print_yaml(yaml: &str) {
    print!("{yaml}");
}
