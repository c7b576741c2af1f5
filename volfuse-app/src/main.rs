//! Volfuse Application
//!
//! Batch tool that fuses six axis-aligned depth+color renders per frame into
//! sparse color/opacity volumes.
//!
//! Inputs are `<input>/<%04d frame><view>.png` for views `nx ny nz px py pz`;
//! outputs are `<output>/<prefix>_<%04d frame>.<json|ply>`. A missing input
//! directory aborts the batch; missing views and failed writes are logged and
//! skipped.

mod app;
mod errors;
mod settings;

use clap::Parser;
use settings::Args;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = Args::parse();

    let result = args
        .to_config()
        .and_then(|config| app::App::new(config).run());

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Application error: {}", e);
            ExitCode::FAILURE
        }
    }
}
