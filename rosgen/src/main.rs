// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

#![deny(clippy::all, clippy::pedantic)]

mod args;

use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use crate::args::{CmdArgs, Parser};

use config::{ConfigError, RouterConfig};
use generator::{GenError, Generated, generate};
use tracectl::{get_trace_ctl, trace_target};
use tracing::{error, info, level_filters::LevelFilter};

trace_target!("rosgen", LevelFilter::INFO, &[]);
fn init_logging() {
    let tctl = get_trace_ctl();
    tctl.set_default_level(LevelFilter::WARN);
}

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error("Invalid tracing configuration: {0}")]
    Tracing(String),
    #[error("No configuration file given")]
    NoConfig,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generate(#[from] GenError),
    #[error("Could not write the script to {path}: {reason}")]
    Output { path: String, reason: String },
}

fn show_networks(generated: &Generated) {
    eprintln!("{:>24} │ {:>5} │ TABLE", "NETWORK", "VLAN");
    for id in &generated.networks {
        eprintln!("{:>24} │ {:>5} │ {}", id.name, id.vid, id.table);
    }
}

fn write_script(script: &str, output: Option<&Path>) -> Result<(), RunError> {
    let result = match output {
        Some(path) => std::fs::write(path, script),
        None => std::io::stdout().lock().write_all(script.as_bytes()),
    };
    result.map_err(|e| RunError::Output {
        path: output.map_or_else(|| "stdout".to_owned(), |p| p.display().to_string()),
        reason: e.to_string(),
    })
}

fn run(args: &CmdArgs) -> Result<(), RunError> {
    let path = args.config().ok_or(RunError::NoConfig)?;
    let config = RouterConfig::load(path)?;
    if args.check() {
        info!("Configuration of router '{}' is valid", config.name);
        return Ok(());
    }
    let generated = generate(&config)?;
    if args.show_networks() {
        show_networks(&generated);
    }
    write_script(&generated.document.to_string(), args.output())?;
    if let Some(output) = args.output() {
        info!("Wrote script of router '{}' to {}", config.name, output.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    /* parse cmd line args */
    let args = CmdArgs::parse();

    /* initialize logging */
    init_logging();
    if let Some(tracing) = args.tracing()
        && let Err(e) = get_trace_ctl().setup_from_string(tracing)
    {
        error!("{}", RunError::Tracing(e));
        return ExitCode::FAILURE;
    }
    if args.show_tracing_tags() {
        eprint!("{}", get_trace_ctl().targets_by_tag_string());
        return ExitCode::SUCCESS;
    }
    if args.show_tracing_targets() {
        eprint!("{}", get_trace_ctl().targets_string());
        return ExitCode::SUCCESS;
    }
    if args.tracing_config_generate() {
        println!("{}", get_trace_ctl().as_config_string());
        return ExitCode::SUCCESS;
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
