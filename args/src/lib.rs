// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

pub use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "rosgen")]
#[command(version)]
#[command(about = "Generates RouterOS scripts from a router topology", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct CmdArgs {
    #[arg(
        long,
        short = 'c',
        value_name = "PATH",
        required_unless_present_any = ["show_tracing_tags", "show_tracing_targets", "tracing_config_generate"],
        help = "YAML file describing the router"
    )]
    config: Option<PathBuf>,

    #[arg(
        long,
        short = 'o',
        value_name = "PATH",
        help = "Write the script to this file instead of standard output"
    )]
    output: Option<PathBuf>,

    #[arg(long, help = "Validate the configuration and exit without generating anything")]
    check: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Print the VLAN id and routing table of every network to standard error"
    )]
    show_networks: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Show the available tracing tags and exit"
    )]
    show_tracing_tags: bool,

    #[arg(
        long,
        default_value_t = false,
        help = "Show configurable tracing targets and exit"
    )]
    show_tracing_targets: bool,

    #[arg(long, help = "generate tracing configuration as a string and exit")]
    tracing_config_generate: bool,

    #[arg(
        long,
        value_name = "tracing configuration",
        help = "Tracing config string as comma-separated sequence of tag=level, with level one in [off,error,warn,info,debug,trace].
Passing default=level sets the default log-level.
Passing all=level allows setting the log-level of all targets to level.
E.g. default=error,all=info,multilink=debug will set the default target to error, and all the registered targets to info, but enable debug for multilink"
    )]
    tracing: Option<String>,
}

impl CmdArgs {
    pub fn config(&self) -> Option<&Path> {
        self.config.as_deref()
    }
    pub fn output(&self) -> Option<&Path> {
        self.output.as_deref()
    }
    pub fn check(&self) -> bool {
        self.check
    }
    pub fn show_networks(&self) -> bool {
        self.show_networks
    }
    pub fn show_tracing_tags(&self) -> bool {
        self.show_tracing_tags
    }
    pub fn show_tracing_targets(&self) -> bool {
        self.show_tracing_targets
    }
    pub fn tracing_config_generate(&self) -> bool {
        self.tracing_config_generate
    }
    pub fn tracing(&self) -> Option<&String> {
        self.tracing.as_ref()
    }
}
