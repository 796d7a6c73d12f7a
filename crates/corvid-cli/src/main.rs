// -------------------------------------------------------------------------
// SPDX-FileCopyrightText: Copyright © 2025 The Typhon Project
// SPDX-FileName: crates/corvid-cli/src/main.rs
// SPDX-FileType: SOURCE
// SPDX-License-Identifier: Apache-2.0
// -------------------------------------------------------------------------
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
// -------------------------------------------------------------------------
//! corvid CLI
//!
//! Command-line interface for the corvid compiler front end.

mod commands;
mod diagnostics;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// The corvid compiler front end
#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Type check source files without building
    Check {
        /// Source files or directories (`*`/`**` expand within a directory)
        #[clap(required = true)]
        inputs: Vec<PathBuf>,
        /// Show verbose output
        #[clap(short, long)]
        verbose: bool,
    },
    /// Run the front end and report that no backend is configured
    Build {
        /// Source files or directories (`*`/`**` expand within a directory)
        #[clap(required = true)]
        inputs: Vec<PathBuf>,
        /// Show verbose output
        #[clap(short, long)]
        verbose: bool,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Check { inputs, verbose } => commands::check::execute(inputs, verbose),
        Command::Build { inputs, verbose } => commands::build::execute(inputs, verbose),
    }
}
