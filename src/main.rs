/*
Copyright 2025 Connor Nolan

Licensed under the Apache License, Version 2.0 (the "License");
you may not use this file except in compliance with the License.
You may obtain a copy of the License at

    http://www.apache.org/licenses/LICENSE-2.0

Unless required by applicable law or agreed to in writing, software
distributed under the License is distributed on an "AS IS" BASIS,
WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
See the License for the specific language governing permissions and
limitations under the License.
*/

use std::io::{self, IsTerminal, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use sicxe_assembler::assemble_str;
use sicxe_assembler::errors::AssemblyError;
use sicxe_assembler::file_reader::{AsmFileReader, FileReader};

#[derive(Parser)]
#[clap(
    name = "sicxe-asm",
    version,
    author,
    about = "A two-pass assembler for the SIC/XE instruction set."
)]
struct Opts {
    /// Source file to assemble. Ignored (and read from stdin instead)
    /// when stdin is not a terminal.
    file: Option<PathBuf>,

    /// Output file path; defaults to standard output.
    #[clap(short, long)]
    output: Option<PathBuf>,

    /// Verbosity level: 0 = warnings only, 1 = info, 2 = debug.
    #[clap(short, long, value_parser = clap::value_parser!(u8).range(0..=2), default_value_t = 0)]
    verbosity: u8,
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        _ => log::LevelFilter::Debug,
    };
    env_logger::Builder::new().filter_level(level).init();
}

fn main() -> ExitCode {
    let opts = Opts::parse();
    init_logging(opts.verbosity);

    let source = if !io::stdin().is_terminal() {
        let mut buf = String::new();
        if let Err(err) = io::stdin().read_to_string(&mut buf) {
            eprintln!("[IO Error]: could not read source from stdin: {}", err);
            return ExitCode::FAILURE;
        }
        buf
    } else {
        let Some(path) = &opts.file else {
            eprintln!("[Error]: a source file path is required when stdin is a terminal");
            return ExitCode::FAILURE;
        };
        match AsmFileReader.read_to_string(path) {
            Ok(source) => source,
            Err(AssemblyError::Io(err)) => {
                eprintln!("[IO Error]: could not open source file: {}", err);
                return ExitCode::FAILURE;
            }
            Err(other) => {
                eprintln!("[Assembler Error] {}", other);
                return ExitCode::FAILURE;
            }
        }
    };

    let records = match assemble_str(&source) {
        Ok(records) => records,
        Err(err) => {
            log::error!("assembly failed: {}", err);
            eprintln!("[Assembler Error] {}", err);
            return ExitCode::FAILURE;
        }
    };

    let rendered: Vec<String> = records.iter().map(|r| r.render()).collect();

    let write_result: anyhow::Result<()> = (|| match &opts.output {
        Some(path) => std::fs::write(path, rendered.join("\n") + "\n")
            .with_context(|| format!("could not write object program to {}", path.display())),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            rendered
                .iter()
                .try_for_each(|line| writeln!(handle, "{}", line))
                .context("could not write object program to stdout")
        }
    })();

    if let Err(err) = write_result {
        eprintln!("[IO Error]: {:#}", err);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
