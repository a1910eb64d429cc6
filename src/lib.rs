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

pub mod assembler;
pub mod ast;
pub mod errors;
pub mod file_reader;
pub mod instructions;
pub mod parser;

use std::path::Path;

use ast::ObjectRecord;
use errors::AssemblyError;
use file_reader::FileReader;

/// Assembles a SIC/XE source file, read through `reader`, into an
/// ordered list of object records (header, text, end).
pub fn assemble<F: FileReader>(
    source_path: &Path,
    reader: &F,
) -> Result<Vec<ObjectRecord>, AssemblyError> {
    let source = reader.read_to_string(source_path)?;
    assembler::assemble(source.lines())
}

/// Assembles already-in-memory source text, for callers (and tests)
/// that don't need the file-reader indirection.
pub fn assemble_str(source: &str) -> Result<Vec<ObjectRecord>, AssemblyError> {
    assembler::assemble(source.lines())
}
