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

pub mod encoder;
pub mod pass1;
pub mod pass2;
pub mod records;
pub mod resolver;
pub mod symbol_table;

use log::info;

use crate::ast::ObjectRecord;
use crate::errors::AssemblyError;

/// Runs both passes and the record emitter over a source program,
/// returning the final ordered list of object records.
pub fn assemble<'a, I>(lines: I) -> Result<Vec<ObjectRecord>, AssemblyError>
where
    I: Iterator<Item = &'a str>,
{
    let pass1_result = pass1::run(lines)?;
    info!(
        "pass 1 complete: {} symbols, program `{}` starting at 0x{:X}",
        pass1_result.symbol_table.len(),
        pass1_result.program_name,
        pass1_result.start_address
    );

    let objects = pass2::run(&pass1_result.lines, &pass1_result.symbol_table)?;
    info!("pass 2 complete: {} objects encoded", objects.len());

    let program_length = pass1_result.end_location - pass1_result.start_address;
    let records = records::generate(
        &objects,
        &pass1_result.program_name,
        pass1_result.start_address,
        program_length,
    );
    info!("emitted {} object records", records.len());

    Ok(records)
}
