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

mod data;
mod format1;
mod format2;
mod format3;
mod format4;

pub use data::{encode_byte, encode_word};
pub use format1::encode_format1;
pub use format2::encode_format2;
pub use format3::encode_format3;
pub use format4::encode_format4;

use crate::ast::{EncodedInstruction, SourceLine, SymbolTable};
use crate::errors::AssemblyError;
use crate::instructions::{self, Format};

/// Encodes a single instruction source line, dispatching on its
/// canonical format. `base` is the assembler's current BASE register
/// value, captured at this instruction's own position in pass 2.
pub fn encode_instruction(
    source_line: &SourceLine,
    symbol_table: &SymbolTable,
    base: Option<u32>,
) -> Result<EncodedInstruction, AssemblyError> {
    let mnemonic = &source_line.mnemonic;
    let bare = instructions::base_mnemonic(mnemonic);
    let entry = instructions::lookup(bare).ok_or_else(|| AssemblyError::OpcodeLookup {
        line: source_line.line_number,
        mnemonic: mnemonic.clone(),
    })?;

    match (entry.format, instructions::is_extended(mnemonic)) {
        (Format::One, _) => encode_format1(entry.opcode),
        (Format::Two, _) => encode_format2(entry.opcode, source_line),
        (Format::Three, false) => encode_format3(entry.opcode, source_line, symbol_table, base),
        (Format::Three, true) => encode_format4(entry.opcode, source_line, symbol_table),
    }
}
