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

use crate::ast::{EncodedInstruction, SourceLine, SymbolTable};
use crate::assembler::resolver::{self, Displacement};
use crate::errors::AssemblyError;
use crate::parser;

/// Format 3 (24 bits): 6-bit opcode with n/i folded in, 4-bit xbpe,
/// 12-bit displacement (signed PC-relative or unsigned base-relative).
/// `RSUB` and other no-operand format-3 mnemonics get a zero
/// displacement and no addressing flags beyond the defaults.
pub fn encode_format3(
    opcode: u8,
    source_line: &SourceLine,
    symbol_table: &SymbolTable,
    base: Option<u32>,
) -> Result<EncodedInstruction, AssemblyError> {
    let line_number = source_line.line_number;
    let flags = resolver::determine_flags(
        &source_line.mnemonic,
        source_line.operand.as_deref(),
        line_number,
    )?;

    let Some(operand) = source_line.operand.as_deref() else {
        return Ok(EncodedInstruction::Format3 {
            opcode,
            n: flags.n,
            i: flags.i,
            x: flags.x,
            b: false,
            p: false,
            displacement: 0,
        });
    };

    if parser::is_literal(operand) {
        // Literal pool operands (`=...`) are recognised but never
        // emitted; behaviour beyond "encode as a zero displacement"
        // is unspecified.
        return Ok(EncodedInstruction::Format3 {
            opcode,
            n: flags.n,
            i: flags.i,
            x: flags.x,
            b: false,
            p: false,
            displacement: 0,
        });
    }

    let stripped = parser::strip_addressing(operand);
    let is_immediate = parser::is_immediate(operand);
    let target = resolver::resolve_operand(stripped, is_immediate, symbol_table, line_number)?;

    // An immediate decimal literal is used directly as the displacement,
    // bypassing PC/base-relative selection entirely.
    if is_immediate && stripped.parse::<u32>().is_ok() {
        return Ok(EncodedInstruction::Format3 {
            opcode,
            n: flags.n,
            i: flags.i,
            x: flags.x,
            b: false,
            p: false,
            displacement: (target & 0x0FFF) as u16,
        });
    }

    let location = source_line
        .location
        .expect("pass 1 stamps every instruction's location");

    match resolver::select_displacement(target, location, base, line_number)? {
        Displacement::PcRelative(disp) => Ok(EncodedInstruction::Format3 {
            opcode,
            n: flags.n,
            i: flags.i,
            x: flags.x,
            b: false,
            p: true,
            displacement: disp,
        }),
        Displacement::BaseRelative(disp) => Ok(EncodedInstruction::Format3 {
            opcode,
            n: flags.n,
            i: flags.i,
            x: flags.x,
            b: true,
            p: false,
            displacement: disp,
        }),
    }
}
