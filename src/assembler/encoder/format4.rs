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
use crate::assembler::resolver;
use crate::errors::AssemblyError;
use crate::parser;

/// Format 4 (32 bits): 6-bit opcode with n/i folded in, 4-bit xbpe
/// (p=b=0, e=1 always), 20-bit absolute address. No PC/base-relative
/// selection; the address is absolute.
pub fn encode_format4(
    opcode: u8,
    source_line: &SourceLine,
    symbol_table: &SymbolTable,
) -> Result<EncodedInstruction, AssemblyError> {
    let line_number = source_line.line_number;
    let flags = resolver::determine_flags(
        &source_line.mnemonic,
        source_line.operand.as_deref(),
        line_number,
    )?;

    let address = match source_line.operand.as_deref() {
        None => 0,
        Some(operand) if parser::is_literal(operand) => 0,
        Some(operand) => {
            let stripped = parser::strip_addressing(operand);
            let is_immediate = parser::is_immediate(operand);
            resolver::resolve_operand(stripped, is_immediate, symbol_table, line_number)?
        }
    };

    Ok(EncodedInstruction::Format4 {
        opcode,
        n: flags.n,
        i: flags.i,
        x: flags.x,
        address: address & 0x000F_FFFF,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(mnemonic: &str, operand: Option<&str>) -> SourceLine {
        SourceLine::new(
            1,
            None,
            mnemonic.to_string(),
            operand.map(|s| s.to_string()),
            format!("{} {}", mnemonic, operand.unwrap_or("")),
        )
    }

    #[test]
    fn extended_jsub_textbook_example() {
        let mut symtab = SymbolTable::new();
        symtab.insert("RDREC".to_string(), 0x1036);
        let instr = encode_format4(0x48, &line("+JSUB", Some("RDREC")), &symtab).unwrap();
        assert_eq!(instr.to_hex(), "4B101036");
    }

    #[test]
    fn undefined_symbol_is_an_error() {
        let symtab = SymbolTable::new();
        let err = encode_format4(0x00, &line("+LDA", Some("NOPE")), &symtab).unwrap_err();
        assert!(matches!(err, AssemblyError::UndefinedSymbol { .. }));
    }
}
