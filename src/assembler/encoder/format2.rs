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

use crate::ast::{EncodedInstruction, SourceLine};
use crate::errors::AssemblyError;
use crate::instructions::{self, OperandSlots};

/// Format 2 (16 bits): opcode byte, then r1 nibble, then r2 nibble
/// (0 if the mnemonic takes only one register, e.g. `CLEAR`/`TIXR`).
/// `SHIFTL`/`SHIFTR` place their shift count, minus one, in the r2
/// nibble; `SVC` places its immediate count in the r1 nibble.
pub fn encode_format2(
    opcode: u8,
    source_line: &SourceLine,
) -> Result<EncodedInstruction, AssemblyError> {
    let entry = instructions::lookup(instructions::base_mnemonic(&source_line.mnemonic))
        .expect("format-2 dispatch only reached for known mnemonics");

    let operand = source_line
        .operand
        .as_deref()
        .ok_or_else(|| AssemblyError::LineFields {
            line: source_line.line_number,
            reason: format!("{} requires an operand", source_line.mnemonic),
            contents: source_line.contents.clone(),
        })?;

    let (r1, r2) = match entry.operands {
        OperandSlots::TwoRegisters => {
            let mut parts = operand.split(',');
            let r1 = parts.next().unwrap_or("");
            let r2 = parts
                .next()
                .ok_or_else(|| AssemblyError::LineFields {
                    line: source_line.line_number,
                    reason: format!("{} requires two register operands", source_line.mnemonic),
                    contents: source_line.contents.clone(),
                })?;
            (register(r1, source_line)?, register(r2, source_line)?)
        }
        OperandSlots::OneRegister => (register(operand, source_line)?, 0),
        OperandSlots::RegisterAndCount => {
            let mut parts = operand.split(',');
            let r1 = parts.next().unwrap_or("");
            let count = parts
                .next()
                .ok_or_else(|| AssemblyError::LineFields {
                    line: source_line.line_number,
                    reason: format!("{} requires a register and a count", source_line.mnemonic),
                    contents: source_line.contents.clone(),
                })?;
            (register(r1, source_line)?, shift_count_nibble(count, source_line)?)
        }
        OperandSlots::Count => (decimal_nibble(operand, source_line)?, 0),
        OperandSlots::Memory | OperandSlots::None => {
            unreachable!("format 2 dispatch only reaches register/count slots")
        }
    };

    Ok(EncodedInstruction::Format2 { opcode, r1, r2 })
}

fn register(name: &str, source_line: &SourceLine) -> Result<u8, AssemblyError> {
    instructions::register_number(name.trim()).ok_or_else(|| AssemblyError::LineFields {
        line: source_line.line_number,
        reason: format!("unknown register: {}", name),
        contents: source_line.contents.clone(),
    })
}

fn decimal_nibble(value: &str, source_line: &SourceLine) -> Result<u8, AssemblyError> {
    value
        .trim()
        .parse::<u8>()
        .map_err(|_| AssemblyError::LineFields {
            line: source_line.line_number,
            reason: format!("invalid decimal count: {}", value),
            contents: source_line.contents.clone(),
        })
}

/// `SHIFTL`/`SHIFTR` encode a shift count of 1-16 as count-1 in the r2
/// nibble.
fn shift_count_nibble(value: &str, source_line: &SourceLine) -> Result<u8, AssemblyError> {
    let count = decimal_nibble(value, source_line)?;
    if !(1..=16).contains(&count) {
        return Err(AssemblyError::LineFields {
            line: source_line.line_number,
            reason: format!("shift count must be 1-16, found {}", count),
            contents: source_line.contents.clone(),
        });
    }
    Ok(count - 1)
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
    fn two_registers() {
        let instr = encode_format2(0xA0, &line("COMPR", Some("A,S"))).unwrap();
        assert_eq!(instr.to_hex(), "A004");
    }

    #[test]
    fn one_register_pads_second_nibble_with_zero() {
        let instr = encode_format2(0xB8, &line("TIXR", Some("T"))).unwrap();
        assert_eq!(instr.to_hex(), "B850");
    }

    #[test]
    fn unknown_register_is_rejected() {
        let err = encode_format2(0xA0, &line("COMPR", Some("A,Z"))).unwrap_err();
        assert!(matches!(err, AssemblyError::LineFields { .. }));
    }

    #[test]
    fn shiftl_encodes_count_minus_one() {
        let instr = encode_format2(0xA4, &line("SHIFTL", Some("A,4"))).unwrap();
        assert_eq!(instr.to_hex(), "A403");
    }

    #[test]
    fn shiftr_count_of_sixteen_wraps_to_nibble_fifteen() {
        let instr = encode_format2(0xA8, &line("SHIFTR", Some("A,16"))).unwrap();
        assert_eq!(instr.to_hex(), "A80F");
    }

    #[test]
    fn shift_count_out_of_range_is_rejected() {
        let err = encode_format2(0xA4, &line("SHIFTL", Some("A,17"))).unwrap_err();
        assert!(matches!(err, AssemblyError::LineFields { .. }));
    }
}

