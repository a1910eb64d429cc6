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

use std::collections::HashMap;
use std::sync::OnceLock;

/// Canonical instruction format as printed in the op-code table.
/// A `+` prefix on the mnemonic raises a `Three` entry to format 4;
/// that promotion is a property of the source line, not of the table.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Format {
    One,
    Two,
    Three,
}

/// The operand slots a mnemonic expects, used only by the pass-2
/// dispatcher to decide how to split a format-2 operand string.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum OperandSlots {
    /// No operand (format 1, or format-3 RSUB).
    None,
    /// A single memory-reference operand (format 3/4 `m`).
    Memory,
    /// Two registers (format 2, e.g. `ADDR A,S`).
    TwoRegisters,
    /// One register (format 2, e.g. `CLEAR A`).
    OneRegister,
    /// One register plus a shift count (format 2 `SHIFTL`/`SHIFTR`).
    RegisterAndCount,
    /// A single immediate count (format 2 `SVC`).
    Count,
}

#[derive(Debug, Copy, Clone)]
pub struct InstructionEntry {
    pub opcode: u8,
    pub format: Format,
    pub operands: OperandSlots,
}

macro_rules! op_table {
    ($(($mnemonic:literal, $opcode:literal, $format:expr, $operands:expr)),* $(,)?) => {
        &[$(($mnemonic, InstructionEntry { opcode: $opcode, format: $format, operands: $operands })),*]
    };
}

/// Entries as they appear in the reference op-code table.
const ENTRIES: &[(&str, InstructionEntry)] = op_table![
    ("ADD", 0x18, Format::Three, OperandSlots::Memory),
    ("ADDF", 0x58, Format::Three, OperandSlots::Memory),
    ("ADDR", 0x90, Format::Two, OperandSlots::TwoRegisters),
    ("AND", 0x40, Format::Three, OperandSlots::Memory),
    ("CLEAR", 0xB4, Format::Two, OperandSlots::OneRegister),
    ("COMP", 0x28, Format::Three, OperandSlots::Memory),
    ("COMPF", 0x88, Format::Three, OperandSlots::Memory),
    ("COMPR", 0xA0, Format::Two, OperandSlots::TwoRegisters),
    ("DIV", 0x24, Format::Three, OperandSlots::Memory),
    ("DIVF", 0x64, Format::Three, OperandSlots::Memory),
    ("DIVR", 0x9C, Format::Two, OperandSlots::TwoRegisters),
    ("FIX", 0xC4, Format::One, OperandSlots::None),
    ("FLOAT", 0xC0, Format::One, OperandSlots::None),
    ("HIO", 0xF4, Format::One, OperandSlots::None),
    ("J", 0x3C, Format::Three, OperandSlots::Memory),
    ("JEQ", 0x30, Format::Three, OperandSlots::Memory),
    ("JGT", 0x34, Format::Three, OperandSlots::Memory),
    ("JLT", 0x38, Format::Three, OperandSlots::Memory),
    ("JSUB", 0x48, Format::Three, OperandSlots::Memory),
    ("LDA", 0x00, Format::Three, OperandSlots::Memory),
    ("LDB", 0x68, Format::Three, OperandSlots::Memory),
    ("LDCH", 0x50, Format::Three, OperandSlots::Memory),
    ("LDF", 0x70, Format::Three, OperandSlots::Memory),
    ("LDL", 0x08, Format::Three, OperandSlots::Memory),
    ("LDS", 0x6C, Format::Three, OperandSlots::Memory),
    ("LDT", 0x74, Format::Three, OperandSlots::Memory),
    ("LDX", 0x04, Format::Three, OperandSlots::Memory),
    ("LPS", 0xD0, Format::Three, OperandSlots::Memory),
    ("MULF", 0x60, Format::Three, OperandSlots::Memory),
    ("MULR", 0x98, Format::Two, OperandSlots::TwoRegisters),
    ("NORM", 0xC8, Format::One, OperandSlots::None),
    ("OR", 0x44, Format::Three, OperandSlots::Memory),
    ("RD", 0xD8, Format::Three, OperandSlots::Memory),
    ("RMO", 0xAC, Format::Two, OperandSlots::TwoRegisters),
    ("RSUB", 0x4C, Format::Three, OperandSlots::None),
    ("SHIFTL", 0xA4, Format::Two, OperandSlots::RegisterAndCount),
    ("SHIFTR", 0xA8, Format::Two, OperandSlots::RegisterAndCount),
    ("SIO", 0xF0, Format::One, OperandSlots::None),
    ("SSK", 0xEC, Format::Three, OperandSlots::Memory),
    ("STA", 0x0C, Format::Three, OperandSlots::Memory),
    ("STB", 0x78, Format::Three, OperandSlots::Memory),
    ("STCH", 0x54, Format::Three, OperandSlots::Memory),
    ("STF", 0x80, Format::Three, OperandSlots::Memory),
    ("STI", 0xD4, Format::Three, OperandSlots::Memory),
    ("STL", 0x14, Format::Three, OperandSlots::Memory),
    ("STS", 0x7C, Format::Three, OperandSlots::Memory),
    ("STSW", 0xE8, Format::Three, OperandSlots::Memory),
    ("STT", 0x84, Format::Three, OperandSlots::Memory),
    ("STX", 0x10, Format::Three, OperandSlots::Memory),
    ("SUB", 0x1C, Format::Three, OperandSlots::Memory),
    ("SUBF", 0x5C, Format::Three, OperandSlots::Memory),
    ("SUBR", 0x94, Format::Two, OperandSlots::TwoRegisters),
    ("SVC", 0xB0, Format::Two, OperandSlots::Count),
    ("TD", 0xE0, Format::Three, OperandSlots::Memory),
    ("TIO", 0xF8, Format::One, OperandSlots::None),
    ("TIX", 0x2C, Format::Three, OperandSlots::Memory),
    ("TIXR", 0xB8, Format::Two, OperandSlots::OneRegister),
    ("WD", 0xDC, Format::Three, OperandSlots::Memory),
];

fn op_table() -> &'static HashMap<&'static str, InstructionEntry> {
    static TABLE: OnceLock<HashMap<&'static str, InstructionEntry>> = OnceLock::new();
    TABLE.get_or_init(|| ENTRIES.iter().copied().collect())
}

/// Looks up the bare mnemonic (no leading `+`).
pub fn lookup(mnemonic: &str) -> Option<&'static InstructionEntry> {
    op_table().get(mnemonic)
}

/// Register name to its 4-bit number (page 5 and 7 of the reference book).
pub fn register_number(name: &str) -> Option<u8> {
    match name {
        "A" => Some(0),
        "X" => Some(1),
        "L" => Some(2),
        "B" => Some(3),
        "S" => Some(4),
        "T" => Some(5),
        "F" => Some(6),
        "PC" => Some(8),
        "SW" => Some(9),
        _ => None,
    }
}

/// Addressing-mode flag bit positions.
pub mod flags {
    pub const N: u8 = 0x20;
    pub const I: u8 = 0x10;
    pub const X: u8 = 0x08;
    pub const B: u8 = 0x04;
    pub const P: u8 = 0x02;
    pub const E: u8 = 0x01;
}

/// Strips a leading `+` (extended format marker) from a mnemonic.
pub fn base_mnemonic(mnemonic: &str) -> &str {
    mnemonic.strip_prefix('+').unwrap_or(mnemonic)
}

pub fn is_extended(mnemonic: &str) -> bool {
    mnemonic.starts_with('+')
}

/// The instruction format actually used on the wire: format 3 is
/// raised to format 4 when the mnemonic carries the `+` prefix.
pub fn determine_format(mnemonic: &str) -> Option<u8> {
    let entry = lookup(base_mnemonic(mnemonic))?;
    let base = match entry.format {
        Format::One => 1,
        Format::Two => 2,
        Format::Three => 3,
    };
    Some(if is_extended(mnemonic) && base == 3 {
        4
    } else {
        base
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn looks_up_known_mnemonic() {
        let entry = lookup("STL").unwrap();
        assert_eq!(entry.opcode, 0x14);
        assert_eq!(entry.format, Format::Three);
    }

    #[test]
    fn unknown_mnemonic_is_none() {
        assert!(lookup("NOPE").is_none());
    }

    #[test]
    fn extended_format_raises_three_to_four() {
        assert_eq!(determine_format("+JSUB"), Some(4));
        assert_eq!(determine_format("JSUB"), Some(3));
    }

    #[test]
    fn format_one_and_two_are_unaffected_by_plus_lookup() {
        assert_eq!(determine_format("FIX"), Some(1));
        assert_eq!(determine_format("ADDR"), Some(2));
    }

    #[test]
    fn register_numbers_match_reference_table() {
        assert_eq!(register_number("A"), Some(0));
        assert_eq!(register_number("PC"), Some(8));
        assert_eq!(register_number("SW"), Some(9));
        assert_eq!(register_number("Z"), None);
    }
}
