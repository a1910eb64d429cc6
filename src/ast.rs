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

/// One physical source line after tokenising. `location` starts as
/// `None` and is stamped exactly once, by pass 1.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceLine {
    pub line_number: usize,
    pub label: Option<String>,
    pub mnemonic: String,
    pub operand: Option<String>,
    pub location: Option<u32>,
    /// The raw line text, kept for error messages.
    pub contents: String,
}

impl SourceLine {
    pub fn new(
        line_number: usize,
        label: Option<String>,
        mnemonic: String,
        operand: Option<String>,
        contents: String,
    ) -> Self {
        SourceLine {
            line_number,
            label,
            mnemonic,
            operand,
            location: None,
            contents,
        }
    }
}

/// Label to resolved integer address. Per the design notes, addresses
/// are stored as integers and rendered to hex only at record-emission
/// time, rather than round-tripped through hex strings on every lookup.
pub type SymbolTable = HashMap<String, u32>;

/// A pass-2 encoded object, tagged by the format that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum EncodedInstruction {
    Format1 {
        opcode: u8,
    },
    Format2 {
        opcode: u8,
        r1: u8,
        r2: u8,
    },
    Format3 {
        /// opcode with its low two bits cleared (n/i live there)
        opcode: u8,
        n: bool,
        i: bool,
        x: bool,
        b: bool,
        p: bool,
        /// 12-bit displacement, already two's-complemented if signed
        displacement: u16,
    },
    Format4 {
        opcode: u8,
        n: bool,
        i: bool,
        x: bool,
        /// 20-bit absolute address
        address: u32,
    },
    Word {
        value: u32,
    },
    Byte {
        bytes: Vec<u8>,
    },
}

impl EncodedInstruction {
    /// Byte length of the object, used for program-length accounting
    /// and text-record packing.
    pub fn len(&self) -> u32 {
        match self {
            EncodedInstruction::Format1 { .. } => 1,
            EncodedInstruction::Format2 { .. } => 2,
            EncodedInstruction::Format3 { .. } => 3,
            EncodedInstruction::Format4 { .. } => 4,
            EncodedInstruction::Word { .. } => 3,
            EncodedInstruction::Byte { bytes } => bytes.len() as u32,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hex rendering of the machine code, uppercase, zero-padded to an
    /// even digit count per format.
    pub fn to_hex(&self) -> String {
        match self {
            EncodedInstruction::Format1 { opcode } => format!("{:02X}", opcode),
            EncodedInstruction::Format2 { opcode, r1, r2 } => {
                format!("{:02X}{:01X}{:01X}", opcode, r1, r2)
            }
            EncodedInstruction::Format3 {
                opcode,
                n,
                i,
                x,
                b,
                p,
                displacement,
            } => {
                let mut op6 = (*opcode & 0xFC) as u32;
                if *n {
                    op6 |= 0x02;
                }
                if *i {
                    op6 |= 0x01;
                }
                let mut xbpe = 0u32;
                if *x {
                    xbpe |= 0b1000;
                }
                if *b {
                    xbpe |= 0b0100;
                }
                if *p {
                    xbpe |= 0b0010;
                }
                let combined = (op6 << 16) | (xbpe << 12) | (*displacement as u32 & 0x0FFF);
                format!("{:06X}", combined)
            }
            EncodedInstruction::Format4 {
                opcode,
                n,
                i,
                x,
                address,
            } => {
                let mut op6 = (*opcode & 0xFC) as u32;
                if *n {
                    op6 |= 0x02;
                }
                if *i {
                    op6 |= 0x01;
                }
                let mut xbpe = 0b0001u32; // e=1, p=b=0
                if *x {
                    xbpe |= 0b1000;
                }
                let combined = (op6 << 24) | (xbpe << 20) | (*address & 0x000F_FFFF);
                format!("{:08X}", combined)
            }
            EncodedInstruction::Word { value } => format!("{:06X}", value),
            EncodedInstruction::Byte { bytes } => {
                bytes.iter().map(|b| format!("{:02X}", b)).collect()
            }
        }
    }

}

/// A single `(location, encoded_object)` tuple produced by pass 2, or
/// a storage reservation that breaks text records without emitting
/// bytes of its own.
#[derive(Debug, Clone, PartialEq)]
pub enum PassTwoObject {
    Encoded(u32, EncodedInstruction),
    Reservation { location: u32, length: u32 },
}

/// Three object-record variants: header, text, end.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjectRecord {
    Header {
        name: String,
        start: u32,
        length: u32,
    },
    Text {
        start: u32,
        payload: String,
    },
    End {
        first_instruction: u32,
    },
}

impl ObjectRecord {
    /// Bit-exact textual rendering per the published object-code format.
    pub fn render(&self) -> String {
        match self {
            ObjectRecord::Header { name, start, length } => {
                let truncated: String = name.chars().take(6).collect();
                let padded = format!("{:<6}", truncated).to_uppercase();
                format!("H{}{:06X}{:06X}", padded, start, length)
            }
            ObjectRecord::Text { start, payload } => {
                let byte_count = payload.len() / 2;
                format!("T{:06X}{:02X}{}", start, byte_count, payload)
            }
            ObjectRecord::End { first_instruction } => {
                format!("E{:06X}", first_instruction)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format1_hex() {
        let instr = EncodedInstruction::Format1 { opcode: 0xC4 };
        assert_eq!(instr.to_hex(), "C4");
        assert_eq!(instr.len(), 1);
    }

    #[test]
    fn format2_hex_with_absent_r2() {
        let instr = EncodedInstruction::Format2 {
            opcode: 0xB8,
            r1: 5,
            r2: 0,
        };
        assert_eq!(instr.to_hex(), "B850");
    }

    #[test]
    fn header_record_pads_and_uppercases_name() {
        let record = ObjectRecord::Header {
            name: "copy".to_string(),
            start: 0x1000,
            length: 0x107A,
        };
        assert_eq!(record.render(), "HCOPY  00100000107A");
    }

    #[test]
    fn header_record_truncates_names_longer_than_six_chars() {
        let record = ObjectRecord::Header {
            name: "toolong".to_string(),
            start: 0x1000,
            length: 0x107A,
        };
        assert_eq!(record.render(), "HTOOLON00100000107A");
    }

    #[test]
    fn end_record_renders_six_digit_address() {
        let record = ObjectRecord::End {
            first_instruction: 0x1000,
        };
        assert_eq!(record.render(), "E001000");
    }
}
