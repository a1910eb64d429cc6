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

/// `WORD`: six hex digits of the decimal operand, two's-complemented
/// into 24 bits if negative.
pub fn encode_word(source_line: &SourceLine) -> Result<EncodedInstruction, AssemblyError> {
    let operand = source_line
        .operand
        .as_deref()
        .ok_or_else(|| AssemblyError::LineFields {
            line: source_line.line_number,
            reason: "WORD requires a decimal operand".to_string(),
            contents: source_line.contents.clone(),
        })?;
    let value: i32 = operand.parse().map_err(|_| AssemblyError::LineFields {
        line: source_line.line_number,
        reason: format!("invalid decimal operand for WORD: {}", operand),
        contents: source_line.contents.clone(),
    })?;
    Ok(EncodedInstruction::Word {
        value: (value as u32) & 0x00FF_FFFF,
    })
}

/// `BYTE X'...'` emits the hex digits literally; `BYTE C'...'` emits
/// the ASCII hex of each character.
pub fn encode_byte(source_line: &SourceLine) -> Result<EncodedInstruction, AssemblyError> {
    let operand = source_line
        .operand
        .as_deref()
        .ok_or_else(|| AssemblyError::LineFields {
            line: source_line.line_number,
            reason: "BYTE requires an operand".to_string(),
            contents: source_line.contents.clone(),
        })?;

    if let Some(hex_digits) = operand.strip_prefix("X'").and_then(|s| s.strip_suffix('\'')) {
        if hex_digits.is_empty() || !hex_digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AssemblyError::LineFields {
                line: source_line.line_number,
                reason: format!("invalid BYTE hex literal: {}", operand),
                contents: source_line.contents.clone(),
            });
        }
        // An odd digit count is padded with a leading zero nibble so the
        // byte stream stays whole-byte aligned, matching the ceil(n/2)
        // width computed in pass 1.
        let padded = if hex_digits.len() % 2 == 1 {
            format!("0{}", hex_digits)
        } else {
            hex_digits.to_string()
        };
        let bytes = padded
            .as_bytes()
            .chunks(2)
            .map(|chunk| {
                u8::from_str_radix(std::str::from_utf8(chunk).unwrap(), 16).unwrap()
            })
            .collect();
        return Ok(EncodedInstruction::Byte { bytes });
    }

    if let Some(chars) = operand.strip_prefix("C'").and_then(|s| s.strip_suffix('\'')) {
        return Ok(EncodedInstruction::Byte {
            bytes: chars.bytes().collect(),
        });
    }

    Err(AssemblyError::LineFields {
        line: source_line.line_number,
        reason: format!("invalid BYTE operand: {}", operand),
        contents: source_line.contents.clone(),
    })
}
