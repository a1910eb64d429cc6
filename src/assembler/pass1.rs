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

use log::trace;

use crate::ast::{SourceLine, SymbolTable};
use crate::assembler::symbol_table::define_symbol;
use crate::errors::AssemblyError;
use crate::instructions;
use crate::parser;

#[derive(Debug)]
pub struct Pass1Result {
    pub symbol_table: SymbolTable,
    pub lines: Vec<SourceLine>,
    pub start_address: u32,
    pub program_name: String,
    pub end_location: u32,
}

/// Byte width of a `BYTE` literal: `X'...'` counts hex digits directly
/// (`ceil(digit_count / 2)`), never round-tripping through an integer,
/// so a leading zero nibble like `X'05'` is not silently dropped.
pub fn byte_directive_width(operand: &str) -> Result<u32, String> {
    if let Some(hex_digits) = operand
        .strip_prefix("X'")
        .and_then(|s| s.strip_suffix('\''))
    {
        if hex_digits.is_empty() || !hex_digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("invalid BYTE hex literal: {}", operand));
        }
        Ok(hex_digits.len().div_ceil(2) as u32)
    } else if let Some(chars) = operand
        .strip_prefix("C'")
        .and_then(|s| s.strip_suffix('\''))
    {
        Ok(chars.len() as u32)
    } else {
        Err(format!("invalid BYTE operand: {}", operand))
    }
}

/// Runs pass 1 over an already-split sequence of physical source
/// lines (the lazy line sequence of the concurrency model, callers
/// stream lines in, we never require the whole file up front beyond
/// what `Vec` collection below demands of the in-memory line list).
pub fn run<'a, I>(mut raw_lines: I) -> Result<Pass1Result, AssemblyError>
where
    I: Iterator<Item = &'a str>,
{
    let mut symbol_table = SymbolTable::new();
    let mut lines = Vec::new();

    let first_raw = raw_lines.next().unwrap_or("");
    let first = parser::parse(first_raw, 1)?;

    let mut locctr: u32;
    let mut program_name = String::new();
    let mut start_address = 0u32;

    if let Some(first_line) = &first {
        if first_line.mnemonic == "START" {
            let operand = first_line.operand.as_deref().ok_or_else(|| {
                AssemblyError::LineFields {
                    line: 1,
                    reason: "START requires a starting address operand".to_string(),
                    contents: first_line.contents.clone(),
                }
            })?;
            start_address = u32::from_str_radix(operand, 16).map_err(|_| {
                AssemblyError::LineFields {
                    line: 1,
                    reason: format!("invalid hexadecimal starting address: {}", operand),
                    contents: first_line.contents.clone(),
                }
            })?;
            locctr = start_address;
            program_name = first_line.label.clone().unwrap_or_default();
        } else {
            locctr = 0;
            let mut first_line = first_line.clone();
            first_line.location = Some(locctr);
            if let Some(label) = &first_line.label {
                define_symbol(&mut symbol_table, label, locctr, first_line.line_number)?;
            }
            advance_for_line(&first_line, &mut locctr, &mut symbol_table)?;
            lines.push(first_line);
        }
    } else {
        locctr = 0;
    }

    for (offset, raw_line) in raw_lines.enumerate() {
        let line_number = offset + 2;
        let Some(mut source_line) = parser::parse(raw_line, line_number)? else {
            continue;
        };
        source_line.location = Some(locctr);

        if instructions::base_mnemonic(&source_line.mnemonic) == "END" {
            trace!(
                "pass1: line {} END at locctr=0x{:X}",
                line_number, locctr
            );
            lines.push(source_line);
            break;
        }

        if let Some(label) = &source_line.label {
            define_symbol(&mut symbol_table, label, locctr, line_number)?;
        }

        advance_for_line(&source_line, &mut locctr, &mut symbol_table)?;

        trace!(
            "pass1: line {} `{}` location=0x{:X}",
            line_number, source_line.mnemonic, locctr
        );
        lines.push(source_line);
    }

    Ok(Pass1Result {
        symbol_table,
        lines,
        start_address,
        program_name,
        end_location: locctr,
    })
}

/// Advances the location counter for one source line, per spec.md
/// §4.3 step 3. `BASE`/`NOBASE` never advance the counter; their
/// effect is deferred entirely to pass 2.
fn advance_for_line(
    source_line: &SourceLine,
    locctr: &mut u32,
    _symbol_table: &mut SymbolTable,
) -> Result<(), AssemblyError> {
    let mnemonic = instructions::base_mnemonic(&source_line.mnemonic);
    let line_number = source_line.line_number;

    if instructions::lookup(mnemonic).is_some() {
        let format = instructions::determine_format(&source_line.mnemonic).ok_or_else(|| {
            AssemblyError::OpcodeLookup {
                line: line_number,
                mnemonic: source_line.mnemonic.clone(),
            }
        })?;
        *locctr += format as u32;
        return Ok(());
    }

    match mnemonic {
        "WORD" => {
            *locctr += 3;
        }
        "RESW" => {
            let count = operand_decimal(source_line)?;
            *locctr += 3 * count;
        }
        "RESB" => {
            let count = operand_decimal(source_line)?;
            *locctr += count;
        }
        "BYTE" => {
            let operand = source_line.operand.as_deref().ok_or_else(|| {
                AssemblyError::LineFields {
                    line: line_number,
                    reason: "BYTE requires an operand".to_string(),
                    contents: source_line.contents.clone(),
                }
            })?;
            let width = byte_directive_width(operand).map_err(|reason| {
                AssemblyError::LineFields {
                    line: line_number,
                    reason,
                    contents: source_line.contents.clone(),
                }
            })?;
            *locctr += width;
        }
        "BASE" | "NOBASE" => {}
        _ => {
            return Err(AssemblyError::OpcodeLookup {
                line: line_number,
                mnemonic: source_line.mnemonic.clone(),
            });
        }
    }

    Ok(())
}

fn operand_decimal(source_line: &SourceLine) -> Result<u32, AssemblyError> {
    let operand = source_line
        .operand
        .as_deref()
        .ok_or_else(|| AssemblyError::LineFields {
            line: source_line.line_number,
            reason: format!("{} requires a decimal operand", source_line.mnemonic),
            contents: source_line.contents.clone(),
        })?;
    operand
        .parse::<u32>()
        .map_err(|_| AssemblyError::LineFields {
            line: source_line.line_number,
            reason: format!("invalid decimal operand: {}", operand),
            contents: source_line.contents.clone(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(src: &str) -> Vec<&str> {
        src.lines().collect()
    }

    #[test]
    fn start_sets_program_name_and_location() {
        let result = run(lines("COPY START 1000\nFIRST STL RETADR\nEND FIRST").into_iter())
            .unwrap();
        assert_eq!(result.program_name, "COPY");
        assert_eq!(result.start_address, 0x1000);
        assert_eq!(result.lines[0].location, Some(0x1000));
    }

    #[test]
    fn label_is_recorded_at_current_location() {
        let result = run(lines("COPY START 0\nFIRST STL RETADR\nRETADR RESW 1\nEND FIRST").into_iter())
            .unwrap();
        assert_eq!(result.symbol_table.get("FIRST"), Some(&0));
        assert_eq!(result.symbol_table.get("RETADR"), Some(&3));
    }

    #[test]
    fn duplicate_symbol_is_rejected() {
        let err = run(lines("COPY START 0\nA LDA B\nA LDA B\nEND A").into_iter()).unwrap_err();
        assert!(matches!(err, AssemblyError::DuplicateSymbol { .. }));
    }

    #[test]
    fn unknown_mnemonic_is_rejected() {
        let err = run(lines("COPY START 0\nFROB A\nEND").into_iter()).unwrap_err();
        assert!(matches!(err, AssemblyError::OpcodeLookup { .. }));
    }

    #[test]
    fn resw_and_resb_advance_by_word_and_byte_counts() {
        let result = run(lines("COPY START 0\nX RESW 2\nY RESB 3\nEND").into_iter()).unwrap();
        assert_eq!(result.symbol_table.get("X"), Some(&0));
        assert_eq!(result.symbol_table.get("Y"), Some(&6));
    }

    #[test]
    fn byte_x_counts_hex_digits_not_integer_value() {
        assert_eq!(byte_directive_width("X'05'").unwrap(), 1);
        assert_eq!(byte_directive_width("X'F1'").unwrap(), 1);
        assert_eq!(byte_directive_width("X'ABC'").unwrap(), 2);
    }

    #[test]
    fn byte_c_counts_characters_including_empty() {
        assert_eq!(byte_directive_width("C''").unwrap(), 0);
        assert_eq!(byte_directive_width("C'EOF'").unwrap(), 3);
    }

    #[test]
    fn extended_format_advances_by_four() {
        let result = run(
            lines("COPY START 0\nRDREC RESW 1\n+JSUB RDREC\nEND RDREC").into_iter(),
        )
        .unwrap();
        // RDREC at 0, +JSUB at 3, locctr should be 7 after it.
        assert_eq!(result.end_location, 7);
    }
}
