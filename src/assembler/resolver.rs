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

use crate::ast::SymbolTable;
use crate::assembler::symbol_table::get_symbol;
use crate::errors::AssemblyError;
use crate::parser;

/// n/i/x/e flags plus the resolved numeric target, before the
/// format-3-specific p/b displacement-mode decision.
#[derive(Debug)]
pub struct Flags {
    pub n: bool,
    pub i: bool,
    pub x: bool,
    pub e: bool,
}

/// Computes addressing flags for a source line and returns them along
/// with the resolved target value (the decimal literal itself for an
/// immediate numeric operand, otherwise the symbol table address).
/// `operand` has not had its addressing prefix/suffix stripped yet.
pub fn determine_flags(
    mnemonic: &str,
    operand: Option<&str>,
    line_number: usize,
) -> Result<Flags, AssemblyError> {
    let operand = operand.unwrap_or("");

    let (n, i) = if parser::is_immediate(operand) {
        (false, true)
    } else if parser::is_indirect(operand) {
        (true, false)
    } else {
        (true, true)
    };

    let x = parser::is_indexed(operand);
    if x && (parser::is_immediate(operand) || parser::is_indirect(operand)) {
        return Err(AssemblyError::Instruction {
            line: line_number,
            reason: "indexed addressing cannot be combined with immediate or indirect \
                     addressing"
                .to_string(),
        });
    }

    let e = parser::is_extended(mnemonic);

    Ok(Flags { n, i, x, e })
}

/// Resolves an operand (after stripping its addressing prefix/suffix)
/// to a numeric value: a decimal literal used directly for an
/// immediate operand, or a symbol-table lookup otherwise.
pub fn resolve_operand(
    stripped: &str,
    is_immediate: bool,
    symbol_table: &SymbolTable,
    line_number: usize,
) -> Result<u32, AssemblyError> {
    if is_immediate {
        if let Ok(value) = stripped.parse::<u32>() {
            return Ok(value);
        }
    }
    get_symbol(symbol_table, stripped, line_number)
}

/// The outcome of format-3 displacement-mode selection.
#[derive(Debug)]
pub enum Displacement {
    PcRelative(u16),
    BaseRelative(u16),
}

/// Selects PC-relative or base-relative addressing for a format-3
/// instruction, per spec.md §4.4. `location` is the address of the
/// instruction itself (its position in pass 2, not pass 1, since BASE
/// is assembler state captured at the instruction's own position).
pub fn select_displacement(
    target: u32,
    location: u32,
    base: Option<u32>,
    line_number: usize,
) -> Result<Displacement, AssemblyError> {
    let pc_rel = target as i64 - (location as i64 + 3);
    if (-2048..=2047).contains(&pc_rel) {
        return Ok(Displacement::PcRelative(twos_complement_12(pc_rel)));
    }

    if let Some(base) = base {
        let base_rel = target as i64 - base as i64;
        if (0..=4095).contains(&base_rel) {
            return Ok(Displacement::BaseRelative(base_rel as u16));
        }
    }

    let reason = if base.is_none() {
        "Neither PC nor Base relative addressing usable (BASE directive not set)".to_string()
    } else {
        "Neither PC nor Base relative addressing usable".to_string()
    };
    Err(AssemblyError::Instruction {
        line: line_number,
        reason,
    })
}

/// Two's-complement encoding of a signed value into 12 bits.
fn twos_complement_12(value: i64) -> u16 {
    (value & 0x0FFF) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_addressing_is_simple() {
        let flags = determine_flags("LDA", Some("BUFFER"), 1).unwrap();
        assert!(flags.n && flags.i);
        assert!(!flags.x);
    }

    #[test]
    fn immediate_clears_n() {
        let flags = determine_flags("LDB", Some("#LENGTH"), 1).unwrap();
        assert!(!flags.n && flags.i);
    }

    #[test]
    fn indirect_clears_i() {
        let flags = determine_flags("J", Some("@RETADR"), 1).unwrap();
        assert!(flags.n && !flags.i);
    }

    #[test]
    fn indexed_with_immediate_is_rejected() {
        let err = determine_flags("LDA", Some("#5,X"), 1).unwrap_err();
        assert!(matches!(err, AssemblyError::Instruction { .. }));
    }

    #[test]
    fn pc_relative_boundaries() {
        match select_displacement(0x30, 0x0000, None, 1).unwrap() {
            Displacement::PcRelative(d) => assert_eq!(d, 0x02D),
            _ => panic!("expected PC relative"),
        }
    }

    #[test]
    fn pc_relative_at_negative_2048_is_selected() {
        // target - (location + 3) == -2048
        let location = 3000u32;
        let target = location + 3 - 2048;
        match select_displacement(target, location, None, 1).unwrap() {
            Displacement::PcRelative(d) => assert_eq!(d, 0x800),
            _ => panic!("expected PC relative"),
        }
    }

    #[test]
    fn pc_relative_at_plus_2047_is_selected() {
        let location = 3000u32;
        let target = location + 3 + 2047;
        match select_displacement(target, location, None, 1).unwrap() {
            Displacement::PcRelative(d) => assert_eq!(d, 0x7FF),
            _ => panic!("expected PC relative"),
        }
    }

    #[test]
    fn falls_through_to_base_relative_at_2048() {
        let location = 0u32;
        let target = location + 3 + 2048;
        match select_displacement(target, location, Some(target - 100), 1).unwrap() {
            Displacement::BaseRelative(d) => assert_eq!(d, 100),
            _ => panic!("expected base relative"),
        }
    }

    #[test]
    fn errors_when_neither_mode_fits() {
        let location = 0u32;
        let target = location + 3 + 2048;
        let err = select_displacement(target, location, None, 1).unwrap_err();
        match err {
            AssemblyError::Instruction { reason, .. } => {
                assert!(reason.contains("BASE directive not set"));
            }
            _ => panic!("expected Instruction error"),
        }
    }

    #[test]
    fn base_relative_requires_nonnegative_offset() {
        let location = 0u32;
        let target = location + 3 + 2048;
        let err = select_displacement(target, location, Some(target + 1), 1).unwrap_err();
        assert!(matches!(err, AssemblyError::Instruction { .. }));
    }
}
