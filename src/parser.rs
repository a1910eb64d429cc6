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

use crate::ast::SourceLine;
use crate::errors::AssemblyError;

/// True if a line contains nothing but whitespace.
pub fn is_blank(line: &str) -> bool {
    line.split_whitespace().next().is_none()
}

/// True if the first whitespace-separated field begins with `.`.
pub fn is_comment(line: &str) -> bool {
    line.split_whitespace()
        .next()
        .map(|field| field.starts_with('.'))
        .unwrap_or(false)
}

/// Truncates a field list at the first field that begins a comment.
fn remove_comment_fields(fields: Vec<&str>) -> Vec<&str> {
    match fields.iter().position(|f| f.starts_with('.')) {
        Some(index) => fields[..index].to_vec(),
        None => fields,
    }
}

/// If a field (other than the last) ends with a trailing comma, that
/// field and the one following it were split by whitespace around the
/// comma in a two-register operand (`ADDR A, S`); rejoin them.
fn rejoin_trailing_comma(mut fields: Vec<String>) -> Vec<String> {
    for i in 0..fields.len().saturating_sub(1) {
        if fields[i].ends_with(',') {
            let rest = fields.remove(i + 1);
            fields[i].push_str(&rest);
            break;
        }
    }
    fields
}

/// Parses one source line, given its 1-based line number. Returns
/// `Ok(None)` for a blank or comment-only line.
pub fn parse(line: &str, line_number: usize) -> Result<Option<SourceLine>, AssemblyError> {
    if is_blank(line) {
        return Ok(None);
    }
    if is_comment(line) {
        return Ok(None);
    }

    let raw_fields = remove_comment_fields(line.split_whitespace().collect());
    let fields: Vec<String> = raw_fields.into_iter().map(|s| s.to_string()).collect();
    let fields = rejoin_trailing_comma(fields);

    match fields.len() {
        3 => Ok(Some(SourceLine::new(
            line_number,
            Some(fields[0].clone()),
            fields[1].clone(),
            Some(fields[2].clone()),
            line.to_string(),
        ))),
        2 => Ok(Some(SourceLine::new(
            line_number,
            None,
            fields[0].clone(),
            Some(fields[1].clone()),
            line.to_string(),
        ))),
        1 => Ok(Some(SourceLine::new(
            line_number,
            None,
            fields[0].clone(),
            None,
            line.to_string(),
        ))),
        _ => Err(AssemblyError::LineFields {
            line: line_number,
            reason: format!("expected 1-3 fields, found {}", fields.len()),
            contents: line.to_string(),
        }),
    }
}

/// Addressing-mode recognisers, operating on the raw operand text.
pub fn is_indexed(operand: &str) -> bool {
    operand.ends_with(",X")
}

pub fn is_indirect(operand: &str) -> bool {
    operand.starts_with('@')
}

pub fn is_immediate(operand: &str) -> bool {
    operand.starts_with('#')
}

pub fn is_extended(mnemonic: &str) -> bool {
    mnemonic.starts_with('+')
}

pub fn is_literal(operand: &str) -> bool {
    operand.starts_with('=')
}

/// Strips the addressing-mode prefix/suffix from an operand, leaving
/// the bare symbol or immediate value.
pub fn strip_addressing(operand: &str) -> &str {
    if is_indexed(operand) {
        &operand[..operand.len() - 2]
    } else if is_indirect(operand) || is_immediate(operand) {
        &operand[1..]
    } else {
        operand
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_field_line() {
        let line = parse("FIRST STL RETADR", 1).unwrap().unwrap();
        assert_eq!(line.label.as_deref(), Some("FIRST"));
        assert_eq!(line.mnemonic, "STL");
        assert_eq!(line.operand.as_deref(), Some("RETADR"));
    }

    #[test]
    fn two_field_line_has_no_label() {
        let line = parse("LDB #LENGTH", 2).unwrap().unwrap();
        assert_eq!(line.label, None);
        assert_eq!(line.mnemonic, "LDB");
        assert_eq!(line.operand.as_deref(), Some("#LENGTH"));
    }

    #[test]
    fn one_field_line_has_no_operand() {
        let line = parse("RSUB", 3).unwrap().unwrap();
        assert_eq!(line.mnemonic, "RSUB");
        assert_eq!(line.operand, None);
    }

    #[test]
    fn comma_space_in_two_register_operand_is_rejoined() {
        let line = parse("COMPR A, S", 4).unwrap().unwrap();
        assert_eq!(line.operand.as_deref(), Some("A,S"));
    }

    #[test]
    fn two_field_single_register_operand() {
        let line = parse("TIXR T", 5).unwrap().unwrap();
        assert_eq!(line.operand.as_deref(), Some("T"));
        assert_eq!(line.mnemonic, "TIXR");
    }

    #[test]
    fn trailing_comment_is_stripped() {
        let line = parse("FIRST STL RETADR .save the return address", 1)
            .unwrap()
            .unwrap();
        assert_eq!(line.operand.as_deref(), Some("RETADR"));
    }

    #[test]
    fn blank_line_is_none() {
        assert_eq!(parse("   ", 1).unwrap(), None);
    }

    #[test]
    fn comment_only_line_is_none() {
        assert_eq!(parse(".this is a comment", 1).unwrap(), None);
    }

    #[test]
    fn too_many_fields_is_an_error() {
        let err = parse("A B C D", 9).unwrap_err();
        assert!(matches!(err, AssemblyError::LineFields { line: 9, .. }));
    }

    #[test]
    fn addressing_recognisers() {
        assert!(is_indexed("BUFFER,X"));
        assert!(is_indirect("@RETADR"));
        assert!(is_immediate("#LENGTH"));
        assert!(is_extended("+JSUB"));
        assert!(is_literal("=X'05'"));
        assert_eq!(strip_addressing("BUFFER,X"), "BUFFER");
        assert_eq!(strip_addressing("@RETADR"), "RETADR");
        assert_eq!(strip_addressing("#LENGTH"), "LENGTH");
    }
}
