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
use crate::errors::AssemblyError;

/// Looks up a label, producing the pass-2 `UndefinedSymbol` error with
/// line context if it was never defined in pass 1.
pub fn get_symbol(
    symbol_table: &SymbolTable,
    label_name: &str,
    line_num: usize,
) -> Result<u32, AssemblyError> {
    symbol_table
        .get(label_name)
        .copied()
        .ok_or_else(|| AssemblyError::UndefinedSymbol {
            line: line_num,
            symbol: label_name.to_string(),
        })
}

/// Inserts a new label definition, failing if it was already defined
/// earlier in pass 1.
pub fn define_symbol(
    symbol_table: &mut SymbolTable,
    label_name: &str,
    address: u32,
    line_num: usize,
) -> Result<(), AssemblyError> {
    if symbol_table.contains_key(label_name) {
        return Err(AssemblyError::DuplicateSymbol {
            line: line_num,
            symbol: label_name.to_string(),
        });
    }
    symbol_table.insert(label_name.to_string(), address);
    Ok(())
}
