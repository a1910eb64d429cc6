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

use crate::ast::EncodedInstruction;
use crate::errors::AssemblyError;

/// Format 1 (8 bits): the opcode byte alone, no operands.
pub fn encode_format1(opcode: u8) -> Result<EncodedInstruction, AssemblyError> {
    Ok(EncodedInstruction::Format1 { opcode })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_opcode_byte() {
        let instr = encode_format1(0xC4).unwrap();
        assert_eq!(instr.to_hex(), "C4");
    }
}
