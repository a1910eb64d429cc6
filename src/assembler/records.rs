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

use crate::ast::{ObjectRecord, PassTwoObject};

/// Maximum hex characters (30 bytes) in a single text record's payload.
const TEXT_RECORD_MAX_HEX: usize = 60;

pub fn generate(
    objects: &[PassTwoObject],
    program_name: &str,
    start_address: u32,
    program_length: u32,
) -> Vec<ObjectRecord> {
    let mut records = vec![ObjectRecord::Header {
        name: program_name.to_string(),
        start: start_address,
        length: program_length,
    }];

    records.extend(generate_text_records(objects));

    records.push(ObjectRecord::End {
        first_instruction: start_address,
    });

    records
}

fn generate_text_records(objects: &[PassTwoObject]) -> Vec<ObjectRecord> {
    let mut records = Vec::new();
    let mut current_start: Option<u32> = None;
    let mut payload = String::new();

    let flush = |start: &mut Option<u32>, payload: &mut String, records: &mut Vec<ObjectRecord>| {
        if let Some(start) = start.take() {
            if !payload.is_empty() {
                records.push(ObjectRecord::Text {
                    start,
                    payload: std::mem::take(payload),
                });
            }
        }
    };

    for object in objects {
        match object {
            PassTwoObject::Reservation { .. } => {
                // A reservation breaks the current text record: it
                // occupies address space without emitting bytes.
                flush(&mut current_start, &mut payload, &mut records);
            }
            PassTwoObject::Encoded(location, instruction) => {
                let hex = instruction.to_hex();
                if hex.is_empty() {
                    continue;
                }
                if current_start.is_some() && payload.len() + hex.len() > TEXT_RECORD_MAX_HEX {
                    flush(&mut current_start, &mut payload, &mut records);
                }
                if current_start.is_none() {
                    current_start = Some(*location);
                }
                payload.push_str(&hex);
            }
        }
    }

    flush(&mut current_start, &mut payload, &mut records);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::EncodedInstruction;

    fn encoded(location: u32, hex_opcode: u8) -> PassTwoObject {
        PassTwoObject::Encoded(location, EncodedInstruction::Format1 { opcode: hex_opcode })
    }

    #[test]
    fn header_text_end_ordering() {
        let objects = vec![encoded(0, 0xC4)];
        let records = generate(&objects, "COPY", 0x1000, 0x107A);
        assert!(matches!(records[0], ObjectRecord::Header { .. }));
        assert!(matches!(records.last().unwrap(), ObjectRecord::End { .. }));
    }

    #[test]
    fn reservation_breaks_a_text_record() {
        let objects = vec![
            encoded(0, 0xC4),
            PassTwoObject::Reservation {
                location: 1,
                length: 10,
            },
            encoded(11, 0xC8),
        ];
        let records = generate(&objects, "COPY", 0, 12);
        let text_records: Vec<_> = records
            .iter()
            .filter(|r| matches!(r, ObjectRecord::Text { .. }))
            .collect();
        assert_eq!(text_records.len(), 2);
    }

    #[test]
    fn text_record_caps_at_sixty_hex_chars() {
        // 21 format-1 objects = 42 hex chars fits; a 31st pushes over 60.
        let objects: Vec<_> = (0..31).map(|i| encoded(i, 0xC4)).collect();
        let records = generate(&objects, "COPY", 0, 31);
        let text_records: Vec<_> = records
            .iter()
            .filter_map(|r| match r {
                ObjectRecord::Text { payload, .. } => Some(payload),
                _ => None,
            })
            .collect();
        assert!(text_records.len() >= 2);
        for payload in &text_records {
            assert!(payload.len() <= 60);
            assert_eq!(payload.len() % 2, 0);
        }
    }

    #[test]
    fn byte_count_matches_payload_length() {
        let objects = vec![encoded(0, 0xC4), encoded(1, 0xC8)];
        let records = generate(&objects, "COPY", 0, 2);
        if let ObjectRecord::Text { payload, .. } = &records[1] {
            assert_eq!(payload.len() / 2, 2);
        } else {
            panic!("expected a text record");
        }
    }
}
