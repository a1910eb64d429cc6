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
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::errors::AssemblyError;

/// Source-input abstraction, so pass 1's "lazy line sequence" can be
/// driven from the filesystem in production or from an in-memory
/// fixture in tests, without either caller knowing the difference.
pub trait FileReader {
    fn read_to_string(&self, path: &Path) -> Result<String, AssemblyError>;
}

/// Production file reader, backed by `std::fs`.
pub struct AsmFileReader;

impl FileReader for AsmFileReader {
    fn read_to_string(&self, path: &Path) -> Result<String, AssemblyError> {
        Ok(fs::read_to_string(path)?)
    }
}

/// In-memory file reader used by integration tests.
#[derive(Default)]
pub struct MockFileReader {
    files: HashMap<PathBuf, String>,
}

impl MockFileReader {
    pub fn add_file(&mut self, path: &str, content: &str) {
        self.files
            .insert(PathBuf::from(path), content.to_string());
    }
}

impl FileReader for MockFileReader {
    fn read_to_string(&self, path: &Path) -> Result<String, AssemblyError> {
        self.files.get(path).cloned().ok_or_else(|| {
            AssemblyError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("mock file not found: {}", path.display()),
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_reader_returns_added_file() {
        let mut reader = MockFileReader::default();
        reader.add_file("test.asm", "RSUB\n");
        assert_eq!(
            reader.read_to_string(Path::new("test.asm")).unwrap(),
            "RSUB\n"
        );
    }

    #[test]
    fn mock_reader_reports_missing_file_as_io_error() {
        let reader = MockFileReader::default();
        let err = reader.read_to_string(Path::new("missing.asm")).unwrap_err();
        assert!(matches!(err, AssemblyError::Io(_)));
    }
}
