use thiserror::Error;

#[derive(Error, Debug)]
pub enum AssemblyError {
    #[error("Line {line}: {reason} (`{contents}`)")]
    LineFields {
        line: usize,
        reason: String,
        contents: String,
    },

    #[error("Line {line}: duplicate symbol `{symbol}`")]
    DuplicateSymbol { line: usize, symbol: String },

    #[error("Line {line}: unknown mnemonic `{mnemonic}`")]
    OpcodeLookup { line: usize, mnemonic: String },

    #[error("Line {line}: undefined symbol `{symbol}`")]
    UndefinedSymbol { line: usize, symbol: String },

    #[error("Line {line}: {reason}")]
    Instruction { line: usize, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
