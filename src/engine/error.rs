use std::fmt;
use std::io;

use crate::protocol::error::ContainerError;

#[derive(Debug)]
pub enum CodecError {
    SourceRead(io::Error),
    SinkWrite(io::Error),
    SourceChanged,
    MalformedContainer(ContainerError),
    DecodeTraversal { bit_offset: u64 },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::SourceRead(e) =>
                write!(f, "failed to read source: {}", e),
            CodecError::SinkWrite(e) =>
                write!(f, "failed to write output: {}", e),
            CodecError::SourceChanged =>
                write!(f, "source changed between counting and encoding passes"),
            CodecError::MalformedContainer(e) =>
                write!(f, "malformed container: {}", e),
            CodecError::DecodeTraversal { bit_offset } =>
                write!(f, "bit {} does not lead to a tree node", bit_offset),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::SourceRead(e) | CodecError::SinkWrite(e) => Some(e),
            CodecError::MalformedContainer(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ContainerError> for CodecError {
    fn from(e: ContainerError) -> Self {
        CodecError::MalformedContainer(e)
    }
}
