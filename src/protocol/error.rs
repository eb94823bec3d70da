use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerError {
    InvalidMagic,
    UnsupportedVersion(u16),
    TruncatedHeader(usize),
    FrequencyOverflow,
    TruncatedPayload { expected: u64, actual: u64 },
    TrailingBytes { expected: u64 },
    NonZeroPadding,
}

impl fmt::Display for ContainerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContainerError::InvalidMagic =>
                write!(f, "invalid container magic"),
            ContainerError::UnsupportedVersion(v) =>
                write!(f, "unsupported container version {}", v),
            ContainerError::TruncatedHeader(len) =>
                write!(f, "truncated header: {} bytes", len),
            ContainerError::FrequencyOverflow =>
                write!(f, "frequency table total overflows"),
            ContainerError::TruncatedPayload { expected, actual } =>
                write!(f, "truncated payload: expected {} bytes, found {}", expected, actual),
            ContainerError::TrailingBytes { expected } =>
                write!(f, "payload longer than the expected {} bytes", expected),
            ContainerError::NonZeroPadding =>
                write!(f, "nonzero padding bits after last symbol"),
        }
    }
}

impl std::error::Error for ContainerError {}
