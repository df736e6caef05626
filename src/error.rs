use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    io,
};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Grib0Error {
    ParseError(ParseError),
    DecodeError(DecodeError),
    ResolveError(ResolveError),
}

impl Error for Grib0Error {}

impl From<ParseError> for Grib0Error {
    fn from(e: ParseError) -> Self {
        Self::ParseError(e)
    }
}

impl From<DecodeError> for Grib0Error {
    fn from(e: DecodeError) -> Self {
        Self::DecodeError(e)
    }
}

impl From<ResolveError> for Grib0Error {
    fn from(e: ResolveError) -> Self {
        Self::ResolveError(e)
    }
}

impl Display for Grib0Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::ParseError(e) => write!(f, "{e}"),
            Self::DecodeError(e) => write!(f, "{e}"),
            Self::ResolveError(e) => write!(f, "{e}"),
        }
    }
}

impl Grib0Error {
    /// Whether iteration can continue past this error by resuming the
    /// sentinel search from the failed message's recovery point.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::ParseError(ParseError::ReadError(_)))
    }
}

/// Errors in the wire-level structure of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ParseError {
    ReadError(String),
    SentinelNotFound,
    UnexpectedEndOfData(&'static str),
    SectionLengthOutOfRange { section: u8, length: u32 },
    TrailerMismatch,
    UnknownRepresentation(u8),
    UnknownPredefinedGrid(u8),
}

impl Error for ParseError {}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::ReadError(s) => write!(f, "Read error: {s}"),
            Self::SentinelNotFound => write!(f, "End of data inside GRIB sentinel"),
            Self::UnexpectedEndOfData(s) => write!(f, "Unexpected end of data in {s}"),
            Self::SectionLengthOutOfRange { section, length } => {
                write!(f, "Section {section} length out of range: {length}")
            }
            Self::TrailerMismatch => write!(f, "Content of '7777' trailer is not valid"),
            Self::UnknownRepresentation(r) => {
                write!(f, "Unknown data representation type: {r}")
            }
            Self::UnknownPredefinedGrid(n) => {
                write!(f, "No grid definition for grid number {n}")
            }
        }
    }
}

impl From<io::Error> for ParseError {
    fn from(e: io::Error) -> Self {
        Self::ReadError(e.to_string())
    }
}

/// Errors in unpacking the bit-packed binary data.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DecodeError {
    BitReaderOutOfRange {
        first_bit: usize,
        n_bits: usize,
        available: usize,
    },
    DataSizeMismatch {
        expected: usize,
        actual: usize,
    },
}

impl Error for DecodeError {}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::BitReaderOutOfRange {
                first_bit,
                n_bits,
                available,
            } => write!(
                f,
                "Bit field [{first_bit}, {first_bit}+{n_bits}) exceeds {available} available bits"
            ),
            Self::DataSizeMismatch { expected, actual } => write!(
                f,
                "Wrong number of binary data values: expected {expected}, packed {actual}"
            ),
        }
    }
}

/// Errors in translating decoded numbers into identifiers, timestamps
/// and map projections.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ResolveError {
    UnsupportedTimeRange { range_type: u8, unit: u8 },
    LookupMiss { kind: LookupKind },
    UnsupportedGridFeature(String),
}

impl Error for ResolveError {}

impl Display for ResolveError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::UnsupportedTimeRange { range_type, unit } => write!(
                f,
                "Unrecognizable time range indicator {range_type} or forecast time unit {unit}"
            ),
            Self::LookupMiss { kind } => write!(f, "Unrecognizable {kind} code"),
            Self::UnsupportedGridFeature(s) => write!(f, "Unsupported grid feature: {s}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Model,
    Element,
    Level,
}

impl Display for LookupKind {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Self::Model => write!(f, "model"),
            Self::Element => write!(f, "element"),
            Self::Level => write!(f, "level"),
        }
    }
}
