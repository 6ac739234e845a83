/*!
    Status codes and the error type shared by the beam crates.
*/

use std::fmt;
use std::panic::Location;

use thiserror::Error;

/**
    Stable numeric status code carried by every surfaced error.

    Codes below [`Status::ERROR_START`] are reported by the host runtime
    itself, codes from [`Status::ERROR_START`] upwards belong to the bridge.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Status(pub i32);

impl Status {
    pub const OK: Self = Self(0);
    /// Generic host runtime failure.
    pub const RUNTIME: Self = Self(9);
    /// Background work was cancelled by the runtime before it completed.
    pub const CANCELLED: Self = Self(11);

    /// First code reserved for bridge errors.
    pub const ERROR_START: i32 = 5000;
    pub const INVALID_ARGS: Self = Self(5001);
    pub const ALLOC_ENCODER: Self = Self(5002);
    pub const ALLOC_DECODER: Self = Self(5003);
    pub const MARSHAL: Self = Self(5004);
    pub const ENCODE: Self = Self(5005);

    /**
        Returns true for the success status.
    */
    pub const fn is_ok(self) -> bool {
        self.0 == 0
    }

    /**
        Returns true if this status was reported by the host runtime
        rather than by the bridge.
    */
    pub const fn is_runtime(self) -> bool {
        self.0 != 0 && self.0 < Self::ERROR_START
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/**
    Classification of a bridge error.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Malformed or missing request fields, detected before scheduling.
    InvalidRequest,
    /// The native library could not find, allocate or open an encoder.
    AllocEncoder,
    /// The native library could not find, allocate or open a decoder.
    AllocDecoder,
    /// A property failed to convert between a bag and a record.
    Marshal,
    /// The pass-through encode step failed.
    Encode,
    /// The host runtime failed while scheduling or settling an operation.
    Runtime,
    /// The host runtime cancelled background work.
    Cancelled,
}

impl ErrorKind {
    /**
        The stable status code for this kind of error.
    */
    pub const fn status(self) -> Status {
        match self {
            Self::InvalidRequest => Status::INVALID_ARGS,
            Self::AllocEncoder => Status::ALLOC_ENCODER,
            Self::AllocDecoder => Status::ALLOC_DECODER,
            Self::Marshal => Status::MARSHAL,
            Self::Encode => Status::ENCODE,
            Self::Runtime => Status::RUNTIME,
            Self::Cancelled => Status::CANCELLED,
        }
    }
}

/**
    Error type for the beam crates.

    Records where the error was detected, so diagnostics point at the
    failing step rather than at the place the error was finally surfaced.
*/
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("In file {file} on line {line}, found error: {message}")]
pub struct Error {
    kind: ErrorKind,
    message: String,
    file: &'static str,
    line: u32,
}

impl Error {
    /**
        Create an error of the given kind, located at the caller.
    */
    #[track_caller]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        let location = Location::caller();
        Self {
            kind,
            message: message.into(),
            file: location.file(),
            line: location.line(),
        }
    }

    #[track_caller]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidRequest, message)
    }

    #[track_caller]
    pub fn alloc_encoder(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AllocEncoder, message)
    }

    #[track_caller]
    pub fn alloc_decoder(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::AllocDecoder, message)
    }

    #[track_caller]
    pub fn encode(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Encode, message)
    }

    #[track_caller]
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Runtime, message)
    }

    #[track_caller]
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Cancelled, message)
    }

    /**
        Create a marshalling error for a value of the wrong kind.
    */
    #[track_caller]
    pub fn marshal(field: &str, expected: &str, actual: &str) -> Self {
        Self::new(
            ErrorKind::Marshal,
            format!("property '{field}' expected {expected} but got {actual}"),
        )
    }

    /**
        Create a marshalling error for a sequence of the wrong length.
    */
    #[track_caller]
    pub fn marshal_size(field: &str, max: usize, actual: usize) -> Self {
        Self::new(
            ErrorKind::Marshal,
            format!("property '{field}' holds at most {max} entries but got {actual}"),
        )
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn status(&self) -> Status {
        self.kind.status()
    }

    /**
        The message without the location prefix.
    */
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn file(&self) -> &'static str {
        self.file
    }

    pub fn line(&self) -> u32 {
        self.line
    }
}

static_assertions::assert_impl_all!(Error: Send, Sync);

/**
    Result type alias for the beam crates.
*/
pub type Result<T> = std::result::Result<T, Error>;
