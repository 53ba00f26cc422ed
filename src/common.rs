use std::io;

use thiserror::Error;

/// Errors that could occur while building a [`Client`][crate::Client].
#[derive(Debug, Error)]
pub enum BuildError {
    /// No endpoint was configured before building the client.
    #[error("no endpoint was configured")]
    MissingEndpoint,

    /// The configured endpoint could not be parsed or dialed.
    #[error(transparent)]
    Connect(#[from] ConnectError),
}

/// Errors that could occur while resolving an address into a live connection.
#[derive(Debug, Error)]
pub enum ConnectError {
    /// The address is not a well-formed URI, or lacks a host, port or path for its scheme.
    #[error("failed to parse address `{address}`: {reason}")]
    AddressParse { address: String, reason: String },

    /// The address is a valid URI, but its scheme names a transport we do not speak.
    #[error("protocol `{scheme}` not supported")]
    UnsupportedScheme { scheme: String },

    /// The single dial attempt to the remote end failed.
    #[error("failed to connect to `{address}`: {source}")]
    Dial {
        address: String,
        #[source]
        source: io::Error,
    },
}

/// Errors that could occur while rendering a measurement into a line.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("measurement name cannot be empty")]
    EmptyName,

    #[error("measurement must carry at least one field")]
    EmptyFields,

    #[error("tag and field keys cannot be empty")]
    EmptyKey,

    /// Line breaks terminate a point on the wire and have no escape outside string fields.
    #[error("`{0}` contains a line break")]
    LineBreak(String),

    /// A trailing backslash would escape the delimiter that follows it on the wire.
    #[error("`{0}` ends with a backslash")]
    TrailingBackslash(String),

    #[error("field `{key}` is not a finite number")]
    NonFiniteField { key: String },
}

/// Errors that could occur while writing measurements to a connection.
#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to encode measurement: {0}")]
    Encode(#[from] EncodeError),

    #[error("failed to write to connection: {0}")]
    Io(#[from] io::Error),

    #[error("connection is closed")]
    Closed,
}
