//! A client for pushing measurements to a Telegraf socket listener.
//!
//! ## Basics
//!
//! `telegraf-line-client` renders measurements in the InfluxDB [line protocol] and writes them to a
//! collector over TCP, UDP or a Unix stream socket.
//!
//! ## High-level features
//!
//! - one address format for every transport: `tcp://host:port`, `udp://host:port`, `unix://path`
//! - single-point and batched writes, a batch being one write call on the connection
//! - configurable default tags (applied to all points, overridden by the point's own tags if
//!   present), including the routing tag the collector uses to pick a destination database
//! - escaping of every delimiter the line protocol reserves, so arbitrary tag and field data
//!   renders unambiguously
//!
//! ## Behavior
//!
//! This client makes some explicit trade-offs to accomplish its task:
//!
//! - There is no buffering: a write either hands its bytes to the connection or fails
//! - There is no retry, backoff or acknowledgement
//! - Tags and fields are rendered sorted by key, so identical points always render identically
//! - A client owns one connection and is not internally synchronized
//!
//! ## Usage
//!
//! ```ignore
//! use telegraf_line_client::{ClientBuilder, Measurement};
//!
//! // Configure the collector endpoint and the tags every point should carry.
//! let mut client = ClientBuilder::new()
//!     .with_endpoint("tcp://127.0.0.1:8094")?
//!     .add_default_tag("region", "us-east")
//!     .build()
//!     .await?;
//!
//! let point = Measurement::new("cpu")
//!     .add_tag("host", "srv1")
//!     .add_field("usage", 64.5)
//!     .with_timestamp(1_000_000_000);
//!
//! // Sends `cpu,host=srv1,region=us-east usage=64.5 1000000000\n`.
//! client.write_point(&point).await?;
//! client.close().await?;
//! ```
//!
//! [line protocol]: https://docs.influxdata.com/influxdb/latest/reference/syntax/line-protocol/
mod common;
pub use self::common::{BuildError, ConnectError, EncodeError, WriteError};

mod measurement;
pub use self::measurement::{FieldValue, Measurement};

mod builder;
pub use self::builder::ClientBuilder;

mod client;
pub use self::client::Client;

pub mod formatting;
pub mod tags;
pub mod transport;

pub use self::formatting::encode;
pub use self::tags::{inject, ImplicitTags, ROUTING_TAG};
pub use self::transport::{connect, ConnectAddress, Connection};
