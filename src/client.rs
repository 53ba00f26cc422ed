use tracing::{debug, trace};

use crate::common::{ConnectError, WriteError};
use crate::formatting::write_measurement_line;
use crate::measurement::Measurement;
use crate::tags::{inject, ImplicitTags};
use crate::transport::{self, Connection};

/// A client writing measurements to a collector over a single connection.
///
/// Every write applies the client's [`ImplicitTags`], renders the points in the line protocol and
/// hands the bytes to the connection in one write call. Nothing is buffered, retried or
/// acknowledged.
///
/// Writes take `&mut self`: a client has at most one write in flight. Callers sharing a client
/// between tasks need to serialize access themselves, since interleaving batches would corrupt the
/// stream.
#[derive(Debug)]
pub struct Client {
    connection: Option<Connection>,
    implicit_tags: ImplicitTags,
}

impl Client {
    /// Wraps an already established connection.
    pub fn new(connection: Connection, implicit_tags: ImplicitTags) -> Self {
        Self {
            connection: Some(connection),
            implicit_tags,
        }
    }

    /// Dials `address` and returns a client with no implicit tags.
    ///
    /// Use [`ClientBuilder`][crate::ClientBuilder] to configure default or routing tags.
    ///
    /// ## Errors
    ///
    /// If the address cannot be parsed or dialed, an error variant will be returned describing
    /// the error.
    pub async fn connect(address: &str) -> Result<Self, ConnectError> {
        let connection = transport::connect(address).await?;
        Ok(Self::new(connection, ImplicitTags::none()))
    }

    pub fn implicit_tags(&self) -> &ImplicitTags {
        &self.implicit_tags
    }

    pub fn is_closed(&self) -> bool {
        self.connection.is_none()
    }

    /// Writes a single measurement, followed by a line terminator.
    ///
    /// For multiple measurements at once, use [`write_points`][Self::write_points].
    pub async fn write_point(&mut self, point: &Measurement) -> Result<(), WriteError> {
        if self.connection.is_none() {
            return Err(WriteError::Closed);
        }

        let mut payload = String::new();
        write_measurement_line(&mut payload, &inject(point, &self.implicit_tags))?;
        payload.push('\n');

        self.send(payload.as_bytes()).await
    }

    /// Writes a batch of measurements with a single write call.
    ///
    /// Each point is rendered on its own line and the payload ends with a line terminator. If any
    /// point fails to encode, nothing is written. Once the payload reaches the transport there is
    /// no way to tell which points made it if the write fails part way; callers that need per-point
    /// delivery should use [`write_point`][Self::write_point].
    ///
    /// An empty batch writes nothing.
    pub async fn write_points(&mut self, points: &[Measurement]) -> Result<(), WriteError> {
        if self.connection.is_none() {
            return Err(WriteError::Closed);
        }
        if points.is_empty() {
            return Ok(());
        }

        let mut payload = String::new();
        for point in points {
            write_measurement_line(&mut payload, &inject(point, &self.implicit_tags))?;
            payload.push('\n');
        }

        self.send(payload.as_bytes()).await
    }

    /// Shuts down and releases the connection.
    ///
    /// Any later write fails with [`WriteError::Closed`]. Closing an already closed client does
    /// nothing. Dropping the client releases the connection as well.
    pub async fn close(&mut self) -> Result<(), WriteError> {
        match self.connection.take() {
            Some(mut connection) => {
                debug!(peer = %connection.peer(), "closing connection to collector");
                connection.shutdown().await?;
                Ok(())
            }
            None => Ok(()),
        }
    }

    async fn send(&mut self, payload: &[u8]) -> Result<(), WriteError> {
        let connection = self.connection.as_mut().ok_or(WriteError::Closed)?;
        connection.send(payload).await?;
        trace!(bytes = payload.len(), "wrote payload to collector");
        Ok(())
    }
}
