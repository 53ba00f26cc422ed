use crate::client::Client;
use crate::common::BuildError;
use crate::tags::{ImplicitTags, ROUTING_TAG};
use crate::transport::ConnectAddress;

/// Builder for configuring and connecting a [`Client`].
#[derive(Clone, Debug, Default)]
pub struct ClientBuilder {
    endpoint: Option<ConnectAddress>,
    implicit_tags: ImplicitTags,
}

impl ClientBuilder {
    /// Creates a new [`ClientBuilder`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the collector to connect to.
    ///
    /// The endpoint is a URL whose scheme picks the transport: `tcp://host:port`,
    /// `udp://host:port` or `unix://path`.
    ///
    /// ## Errors
    ///
    /// If the given endpoint cannot be parsed, or uses an unsupported scheme, an error variant will
    /// be returned describing the error.
    pub fn with_endpoint(mut self, endpoint: &str) -> Result<Self, BuildError> {
        self.endpoint = Some(endpoint.parse()?);
        Ok(self)
    }

    /// Adds a default tag to this client.
    ///
    /// Default tags are applied to all points. Tags defined on the point itself have precedence
    /// over any default tags. If this method is called multiple times, the latest value for a
    /// given tag key will be used.
    #[must_use]
    pub fn add_default_tag<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.implicit_tags = self.implicit_tags.with_tag(key, value);
        self
    }

    /// Adds several default tags at once.
    ///
    /// See [`add_default_tag`][Self::add_default_tag].
    #[must_use]
    pub fn set_default_tags<I, K, V>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        for (key, value) in tags {
            self.implicit_tags = self.implicit_tags.with_tag(key, value);
        }
        self
    }

    /// Routes every point to the given destination database.
    ///
    /// This sets the [`ROUTING_TAG`] as a default tag, so a point carrying its own routing tag is
    /// still sent where it asks to go.
    #[must_use]
    pub fn set_routing_tag<V>(self, destination: V) -> Self
    where
        V: Into<String>,
    {
        self.add_default_tag(ROUTING_TAG, destination)
    }

    /// Replaces all implicit tags configured so far.
    #[must_use]
    pub fn set_implicit_tags(mut self, implicit_tags: ImplicitTags) -> Self {
        self.implicit_tags = implicit_tags;
        self
    }

    /// Dials the configured endpoint and returns the connected client.
    ///
    /// ## Errors
    ///
    /// If no endpoint was configured, or the dial attempt fails, an error variant will be returned
    /// describing the error.
    pub async fn build(self) -> Result<Client, BuildError> {
        let endpoint = self.endpoint.ok_or(BuildError::MissingEndpoint)?;
        let connection = endpoint.connect().await?;
        Ok(Client::new(connection, self.implicit_tags))
    }
}
