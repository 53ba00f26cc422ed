use std::fmt;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
#[cfg(unix)]
use std::path::PathBuf;
use std::str::FromStr;

#[cfg(unix)]
use percent_encoding::percent_decode_str;
use tokio::io::AsyncWriteExt as _;
use tokio::net::{lookup_host, TcpStream, UdpSocket};
use tracing::debug;
use url::Url;

use crate::common::ConnectError;

/// The address of a collector.
///
/// In textual form, addresses are URLs, with the scheme selecting the transport:
///
/// - `tcp://127.0.0.1:8094` (TCP stream)
/// - `udp://collector.local:8092` (UDP datagrams)
/// - `unix:///var/run/telegraf.sock` (Unix stream socket)
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConnectAddress {
    /// A `host:port` pair reached over TCP.
    Tcp(String),

    /// A `host:port` pair reached over UDP.
    Udp(String),

    /// A Unix stream socket path.
    #[cfg(unix)]
    Unix(PathBuf),
}

impl ConnectAddress {
    /// Returns the transport name of the address, which is also its URL scheme.
    pub const fn transport_type(&self) -> &'static str {
        match self {
            Self::Tcp(_) => "tcp",
            Self::Udp(_) => "udp",
            #[cfg(unix)]
            Self::Unix(_) => "unix",
        }
    }

    /// Dials the address.
    ///
    /// A single attempt is made, bounded only by the operating system's own connect timeout.
    ///
    /// ## Errors
    ///
    /// If the host cannot be resolved or the remote end refuses the connection, a
    /// [`ConnectError::Dial`] is returned.
    pub async fn connect(&self) -> Result<Connection, ConnectError> {
        let dial_error = |source: io::Error| ConnectError::Dial {
            address: self.to_string(),
            source,
        };

        let connection = match self {
            Self::Tcp(host) => TcpStream::connect(host.as_str())
                .await
                .map(Connection::Tcp)
                .map_err(dial_error)?,
            Self::Udp(host) => dial_udp(host).await.map(Connection::Udp).map_err(dial_error)?,
            #[cfg(unix)]
            Self::Unix(path) => tokio::net::UnixStream::connect(path)
                .await
                .map(Connection::Unix)
                .map_err(dial_error)?,
        };

        debug!(transport = self.transport_type(), address = %self, "connected to collector");
        Ok(connection)
    }
}

async fn dial_udp(host: &str) -> io::Result<UdpSocket> {
    let endpoint = lookup_host(host).await?.next().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "lookup_host returned an empty iterator",
        )
    })?;

    let local = match endpoint {
        SocketAddr::V4(_) => SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0)),
        SocketAddr::V6(_) => SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0)),
    };
    let socket = UdpSocket::bind(local).await?;
    socket.connect(endpoint).await?;
    Ok(socket)
}

impl fmt::Display for ConnectAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp(host) => write!(f, "tcp://{}", host),
            Self::Udp(host) => write!(f, "udp://{}", host),
            #[cfg(unix)]
            Self::Unix(path) => write!(f, "unix://{}", path.display()),
        }
    }
}

impl FromStr for ConnectAddress {
    type Err = ConnectError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parse_error = |reason: &str| ConnectError::AddressParse {
            address: value.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(value).map_err(|e| parse_error(&e.to_string()))?;

        match url.scheme() {
            scheme @ ("tcp" | "udp") => {
                let host = url
                    .host_str()
                    .filter(|host| !host.is_empty())
                    .ok_or_else(|| parse_error("address must have a host"))?;
                let port = url
                    .port()
                    .ok_or_else(|| parse_error("address must have a port"))?;

                // IPv6 hosts keep their brackets, which `host:port` resolution expects.
                let host_port = format!("{}:{}", host, port);
                if scheme == "tcp" {
                    Ok(Self::Tcp(host_port))
                } else {
                    Ok(Self::Udp(host_port))
                }
            }
            #[cfg(unix)]
            "unix" => {
                // `unix:///abs/path` carries the whole path in the URL path, while
                // `unix://relative/path` puts its first segment in the authority.
                let encoded = format!("{}{}", url.host_str().unwrap_or_default(), url.path());
                let path = percent_decode_str(&encoded)
                    .decode_utf8()
                    .map_err(|_| parse_error("socket path is not valid UTF-8"))?;
                if path.is_empty() {
                    return Err(parse_error("socket path cannot be empty"));
                }
                Ok(Self::Unix(PathBuf::from(path.into_owned())))
            }
            scheme => Err(ConnectError::UnsupportedScheme {
                scheme: scheme.to_string(),
            }),
        }
    }
}

impl<'a> TryFrom<&'a str> for ConnectAddress {
    type Error = ConnectError;

    fn try_from(value: &'a str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Parses `address` and dials it.
///
/// ## Errors
///
/// Returns [`ConnectError::AddressParse`] for malformed addresses,
/// [`ConnectError::UnsupportedScheme`] for schemes other than `tcp`, `udp` and `unix`, and
/// [`ConnectError::Dial`] if the connection attempt itself fails.
pub async fn connect(address: &str) -> Result<Connection, ConnectError> {
    address.parse::<ConnectAddress>()?.connect().await
}

/// An open connection to a collector.
#[derive(Debug)]
pub enum Connection {
    Tcp(TcpStream),
    /// A UDP socket connected to a single peer.
    Udp(UdpSocket),
    #[cfg(unix)]
    Unix(tokio::net::UnixStream),
}

impl Connection {
    /// Writes `buf` to the connection in a single logical write.
    ///
    /// Stream connections write the whole buffer; datagram connections send it as one datagram.
    pub async fn send(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Self::Tcp(inner) => inner.write_all(buf).await,
            Self::Udp(inner) => {
                let nsent = inner.send(buf).await?;
                if nsent != buf.len() {
                    return Err(io::Error::new(
                        io::ErrorKind::WriteZero,
                        format!(
                            "UDP socket sent fewer bytes ({}) than it was asked ({})",
                            nsent,
                            buf.len()
                        ),
                    ));
                }
                Ok(())
            }
            #[cfg(unix)]
            Self::Unix(inner) => inner.write_all(buf).await,
        }
    }

    /// Shuts down the write half of stream connections.
    ///
    /// Datagram sockets have nothing to shut down; they are released on drop.
    pub async fn shutdown(&mut self) -> io::Result<()> {
        match self {
            Self::Tcp(inner) => inner.shutdown().await,
            Self::Udp(_) => Ok(()),
            #[cfg(unix)]
            Self::Unix(inner) => inner.shutdown().await,
        }
    }

    /// Returns a human-readable description of the remote end.
    pub fn peer(&self) -> String {
        let peer = match self {
            Self::Tcp(inner) => inner.peer_addr().map(|addr| format!("tcp://{}", addr)),
            Self::Udp(inner) => inner.peer_addr().map(|addr| format!("udp://{}", addr)),
            #[cfg(unix)]
            Self::Unix(inner) => inner.peer_addr().map(|addr| match addr.as_pathname() {
                Some(path) => format!("unix://{}", path.display()),
                None => "unix://<unnamed>".to_string(),
            }),
        };
        peer.unwrap_or_else(|_| "<unknown>".to_string())
    }
}
