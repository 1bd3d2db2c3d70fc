//! One blocking request/response round-trip with the PDT endpoint.
//!
//! # Design
//! The connection lives entirely inside [`exchange`]: connect (30 s bound),
//! optionally wrap in TLS, write the prepared request in one send, then read
//! line-by-line until the stream ends. Headers are discarded; everything
//! after the first empty CRLF line accumulates into the body buffer. The
//! socket also carries a 30 s read timeout, bounding the read loop even
//! against a stalled peer.
//!
//! An HTTP/1.0 peer signals the end of the body by closing the connection,
//! and TLS peers commonly do so without a close_notify, so an unexpected-EOF
//! read past the boundary is treated as end-of-stream rather than an error.

use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::endpoint::ResolvedEndpoint;
use crate::error::PdtError;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);
const READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Plaintext or TLS-wrapped stream for one exchange.
enum Transport {
    Plain(TcpStream),
    Tls(Box<rustls::StreamOwned<rustls::ClientConnection, TcpStream>>),
}

impl Read for Transport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Transport::Plain(stream) => stream.read(buf),
            Transport::Tls(stream) => stream.read(buf),
        }
    }
}

impl Write for Transport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Transport::Plain(stream) => stream.write(buf),
            Transport::Tls(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Transport::Plain(stream) => stream.flush(),
            Transport::Tls(stream) => stream.flush(),
        }
    }
}

/// Send `request` to `endpoint` and return the response body: every line
/// after the first empty CRLF line, verbatim, line terminators included.
///
/// Returns [`PdtError::MissingBoundary`] when the stream ends before that
/// empty line is seen.
pub fn exchange(endpoint: &ResolvedEndpoint, request: &[u8]) -> Result<String, PdtError> {
    let tcp = connect(&endpoint.host, endpoint.port)?;
    tcp.set_read_timeout(Some(READ_TIMEOUT)).map_err(PdtError::Io)?;

    let mut transport = if endpoint.encrypted {
        tls_wrap(&endpoint.host, tcp)?
    } else {
        Transport::Plain(tcp)
    };

    transport.write_all(request).map_err(PdtError::Io)?;
    transport.flush().map_err(PdtError::Io)?;
    debug!(
        host = %endpoint.host,
        port = endpoint.port,
        encrypted = endpoint.encrypted,
        "request sent"
    );

    let body = read_body(transport)?;
    debug!(bytes = body.len(), "response body read");
    Ok(body)
}

/// Connect to the first reachable address for `(host, port)`.
fn connect(host: &str, port: u16) -> Result<TcpStream, PdtError> {
    let addrs = (host, port).to_socket_addrs().map_err(PdtError::Connect)?;

    let mut last_err = None;
    for addr in addrs {
        match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
            Ok(stream) => return Ok(stream),
            Err(e) => last_err = Some(e),
        }
    }
    Err(PdtError::Connect(last_err.unwrap_or_else(|| {
        io::Error::new(io::ErrorKind::NotFound, "host resolved to no addresses")
    })))
}

/// Wrap an established TCP stream in a rustls client session for `host`,
/// trusting the webpki root set.
fn tls_wrap(host: &str, tcp: TcpStream) -> Result<Transport, PdtError> {
    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = rustls::ClientConfig::builder()
        .with_root_certificates(roots)
        .with_no_client_auth();

    let name = rustls::pki_types::ServerName::try_from(host.to_string())
        .map_err(|e| PdtError::Tls(e.to_string()))?;
    let session = rustls::ClientConnection::new(Arc::new(config), name)
        .map_err(|e| PdtError::Tls(e.to_string()))?;

    Ok(Transport::Tls(Box::new(rustls::StreamOwned::new(session, tcp))))
}

/// Read the stream to end-of-stream, discarding header lines and collecting
/// body lines after the boundary.
fn read_body(transport: Transport) -> Result<String, PdtError> {
    let mut reader = BufReader::new(transport);
    let mut body = String::new();
    let mut boundary_seen = false;
    let mut line = String::new();

    loop {
        line.clear();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {
                if !boundary_seen {
                    if line == "\r\n" {
                        boundary_seen = true;
                    }
                } else {
                    body.push_str(&line);
                }
            }
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                // Abrupt close without close_notify; keep whatever partial
                // line was already read past the boundary.
                if boundary_seen {
                    body.push_str(&line);
                }
                break;
            }
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                return Err(PdtError::InvalidResponse(
                    "response is not valid UTF-8".to_string(),
                ));
            }
            Err(e) => return Err(PdtError::Io(e)),
        }
    }

    if !boundary_seen {
        return Err(PdtError::MissingBoundary);
    }
    Ok(body)
}
