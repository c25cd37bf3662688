use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};
use tokio::net::TcpStream;
use tokio_rustls::TlsAcceptor;
use tokio_rustls::rustls::ServerConfig;

use crate::error::{Error, Result};

/// Which transport a listener accepts connections over. MRCPv2 runs over
/// TCP, optionally wrapped in TLS; there is no UDP or WebSocket mode for
/// MRCP the way there is for SIP.
#[derive(Clone)]
pub enum Transport {
    Tcp,
    Tls(Arc<ServerConfig>),
}

impl Transport {
    /// Completes the transport-specific half of accepting a connection:
    /// a no-op for plain TCP, a TLS handshake for `Tls`.
    pub async fn accept(&self, stream: TcpStream) -> Result<Socket> {
        match self {
            Transport::Tcp => Ok(Socket::Plain(stream)),
            Transport::Tls(config) => {
                let acceptor = TlsAcceptor::from(config.clone());
                let tls_stream = acceptor
                    .accept(stream)
                    .await
                    .map_err(|e| Error::Tls(e.to_string()))?;
                Ok(Socket::Tls(Box::new(tls_stream)))
            }
        }
    }
}

/// A connected duplex byte stream, plain or TLS, behind one type so the
/// connection mux's reader/writer loop doesn't need to know which.
pub enum Socket {
    Plain(TcpStream),
    Tls(Box<tokio_rustls::server::TlsStream<TcpStream>>),
}

impl AsyncRead for Socket {
    fn poll_read(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &mut ReadBuf<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            Socket::Plain(s) => Pin::new(s).poll_read(cx, buf),
            Socket::Tls(s) => Pin::new(s.as_mut()).poll_read(cx, buf),
        }
    }
}

impl AsyncWrite for Socket {
    fn poll_write(self: Pin<&mut Self>, cx: &mut Context<'_>, buf: &[u8]) -> Poll<std::io::Result<usize>> {
        match self.get_mut() {
            Socket::Plain(s) => Pin::new(s).poll_write(cx, buf),
            Socket::Tls(s) => Pin::new(s.as_mut()).poll_write(cx, buf),
        }
    }

    fn poll_flush(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            Socket::Plain(s) => Pin::new(s).poll_flush(cx),
            Socket::Tls(s) => Pin::new(s.as_mut()).poll_flush(cx),
        }
    }

    fn poll_shutdown(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<std::io::Result<()>> {
        match self.get_mut() {
            Socket::Plain(s) => Pin::new(s).poll_shutdown(cx),
            Socket::Tls(s) => Pin::new(s.as_mut()).poll_shutdown(cx),
        }
    }
}
