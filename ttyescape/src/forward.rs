//! Copy input to a session until the user detaches.
//!
//! These helpers turn the detach signal into a normal return value so the
//! session owner can tell "user detached" from "input closed" without
//! inspecting `io::Error`s.

use std::io::{self, Read, Write};

use log::debug;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::error::{Result, is_escape};

const FORWARD_BUFFER_SIZE: usize = 4096;

/// Why forwarding stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum End {
    /// The detach sequence was read.
    Detached,

    /// The input reached end of stream.
    Eof,
}

/// Summary of a finished forwarding loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Forwarded {
    /// Bytes written to the session.
    pub bytes: u64,

    /// Why forwarding stopped.
    pub end: End,
}

impl Forwarded {
    /// Whether the user detached (as opposed to input closing).
    pub fn is_detached(&self) -> bool {
        self.end == End::Detached
    }
}

/// Copy everything from `reader` to `writer` until end of stream or detach.
///
/// The writer is flushed after every chunk, since input is interactive.
/// Interrupted reads are retried; any other failure is returned.
pub fn forward<R, W>(reader: &mut R, writer: &mut W) -> Result<Forwarded>
where
    R: Read + ?Sized,
    W: Write + ?Sized,
{
    let mut buf = [0u8; FORWARD_BUFFER_SIZE];
    let mut bytes = 0u64;

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => return Ok(finish(bytes, End::Eof)),
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) if is_escape(&err) => return Ok(finish(bytes, End::Detached)),
            Err(err) => return Err(err.into()),
        };

        writer.write_all(&buf[..n])?;
        writer.flush()?;
        bytes += n as u64;
    }
}

/// Async version of [`forward`].
pub async fn forward_async<R, W>(reader: &mut R, writer: &mut W) -> Result<Forwarded>
where
    R: AsyncRead + Unpin + ?Sized,
    W: AsyncWrite + Unpin + ?Sized,
{
    let mut buf = [0u8; FORWARD_BUFFER_SIZE];
    let mut bytes = 0u64;

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(0) => return Ok(finish(bytes, End::Eof)),
            Ok(n) => n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) if is_escape(&err) => return Ok(finish(bytes, End::Detached)),
            Err(err) => return Err(err.into()),
        };

        writer.write_all(&buf[..n]).await?;
        writer.flush().await?;
        bytes += n as u64;
    }
}

fn finish(bytes: u64, end: End) -> Forwarded {
    debug!("forwarding stopped after {} bytes: {:?}", bytes, end);
    Forwarded { bytes, end }
}
