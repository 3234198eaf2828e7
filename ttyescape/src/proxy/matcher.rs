//! Detach sequence state machine.
//!
//! The matcher only ever advances on reads that return exactly one byte:
//! keypresses arrive one at a time, so a multi-byte chunk (a paste, fast
//! typing) is never part of an escape sequence and flushes any partial match
//! as ordinary data.
//!
//! Withheld bytes are always a prefix of the escape sequence, so they are
//! kept as a cursor into the matcher's own copy of the keys rather than in
//! the caller's buffer.

use std::io;

use bytes::{Buf, BytesMut};
use log::{debug, trace};

use crate::keys::EscapeKeys;

/// What a single read from the wrapped source amounts to once inspected.
#[derive(Debug)]
pub enum Step {
    /// `n` bytes are ready at the front of the buffer. Zero is end of stream.
    Read(usize),

    /// The byte continued a partial match and was withheld. Nothing for the
    /// caller yet.
    Withheld,

    /// The full escape sequence was read. None of its bytes are delivered.
    Escape,

    /// The source failed with nothing withheld; the error is passed through.
    Failed(io::Error),
}

/// A status that has to wait until flushed bytes are delivered.
#[derive(Debug)]
enum Deferred {
    Eof,
    Error(io::Error),
}

/// Tracks progress through an escape sequence across reads.
///
/// Both [`EscapeProxy`](super::EscapeProxy) and
/// [`AsyncEscapeProxy`](super::AsyncEscapeProxy) drive one of these: call
/// [`take_pending`](Self::take_pending) before reading from the source, and
/// [`inspect`](Self::inspect) with the buffer and result of that read.
#[derive(Debug)]
pub struct EscapeMatcher {
    keys: EscapeKeys,

    /// Number of leading keys matched by the latest single-byte reads.
    position: usize,

    /// Released bytes that did not fit in the caller's buffer.
    backlog: BytesMut,

    deferred: Option<Deferred>,
}

impl EscapeMatcher {
    /// Create a matcher for the given sequence. An empty sequence makes
    /// every method a no-op passthrough.
    pub fn new(keys: impl Into<EscapeKeys>) -> Self {
        Self {
            keys: keys.into(),
            position: 0,
            backlog: BytesMut::new(),
            deferred: None,
        }
    }

    /// The sequence being watched for.
    pub fn keys(&self) -> &EscapeKeys {
        &self.keys
    }

    /// Whether detection is active (the sequence is non-empty).
    pub fn is_enabled(&self) -> bool {
        !self.keys.is_empty()
    }

    /// How many keys of the sequence are currently matched.
    pub fn position(&self) -> usize {
        self.position
    }

    /// The bytes currently withheld as a partial match.
    pub fn withheld(&self) -> &[u8] {
        &self.keys.as_bytes()[..self.position]
    }

    /// Whether output is owed from an earlier read (carried-over bytes or a
    /// deferred end of stream / error).
    pub fn has_pending(&self) -> bool {
        !self.backlog.is_empty() || self.deferred.is_some()
    }

    /// Deliver output owed from earlier reads without touching the source.
    ///
    /// Returns `None` when the caller should read from the source next.
    /// A zero-length `buf` is answered with `Ok(0)` while detection is
    /// enabled.
    pub fn take_pending(&mut self, buf: &mut [u8]) -> Option<io::Result<usize>> {
        if !self.is_enabled() {
            return None;
        }
        if buf.is_empty() {
            return Some(Ok(0));
        }

        if !self.backlog.is_empty() {
            let n = self.backlog.len().min(buf.len());
            buf[..n].copy_from_slice(&self.backlog[..n]);
            self.backlog.advance(n);
            return Some(Ok(n));
        }

        match self.deferred.take()? {
            Deferred::Eof => Some(Ok(0)),
            Deferred::Error(err) => Some(Err(err)),
        }
    }

    /// Inspect the result of one read from the source into `buf`.
    ///
    /// `buf` must be the buffer that read filled. On return its first
    /// `n` bytes hold whatever [`Step::Read(n)`](Step::Read) reports,
    /// withheld bytes re-inserted ahead of the new data.
    pub fn inspect(&mut self, buf: &mut [u8], read: io::Result<usize>) -> Step {
        if !self.is_enabled() {
            return match read {
                Ok(n) => Step::Read(n),
                Err(err) => Step::Failed(err),
            };
        }

        match read {
            Ok(1) => self.inspect_key(buf),
            Ok(0) if self.position > 0 => {
                let ready = self.release(buf, 0);
                self.defer(Deferred::Eof, ready)
            }
            Ok(n) => Step::Read(self.release(buf, n)),
            Err(err) if self.position > 0 => {
                let ready = self.release(buf, 0);
                self.defer(Deferred::Error(err), ready)
            }
            Err(err) => Step::Failed(err),
        }
    }

    fn inspect_key(&mut self, buf: &mut [u8]) -> Step {
        let key = buf[0];
        let len = self.keys.len();
        let expected = self.keys.as_bytes()[self.position];

        if key != expected {
            if self.position > 0 {
                trace!(
                    "key {:#04x} broke escape match at {}/{}, releasing withheld keys",
                    key, self.position, len
                );
            }
            return Step::Read(self.release(buf, 1));
        }

        if self.position == len - 1 {
            self.position = 0;
            debug!("escape sequence read ({} keys)", len);
            return Step::Escape;
        }

        self.position += 1;
        trace!(
            "withholding key {:#04x} ({}/{} of escape sequence)",
            key, self.position, len
        );
        Step::Withheld
    }

    /// Put the withheld prefix back in front of the `n` bytes just read and
    /// reset the cursor. Returns how many bytes are now ready in `buf`;
    /// whatever exceeds its capacity is carried over in the backlog.
    fn release(&mut self, buf: &mut [u8], n: usize) -> usize {
        let held = std::mem::take(&mut self.position);
        if held == 0 {
            return n;
        }

        let prefix = &self.keys.as_bytes()[..held];
        if held + n <= buf.len() {
            buf.copy_within(..n, held);
            buf[..held].copy_from_slice(prefix);
            return held + n;
        }

        let mut released = BytesMut::with_capacity(held + n);
        released.extend_from_slice(prefix);
        released.extend_from_slice(&buf[..n]);

        let ready = buf.len();
        buf.copy_from_slice(&released[..ready]);
        released.advance(ready);

        debug!(
            "read buffer holds {} bytes, carrying over {} released bytes",
            ready,
            released.len()
        );
        debug_assert!(self.backlog.is_empty());
        self.backlog = released;
        ready
    }

    fn defer(&mut self, deferred: Deferred, ready: usize) -> Step {
        debug!(
            "flushed withheld keys ahead of {:?}",
            match &deferred {
                Deferred::Eof => "end of stream",
                Deferred::Error(_) => "read error",
            }
        );
        self.deferred = Some(deferred);
        Step::Read(ready)
    }
}
