//! Blocking escape proxy over `std::io::Read`.

use std::io::{self, Read};

use super::matcher::{EscapeMatcher, Step};
use crate::error::EscapeError;
use crate::keys::EscapeKeys;

/// Reader that proxies keypresses from an inner reader and watches for a
/// detach sequence.
///
/// Once the whole sequence has been read, `read` fails with an
/// [`io::Error`] wrapping [`EscapeError`] (see
/// [`is_escape`](crate::error::is_escape)). None of the sequence's bytes
/// reach the caller. Bytes that only looked like the start of the sequence
/// are handed back as soon as a later read proves otherwise, or ahead of
/// the source's end of stream or error.
///
/// # Example
///
/// ```rust
/// use std::io::Read;
/// use ttyescape::{EscapeKeys, EscapeProxy, error::is_escape};
///
/// let keys = EscapeKeys::parse("ctrl-p,ctrl-q").unwrap();
/// let mut stdin = EscapeProxy::new(std::io::empty(), keys);
///
/// let mut buf = [0u8; 1024];
/// match stdin.read(&mut buf) {
///     Ok(0) => println!("stdin closed"),
///     Ok(n) => println!("forward {n} bytes"),
///     Err(err) if is_escape(&err) => println!("detached"),
///     Err(err) => eprintln!("read failed: {err}"),
/// }
/// ```
#[derive(Debug)]
pub struct EscapeProxy<R> {
    inner: R,
    matcher: EscapeMatcher,
}

impl<R> EscapeProxy<R> {
    /// Wrap `inner`, watching for `keys`. Empty keys disable detection.
    pub fn new(inner: R, keys: impl Into<EscapeKeys>) -> Self {
        Self {
            inner,
            matcher: EscapeMatcher::new(keys),
        }
    }

    /// The sequence being watched for.
    pub fn keys(&self) -> &EscapeKeys {
        self.matcher.keys()
    }

    /// The match state.
    pub fn matcher(&self) -> &EscapeMatcher {
        &self.matcher
    }

    pub fn get_ref(&self) -> &R {
        &self.inner
    }

    /// Reading from the inner reader directly bypasses detection.
    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap the inner reader. Withheld keys and any undelivered output
    /// are discarded.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for EscapeProxy<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if let Some(pending) = self.matcher.take_pending(buf) {
            return pending;
        }

        // A withheld key gives the caller nothing; go straight back to the
        // source rather than report a zero-length read.
        loop {
            let read = self.inner.read(buf);
            match self.matcher.inspect(buf, read) {
                Step::Read(n) => return Ok(n),
                Step::Withheld => continue,
                Step::Escape => return Err(EscapeError.into()),
                Step::Failed(err) => return Err(err),
            }
        }
    }
}
