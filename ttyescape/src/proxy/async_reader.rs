//! Escape proxy over tokio's `AsyncRead`.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

use super::matcher::{EscapeMatcher, Step};
use crate::error::EscapeError;
use crate::keys::EscapeKeys;

/// Async counterpart of [`EscapeProxy`](super::EscapeProxy).
///
/// The match state lives in the proxy, so a partial match survives the
/// inner reader returning `Pending` between keypresses.
///
/// # Example
///
/// ```rust,no_run
/// use tokio::io::AsyncReadExt;
/// use ttyescape::{AsyncEscapeProxy, EscapeKeys, error::is_escape};
///
/// # async fn example() -> std::io::Result<()> {
/// let keys = EscapeKeys::parse("ctrl-]").unwrap();
/// let mut stdin = AsyncEscapeProxy::new(tokio::io::stdin(), keys);
///
/// let mut buf = [0u8; 1024];
/// loop {
///     match stdin.read(&mut buf).await {
///         Ok(0) => break,
///         Ok(n) => { /* forward buf[..n] */ }
///         Err(err) if is_escape(&err) => break,
///         Err(err) => return Err(err),
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct AsyncEscapeProxy<R> {
    inner: R,
    matcher: EscapeMatcher,
}

impl<R> AsyncEscapeProxy<R> {
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

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }

    /// Unwrap the inner reader. Withheld keys and any undelivered output
    /// are discarded.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for AsyncEscapeProxy<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        let pending = this.matcher.take_pending(buf.initialize_unfilled());
        if let Some(pending) = pending {
            return Poll::Ready(pending.map(|n| buf.advance(n)));
        }

        loop {
            let dst = buf.initialize_unfilled();

            let read = {
                let mut scratch = ReadBuf::new(&mut *dst);
                match Pin::new(&mut this.inner).poll_read(cx, &mut scratch) {
                    Poll::Pending => return Poll::Pending,
                    Poll::Ready(res) => res.map(|()| scratch.filled().len()),
                }
            };

            match this.matcher.inspect(dst, read) {
                Step::Read(n) => {
                    buf.advance(n);
                    return Poll::Ready(Ok(()));
                }
                Step::Withheld => continue,
                Step::Escape => return Poll::Ready(Err(EscapeError.into())),
                Step::Failed(err) => return Poll::Ready(Err(err)),
            }
        }
    }
}
