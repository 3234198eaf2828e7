//! # ttyescape
//!
//! Detach-sequence detection for terminal-attached sessions.
//!
//! When a user's keyboard is wired straight into a remote shell or
//! container, the session owner still needs a way to let go locally without
//! disturbing the remote side. ttyescape wraps the input stream and watches
//! keypresses for a configured detach sequence such as `ctrl-p,ctrl-q`.
//!
//! ## Features
//!
//! - Blocking (`std::io::Read`) and async (`tokio::io::AsyncRead`) proxies
//! - Partial matches are withheld, never lost: they are handed back on a
//!   mismatch, or ahead of end of stream and errors
//! - Pasted text (multi-byte reads) never triggers a detach
//! - Detach keys parsed from the usual `ctrl-p,ctrl-q` notation, with serde
//!   support for config files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ttyescape::{EscapeKeys, EscapeProxy, forward::forward};
//!
//! fn main() -> Result<(), ttyescape::Error> {
//!     let keys = EscapeKeys::parse("ctrl-p,ctrl-q")?;
//!     let mut input = EscapeProxy::new(std::io::stdin(), keys);
//!     let mut session = std::io::sink();
//!
//!     let forwarded = forward(&mut input, &mut session)?;
//!     if forwarded.is_detached() {
//!         eprintln!("detached");
//!     }
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod forward;
pub mod keys;
pub mod proxy;

#[cfg(test)]
mod testing;

// Re-export main types for convenience
pub use error::{Error, EscapeError, is_escape};
pub use forward::{End, Forwarded};
pub use keys::EscapeKeys;
pub use proxy::{AsyncEscapeProxy, EscapeMatcher, EscapeProxy, Step};
