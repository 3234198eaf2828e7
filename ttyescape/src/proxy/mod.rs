//! Escape proxies for terminal input.
//!
//! This module wraps a byte source and watches single-key reads for the
//! configured detach sequence, withholding partial matches until they are
//! either completed (the read fails with the detach signal) or broken (the
//! withheld keys are handed back as ordinary input).

mod async_reader;
mod matcher;
mod reader;

pub use async_reader::AsyncEscapeProxy;
pub use matcher::{EscapeMatcher, Step};
pub use reader::EscapeProxy;
