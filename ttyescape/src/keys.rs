//! Detach key sequences.
//!
//! An [`EscapeKeys`] value is the byte sequence an escape proxy watches for.
//! It can be built from raw bytes or parsed from the usual detach-key
//! notation used by container runtimes:
//!
//! ```text
//! ctrl-p,ctrl-q
//! ```
//!
//! Each comma-separated key is either a single ASCII character or a
//! `ctrl-<c>` chord (`ctrl-@`, `ctrl-a` .. `ctrl-z`, `ctrl-[`, `ctrl-\`,
//! `ctrl-]`, `ctrl-^`, `ctrl-_`). Bytes with no printable form can be
//! written as `0xNN`. The empty string means detection is disabled.

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::Deserialize;

use crate::error::KeysError;

/// An immutable detach key sequence.
///
/// An empty sequence disables escape detection entirely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct EscapeKeys(Bytes);

impl EscapeKeys {
    /// Create a sequence from raw bytes.
    pub fn new(keys: impl Into<Bytes>) -> Self {
        Self(keys.into())
    }

    /// The empty sequence: a proxy built with it is a pure passthrough.
    pub fn disabled() -> Self {
        Self(Bytes::new())
    }

    /// Parse the `ctrl-p,ctrl-q` notation.
    pub fn parse(keys: &str) -> Result<Self, KeysError> {
        if keys.is_empty() {
            return Ok(Self::disabled());
        }

        let codes = keys
            .split(',')
            .map(parse_key)
            .collect::<Result<Vec<u8>, _>>()?;
        Ok(Self(Bytes::from(codes)))
    }

    /// The raw bytes of the sequence.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Number of keys in the sequence.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the sequence is empty (detection disabled).
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromStr for EscapeKeys {
    type Err = KeysError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for EscapeKeys {
    type Error = KeysError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Bytes> for EscapeKeys {
    fn from(keys: Bytes) -> Self {
        Self(keys)
    }
}

impl From<Vec<u8>> for EscapeKeys {
    fn from(keys: Vec<u8>) -> Self {
        Self(Bytes::from(keys))
    }
}

impl From<&[u8]> for EscapeKeys {
    fn from(keys: &[u8]) -> Self {
        Self(Bytes::copy_from_slice(keys))
    }
}

impl<const N: usize> From<&[u8; N]> for EscapeKeys {
    fn from(keys: &[u8; N]) -> Self {
        Self(Bytes::copy_from_slice(keys))
    }
}

impl AsRef<[u8]> for EscapeKeys {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for EscapeKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &code) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write_key(f, code)?;
        }
        Ok(())
    }
}

fn parse_key(key: &str) -> Result<u8, KeysError> {
    let invalid = || KeysError::InvalidKey {
        key: key.to_string(),
    };

    // A one-byte str is always ASCII.
    if key.len() == 1 {
        return Ok(key.as_bytes()[0]);
    }

    if let Some(chord) = key
        .get(..5)
        .filter(|prefix| prefix.eq_ignore_ascii_case("ctrl-"))
        .map(|_| &key[5..])
    {
        return match chord.as_bytes() {
            [c] => ctrl_code(*c).ok_or_else(invalid),
            _ => Err(invalid()),
        };
    }

    if let Some(hex) = key.strip_prefix("0x").or_else(|| key.strip_prefix("0X")) {
        if hex.len() == 2 && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return u8::from_str_radix(hex, 16).map_err(|_| invalid());
        }
    }

    Err(invalid())
}

fn ctrl_code(c: u8) -> Option<u8> {
    match c.to_ascii_lowercase() {
        b'@' => Some(0x00),
        c @ b'a'..=b'z' => Some(c - b'a' + 1),
        b'[' => Some(0x1b),
        b'\\' => Some(0x1c),
        b']' => Some(0x1d),
        b'^' => Some(0x1e),
        b'_' => Some(0x1f),
        _ => None,
    }
}

fn write_key(f: &mut fmt::Formatter<'_>, code: u8) -> fmt::Result {
    match code {
        0x00 => f.write_str("ctrl-@"),
        0x01..=0x1a => write!(f, "ctrl-{}", (b'a' + code - 1) as char),
        0x1b => f.write_str("ctrl-["),
        0x1c => f.write_str("ctrl-\\"),
        0x1d => f.write_str("ctrl-]"),
        0x1e => f.write_str("ctrl-^"),
        0x1f => f.write_str("ctrl-_"),
        // A literal comma would be read back as a separator.
        b',' => write!(f, "0x{code:02x}"),
        0x20..=0x7e => write!(f, "{}", code as char),
        _ => write!(f, "0x{code:02x}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ctrl_sequence() {
        let keys = EscapeKeys::parse("ctrl-p,ctrl-q").unwrap();
        assert_eq!(keys.as_bytes(), &[0x10, 0x11]);
    }

    #[test]
    fn test_parse_symbol_chords() {
        let keys: EscapeKeys = "ctrl-@,ctrl-[,ctrl-\\,ctrl-],ctrl-^,ctrl-_".parse().unwrap();
        assert_eq!(keys.as_bytes(), &[0x00, 0x1b, 0x1c, 0x1d, 0x1e, 0x1f]);
    }

    #[test]
    fn test_parse_is_case_insensitive_for_chords() {
        let keys = EscapeKeys::parse("CTRL-A,Ctrl-z").unwrap();
        assert_eq!(keys.as_bytes(), &[0x01, 0x1a]);
    }

    #[test]
    fn test_parse_literal_characters() {
        let keys = EscapeKeys::parse("a,~,.").unwrap();
        assert_eq!(keys.as_bytes(), b"a~.");
    }

    #[test]
    fn test_parse_hex_bytes() {
        let keys = EscapeKeys::parse("0xff,0X2c").unwrap();
        assert_eq!(keys.as_bytes(), &[0xff, b',']);
    }

    #[test]
    fn test_parse_empty_disables() {
        let keys = EscapeKeys::parse("").unwrap();
        assert!(keys.is_empty());
        assert_eq!(keys, EscapeKeys::disabled());
    }

    #[test]
    fn test_parse_rejects_unknown_keys() {
        for bad in ["ctrl-1", "ctrl-", "ctrl-ab", "shift-a", "ab", "é", "0x1", "0x+f", "a,,b"] {
            assert!(EscapeKeys::parse(bad).is_err(), "{bad:?} should not parse");
        }

        assert_eq!(
            EscapeKeys::parse("ctrl-p,ctrl-7").unwrap_err(),
            KeysError::InvalidKey {
                key: "ctrl-7".to_string()
            }
        );
    }

    #[test]
    fn test_display_uses_parse_notation() {
        let keys = EscapeKeys::new(vec![0x10, 0x11, b'x', b',', 0x80, 0x1c]);
        let rendered = keys.to_string();
        assert_eq!(rendered, "ctrl-p,ctrl-q,x,0x2c,0x80,ctrl-\\");
        assert_eq!(EscapeKeys::parse(&rendered).unwrap(), keys);
    }

    #[test]
    fn test_from_byte_sources() {
        assert_eq!(EscapeKeys::from(b"ab").as_bytes(), b"ab");
        assert_eq!(EscapeKeys::from(&b"ab"[..]).len(), 2);
        assert_eq!(EscapeKeys::from(vec![1u8]).as_bytes(), &[1]);
        assert_eq!(EscapeKeys::from(Bytes::from_static(b"q")).as_bytes(), b"q");
    }

    #[test]
    fn test_deserialize_from_config_string() {
        #[derive(Deserialize)]
        struct SessionConfig {
            detach_keys: EscapeKeys,
        }

        let config: SessionConfig =
            serde_json::from_str(r#"{ "detach_keys": "ctrl-p,ctrl-q" }"#).unwrap();
        assert_eq!(config.detach_keys.as_bytes(), &[0x10, 0x11]);

        let err = serde_json::from_str::<SessionConfig>(r#"{ "detach_keys": "ctrl-%" }"#);
        assert!(err.is_err());
    }
}
