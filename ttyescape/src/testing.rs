//! Scripted byte sources for unit tests.

use std::collections::VecDeque;
use std::io::{self, Read};

/// A reader that replays a fixed script, one entry per `read` call.
///
/// Once the script is exhausted every read returns end of stream.
#[derive(Debug, Default)]
pub struct ScriptedReader {
    script: VecDeque<io::Result<Vec<u8>>>,
}

impl ScriptedReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Deliver `data` in a single read.
    pub fn chunk(mut self, data: &[u8]) -> Self {
        self.script.push_back(Ok(data.to_vec()));
        self
    }

    /// Deliver `data` one byte per read, like keypresses.
    pub fn keys(mut self, data: &[u8]) -> Self {
        for &b in data {
            self.script.push_back(Ok(vec![b]));
        }
        self
    }

    /// Return an end of stream, without ending the script.
    pub fn eof(mut self) -> Self {
        self.script.push_back(Ok(Vec::new()));
        self
    }

    /// Fail the read with `kind`.
    pub fn error(mut self, kind: io::ErrorKind) -> Self {
        self.script
            .push_back(Err(io::Error::new(kind, "scripted failure")));
        self
    }
}

impl Read for ScriptedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.script.pop_front() {
            None => Ok(0),
            Some(Err(err)) => Err(err),
            Some(Ok(mut data)) => {
                if data.len() > buf.len() {
                    let rest = data.split_off(buf.len());
                    self.script.push_front(Ok(rest));
                }
                buf[..data.len()].copy_from_slice(&data);
                Ok(data.len())
            }
        }
    }
}
