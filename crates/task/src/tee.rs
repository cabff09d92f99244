//! Duplicate one output stream into two writers

use std::io::{self, Write};

/// Writes every chunk to a live stream and to a capture sink.
///
/// The live stream is flushed after each chunk so output appears as the
/// command produces it, partial lines included.
#[derive(Debug)]
pub struct TeeWriter<L, C> {
    live: L,
    capture: C,
}

impl<L: Write, C: Write> TeeWriter<L, C> {
    pub fn new(live: L, capture: C) -> Self {
        Self { live, capture }
    }

    pub fn into_inner(self) -> (L, C) {
        (self.live, self.capture)
    }
}

impl<L: Write, C: Write> Write for TeeWriter<L, C> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.live.write_all(buf)?;
        self.live.flush()?;
        self.capture.write_all(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.live.flush()?;
        self.capture.flush()
    }
}
