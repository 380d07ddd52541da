//! Test utilities shared across modules.
//!
//! [`SharedBuffer`] stands in for stdout, stderr or the mirror log so tests
//! can inspect exactly what a [`Console`](crate::output::Console) emitted,
//! including where flushes happened.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use crate::output::BoxedWriter;

/// One observed operation on a [`SharedBuffer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Write(Vec<u8>),
    Flush,
}

/// Cloneable in-memory writer; every clone sees the same event log.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    events: Arc<Mutex<Vec<Event>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Box a clone of this buffer for handing to a console.
    pub fn boxed(&self) -> BoxedWriter {
        Box::new(self.clone())
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    /// Every byte written so far, flushes ignored.
    pub fn bytes(&self) -> Vec<u8> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                Event::Write(bytes) => Some(bytes),
                Event::Flush => None,
            })
            .flatten()
            .collect()
    }

    /// Everything written so far as text.
    pub fn contents(&self) -> String {
        String::from_utf8(self.bytes()).unwrap()
    }

    pub fn flush_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| **event == Event::Flush)
            .count()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.events.lock().unwrap().push(Event::Write(buf.to_vec()));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.events.lock().unwrap().push(Event::Flush);
        Ok(())
    }
}

/// Writer that rejects every operation, for exercising failure paths.
#[derive(Debug, Default)]
pub struct FailingWriter;

impl Write for FailingWriter {
    fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
        Err(io::Error::other("disk full"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Err(io::Error::other("disk full"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shared_buffer_clones_share_contents() {
        let buffer = SharedBuffer::new();
        let mut writer = buffer.clone();
        writer.write_all(b"hello").unwrap();
        writer.flush().unwrap();
        assert_eq!(buffer.contents(), "hello");
        assert_eq!(buffer.flush_count(), 1);
    }

    #[test]
    fn test_failing_writer_errors() {
        let mut writer = FailingWriter;
        assert!(writer.write_all(b"x").is_err());
        assert!(writer.flush().is_err());
    }
}
