//! Byte sinks and sources for the `.` and `,` instructions.

use std::collections::VecDeque;
use std::io::{self, Read, Write};

/// Where program output goes and where program input comes from.
pub trait ProgramIo {
    /// Emit one byte produced by `.`.
    fn write_byte(&mut self, byte: u8) -> io::Result<()>;

    /// Read one byte for `,`. `Ok(None)` means end of input.
    fn read_byte(&mut self) -> io::Result<Option<u8>>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Process stdin/stdout.
///
/// Output is flushed before every read so interactive programs show their
/// prompt before blocking.
#[derive(Debug, Default)]
pub struct StdIo;

impl ProgramIo for StdIo {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        io::stdout().lock().write_all(&[byte])
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        io::stdout().flush()?;
        let mut buf = [0u8; 1];
        loop {
            match io::stdin().lock().read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}

/// In-memory input queue and output buffer, for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct BufferIo {
    input: VecDeque<u8>,
    output: Vec<u8>,
}

impl BufferIo {
    pub fn new(input: impl Into<Vec<u8>>) -> Self {
        let input: Vec<u8> = input.into();
        Self {
            input: input.into(),
            output: Vec::new(),
        }
    }

    pub fn output(&self) -> &[u8] {
        &self.output
    }
}

impl ProgramIo for BufferIo {
    fn write_byte(&mut self, byte: u8) -> io::Result<()> {
        self.output.push(byte);
        Ok(())
    }

    fn read_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.input.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_io_reads_in_order_then_eof() {
        let mut io = BufferIo::new(*b"ab");
        assert_eq!(io.read_byte().unwrap(), Some(b'a'));
        assert_eq!(io.read_byte().unwrap(), Some(b'b'));
        assert_eq!(io.read_byte().unwrap(), None);
    }

    #[test]
    fn buffer_io_collects_output() {
        let mut io = BufferIo::default();
        io.write_byte(1).unwrap();
        io.write_byte(2).unwrap();
        assert_eq!(io.output(), &[1, 2]);
    }
}
