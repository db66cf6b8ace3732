//! Stateful line scanner.

use std::io::{self, BufRead};

/// One logical line of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line content without its terminator.
    pub content: &'a [u8],
    /// Whether the line ended in `\n` in the source.
    pub terminated: bool,
    /// 1-based position in the source.
    pub number: usize,
}

impl Line<'_> {
    /// The terminator to emit after this line's replacement or copy.
    pub fn terminator(&self) -> &'static [u8] {
        if self.terminated {
            b"\n"
        } else {
            b""
        }
    }
}

/// Reads a stream one logical line at a time.
///
/// Each scanner owns its buffer; it is reused between calls and only borrowed
/// by the [`Line`] returned from [`LineScanner::next_line`].
pub struct LineScanner<R> {
    reader: R,
    buf: Vec<u8>,
    lines_read: usize,
}

impl<R: BufRead> LineScanner<R> {
    /// Create a scanner over `reader`.
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            lines_read: 0,
        }
    }

    /// Read the next line, or `None` at end of input.
    ///
    /// A final line without a trailing newline is still returned, with
    /// `terminated` set to `false`. An empty input yields no lines at all.
    pub fn next_line(&mut self) -> io::Result<Option<Line<'_>>> {
        self.buf.clear();
        let n = loop {
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(n) => break n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        };
        if n == 0 {
            return Ok(None);
        }

        self.lines_read += 1;
        let terminated = self.buf.last() == Some(&b'\n');
        let end = if terminated {
            self.buf.len() - 1
        } else {
            self.buf.len()
        };
        Ok(Some(Line {
            content: &self.buf[..end],
            terminated,
            number: self.lines_read,
        }))
    }

    /// Number of lines handed out so far.
    pub fn lines_read(&self) -> usize {
        self.lines_read
    }
}
