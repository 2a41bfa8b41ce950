//! Line-synchronized output.
//!
//! The [`Emitter`] only ever appends. Before each write it pads the output
//! with newlines until the current line has caught up with the last source
//! line it was told about, so constructs land on their original lines
//! whenever the source layout allows it.

use std::io;

/// Append-only text destination.
pub trait Sink {
    /// Appends `text` to the destination.
    fn append(&mut self, text: &str) -> io::Result<()>;
}

impl Sink for String {
    fn append(&mut self, text: &str) -> io::Result<()> {
        self.push_str(text);
        Ok(())
    }
}

impl<S: Sink + ?Sized> Sink for &mut S {
    fn append(&mut self, text: &str) -> io::Result<()> {
        (**self).append(text)
    }
}

/// Streams output to any [`io::Write`] implementation.
#[derive(Debug)]
pub struct IoSink<W> {
    writer: W,
}

impl<W: io::Write> IoSink<W> {
    /// Wraps a writer.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the wrapped writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: io::Write> Sink for IoSink<W> {
    fn append(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())
    }
}

/// Line-tracking writer over a [`Sink`].
#[derive(Debug)]
pub struct Emitter<S> {
    sink: S,
    line: u32,
    expected_line: u32,
}

impl<S: Sink> Emitter<S> {
    /// Creates an emitter positioned at line 1.
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            line: 1,
            expected_line: 1,
        }
    }

    /// Records that the next construct comes from source line `line`.
    ///
    /// The expectation only ever rises. Constructs written out of source
    /// order, such as a `for` update placed after its body, follow the
    /// highest line marked so far instead of pulling it back.
    pub fn mark_line(&mut self, line: u32) {
        self.expected_line = self.expected_line.max(line);
    }

    /// Writes `text`, first padding with newlines up to the expected line.
    pub fn write(&mut self, text: &str) -> io::Result<()> {
        while self.line < self.expected_line {
            self.sink.append("\n")?;
            self.line += 1;
        }
        self.sink.append(text)?;
        self.line += text.matches('\n').count() as u32;
        Ok(())
    }

    /// The output line the next write starts on.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Returns the underlying sink.
    pub fn into_inner(self) -> S {
        self.sink
    }
}
