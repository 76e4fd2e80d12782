//! Event sources for the reconstruction loop.

use std::io::BufRead;

use muontrack::Event;

use crate::{CliError, CliResult};

/// Anything that yields events in acquisition order.
pub trait EventSource {
    /// Next event, `None` once the source is exhausted.
    fn next_event(&mut self) -> Option<CliResult<Event>>;
}

/// One JSON-encoded [`Event`] per line. Blank lines are skipped.
pub struct JsonLinesSource<R: BufRead> {
    reader: R,
    line_no: usize,
    buf: String,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line_no: 0,
            buf: String::new(),
        }
    }
}

impl<R: BufRead> EventSource for JsonLinesSource<R> {
    fn next_event(&mut self) -> Option<CliResult<Event>> {
        loop {
            self.buf.clear();
            match self.reader.read_line(&mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_no += 1;
            let line = self.buf.trim();
            if line.is_empty() {
                continue;
            }
            let line_no = self.line_no;
            return Some(
                serde_json::from_str(line)
                    .map_err(|e| -> CliError { format!("line {}: {}", line_no, e).into() }),
            );
        }
    }
}
