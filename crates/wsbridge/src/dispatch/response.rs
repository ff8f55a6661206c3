//! Outcome serialization for the transport side.
//!
//! The bridge hands outcomes back to whatever carries messages to the client.
//! [`OutcomeWriter`] frames each outcome as a single JSON line: errors use the
//! `{"error": ..., "status_code": ...}` shape and handler values use their
//! own `Serialize` implementation.

use std::io::{self, Write};

use serde::Serialize;
use thiserror::Error;

use super::outcome::{ErrorModel, Outcome};

/// Errors raised while writing an outcome.
#[derive(Debug, Error)]
pub enum WriteError {
    /// The outcome could not be serialized.
    #[error("failed to serialize outcome: {0}")]
    Serialize(#[from] serde_json::Error),
    /// The underlying stream rejected the write.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Writer that frames outcomes as JSON lines.
pub struct OutcomeWriter<W> {
    writer: W,
}

impl<W: Write> OutcomeWriter<W> {
    /// Creates a writer over the given output stream.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes an outcome as one line and flushes the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, writing or flushing fails.
    pub fn write_outcome<R: Serialize>(&mut self, outcome: &Outcome<R>) -> Result<(), WriteError> {
        match outcome {
            Outcome::Handled(value) => self.write_line(value),
            Outcome::Failed(error) => self.write_error(error),
        }
    }

    /// Writes an error model as one line and flushes the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or flushing fails.
    pub fn write_error(&mut self, error: &ErrorModel) -> Result<(), WriteError> {
        self.write_line(error)
    }

    /// Returns the wrapped stream.
    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_line<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), WriteError> {
        serde_json::to_writer(&mut self.writer, value)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn written<R: Serialize>(outcome: &Outcome<R>) -> String {
        let mut output = Vec::new();
        let mut writer = OutcomeWriter::new(&mut output);
        writer.write_outcome(outcome).expect("write outcome");
        String::from_utf8(output).expect("valid utf8")
    }

    #[test]
    fn writes_error_model_line() {
        let outcome: Outcome<()> = Outcome::Failed(ErrorModel::new("Missing URL", 400));
        assert_eq!(
            written(&outcome),
            "{\"error\":\"Missing URL\",\"status_code\":400}\n"
        );
    }

    #[test]
    fn writes_handler_value_verbatim() {
        let outcome = Outcome::Handled(json!({"foo": ["bar", "baz"]}));
        assert_eq!(written(&outcome), "{\"foo\":[\"bar\",\"baz\"]}\n");
    }

    #[test]
    fn reports_io_failures() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let mut writer = OutcomeWriter::new(Broken);
        let result = writer.write_error(&ErrorModel::new("Resource not found.", 404));
        assert!(result.is_err());
    }
}
