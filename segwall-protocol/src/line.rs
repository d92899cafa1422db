//! Response line reassembly
//!
//! Bytes arrive from the socket in arbitrary chunks; [`LineParser`] collects
//! them into complete `\n`-terminated lines.

use heapless::{String, Vec};

/// Maximum response length, excluding the terminator
///
/// Large enough for [`crate::MAX_HITS_PER_POLL`] hit entries with
/// six-digit coordinates.
pub const MAX_RESPONSE_LEN: usize = 2048;

/// A complete response line without its terminator
pub type ResponseLine = String<MAX_RESPONSE_LEN>;

/// Errors that can occur during line reassembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineError {
    /// Line exceeded [`MAX_RESPONSE_LEN`]; the rest of it is discarded
    TooLong,
    /// Line was not valid UTF-8
    InvalidUtf8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    /// Collecting bytes of the current line
    Collecting,
    /// Skipping the remainder of an over-long line
    Discarding,
}

/// State machine for splitting a byte stream into lines
#[derive(Debug, Clone)]
pub struct LineParser {
    state: ParseState,
    buffer: Vec<u8, MAX_RESPONSE_LEN>,
}

impl Default for LineParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LineParser {
    /// Create a new line parser
    pub fn new() -> Self {
        Self {
            state: ParseState::Collecting,
            buffer: Vec::new(),
        }
    }

    /// Reset the parser state
    pub fn reset(&mut self) {
        self.state = ParseState::Collecting;
        self.buffer.clear();
    }

    /// Number of bytes buffered for the current line
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Feed a single byte to the parser
    ///
    /// Returns `Ok(Some(line))` when a line is complete, `Ok(None)` when more
    /// bytes are needed. An over-long line yields a single `TooLong` error
    /// when it overflows and is then skipped up to its terminator.
    pub fn feed(&mut self, byte: u8) -> Result<Option<ResponseLine>, LineError> {
        match self.state {
            ParseState::Discarding => {
                if byte == b'\n' {
                    self.state = ParseState::Collecting;
                }
                Ok(None)
            }
            ParseState::Collecting => match byte {
                b'\n' => {
                    let bytes = core::mem::take(&mut self.buffer);
                    let line = String::from_utf8(bytes).map_err(|_| LineError::InvalidUtf8)?;
                    Ok(Some(line))
                }
                b'\r' => Ok(None),
                _ => {
                    if self.buffer.push(byte).is_err() {
                        self.buffer.clear();
                        self.state = ParseState::Discarding;
                        return Err(LineError::TooLong);
                    }
                    Ok(None)
                }
            },
        }
    }

    /// Feed multiple bytes to the parser
    ///
    /// Returns the first complete line and the number of bytes consumed.
    /// Bytes after the line are left for the caller to feed again.
    pub fn feed_bytes(
        &mut self,
        bytes: &[u8],
    ) -> Result<(Option<ResponseLine>, usize), LineError> {
        for (i, &byte) in bytes.iter().enumerate() {
            if let Some(line) = self.feed(byte)? {
                return Ok((Some(line), i + 1));
            }
        }
        Ok((None, bytes.len()))
    }
}
