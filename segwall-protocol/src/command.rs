//! Commands sent to the world service
//!
//! Each command encodes to exactly one line, terminated by `\n`.

use core::fmt::Write;

use heapless::String;

/// TCP port the world service listens on by default
pub const DEFAULT_PORT: u16 = 4711;

/// Maximum encoded command length, including the trailing newline
pub const MAX_COMMAND_LEN: usize = 160;

/// An encoded command line
pub type CommandLine = String<MAX_COMMAND_LEN>;

/// Errors that can occur while encoding a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// Encoded command does not fit in [`MAX_COMMAND_LEN`]
    LineTooLong,
}

/// Commands understood by the world service
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command<'a> {
    /// Place a single block
    SetBlock { x: i32, y: i32, z: i32, id: u16 },
    /// Fill the inclusive box between two corners
    SetBlocks {
        x0: i32,
        y0: i32,
        z0: i32,
        x1: i32,
        y1: i32,
        z1: i32,
        id: u16,
    },
    /// Move the player
    SetPlayerPos { x: i32, y: i32, z: i32 },
    /// Post a chat message
    ///
    /// Newlines are replaced by spaces and over-long text is truncated.
    ChatPost { text: &'a str },
    /// Fetch and clear pending block hits
    PollBlockHits,
    /// Discard every pending event
    ClearEvents,
}

impl<'a> Command<'a> {
    /// Check if the service answers this command with a response line
    pub fn expects_response(&self) -> bool {
        matches!(self, Command::PollBlockHits)
    }

    /// Encode this command into a newline-terminated line
    pub fn encode(&self) -> Result<CommandLine, EncodeError> {
        let mut line = CommandLine::new();
        match self {
            Command::SetBlock { x, y, z, id } => {
                writeln!(line, "world.setBlock({},{},{},{})", x, y, z, id)
                    .map_err(|_| EncodeError::LineTooLong)?;
            }
            Command::SetBlocks {
                x0,
                y0,
                z0,
                x1,
                y1,
                z1,
                id,
            } => {
                writeln!(
                    line,
                    "world.setBlocks({},{},{},{},{},{},{})",
                    x0, y0, z0, x1, y1, z1, id
                )
                .map_err(|_| EncodeError::LineTooLong)?;
            }
            Command::SetPlayerPos { x, y, z } => {
                writeln!(line, "player.setPos({},{},{})", x, y, z)
                    .map_err(|_| EncodeError::LineTooLong)?;
            }
            Command::ChatPost { text } => {
                line.push_str("chat.post(")
                    .map_err(|_| EncodeError::LineTooLong)?;
                // Reserve room for the closing ")\n"
                let budget = MAX_COMMAND_LEN - line.len() - 2;
                let mut used = 0;
                for ch in text.chars() {
                    let ch = if ch == '\n' || ch == '\r' { ' ' } else { ch };
                    if used + ch.len_utf8() > budget {
                        break;
                    }
                    used += ch.len_utf8();
                    let _ = line.push(ch);
                }
                line.push_str(")\n")
                    .map_err(|_| EncodeError::LineTooLong)?;
            }
            Command::PollBlockHits => {
                line.push_str("events.block.hits()\n")
                    .map_err(|_| EncodeError::LineTooLong)?;
            }
            Command::ClearEvents => {
                line.push_str("events.clearAll()\n")
                    .map_err(|_| EncodeError::LineTooLong)?;
            }
        }
        Ok(line)
    }
}
