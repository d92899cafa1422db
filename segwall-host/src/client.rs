//! World service client
//!
//! Speaks the Minecraft: Pi Edition text API over TCP. Every request is one
//! line; only block-hit polls are answered. Failed requests reconnect and
//! retry a bounded number of times.

use std::io::{Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use log::{debug, info, warn};
use segwall_core::{BlockType, Coord, TouchBatch, TouchEvent, World};
use segwall_protocol::{parse_block_hits, Command, HitBatch, LineParser, ResponseLine};

use crate::config::WorldSection;
use crate::error::ClientError;

/// Connection settings
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub host: String,
    pub port: u16,
    /// Connect, read and write timeout
    pub timeout: Duration,
    /// Reconnect attempts after a failed request
    pub retries: u32,
}

impl From<&WorldSection> for ClientOptions {
    fn from(section: &WorldSection) -> Self {
        Self {
            host: section.host.clone(),
            port: section.port,
            timeout: section.timeout(),
            retries: section.retries,
        }
    }
}

/// Splits a byte stream into response lines
///
/// Bytes read past the end of a line are kept for the next call.
#[derive(Debug, Default)]
pub struct LineReader {
    parser: LineParser,
    leftover: Vec<u8>,
}

impl LineReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any partial line
    pub fn reset(&mut self) {
        self.parser.reset();
        self.leftover.clear();
    }

    /// Read one complete line
    pub fn read_line<R: Read>(&mut self, reader: &mut R) -> Result<ResponseLine, ClientError> {
        if let Some(line) = self.take_buffered()? {
            return Ok(line);
        }

        let mut buf = [0u8; 512];
        loop {
            let n = reader.read(&mut buf)?;
            if n == 0 {
                return Err(ClientError::Closed);
            }
            let (line, used) = self.parser.feed_bytes(&buf[..n]).map_err(ClientError::Line)?;
            if let Some(line) = line {
                self.leftover.extend_from_slice(&buf[used..n]);
                return Ok(line);
            }
        }
    }

    fn take_buffered(&mut self) -> Result<Option<ResponseLine>, ClientError> {
        if self.leftover.is_empty() {
            return Ok(None);
        }
        let pending = std::mem::take(&mut self.leftover);
        let (line, used) = self.parser.feed_bytes(&pending).map_err(ClientError::Line)?;
        self.leftover.extend_from_slice(&pending[used..]);
        Ok(line)
    }
}

/// Convert parsed hits into touch events
pub fn touches_from_hits(batch: &HitBatch) -> TouchBatch {
    let mut touches = TouchBatch::new();
    for hit in batch.hits.iter() {
        let event = TouchEvent {
            pos: Coord::new(hit.x, hit.y, hit.z),
            face: hit.face,
            entity_id: hit.entity_id,
        };
        if touches.push(event).is_err() {
            break;
        }
    }
    touches
}

/// TCP client for the world text API
pub struct McpiClient {
    options: ClientOptions,
    stream: Option<TcpStream>,
    reader: LineReader,
}

impl McpiClient {
    /// Connect to the world service
    pub fn connect(options: ClientOptions) -> Result<Self, ClientError> {
        let mut client = Self {
            options,
            stream: None,
            reader: LineReader::new(),
        };
        client.stream()?;
        info!(
            "connected to world at {}:{}",
            client.options.host, client.options.port
        );
        Ok(client)
    }

    fn open(&self) -> Result<TcpStream, ClientError> {
        let host = self.options.host.as_str();
        let addr = (host, self.options.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| ClientError::Resolve(host.to_string()))?;

        let stream = TcpStream::connect_timeout(&addr, self.options.timeout)?;
        stream.set_read_timeout(Some(self.options.timeout))?;
        stream.set_write_timeout(Some(self.options.timeout))?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }

    /// Current connection, reconnecting if it was dropped
    fn stream(&mut self) -> Result<&mut TcpStream, ClientError> {
        if self.stream.is_none() {
            let stream = self.open()?;
            self.reader.reset();
            self.stream = Some(stream);
        }
        self.stream.as_mut().ok_or(ClientError::Closed)
    }

    fn disconnect(&mut self) {
        self.stream = None;
        self.reader.reset();
    }

    fn send_once(
        &mut self,
        line: &str,
        expects_response: bool,
    ) -> Result<Option<ResponseLine>, ClientError> {
        let stream = self.stream()?;
        stream.write_all(line.as_bytes())?;
        if !expects_response {
            return Ok(None);
        }
        let stream = self.stream.as_mut().ok_or(ClientError::Closed)?;
        self.reader.read_line(stream).map(Some)
    }

    /// Send a command, retrying with a fresh connection on I/O failure
    pub fn request(&mut self, command: &Command<'_>) -> Result<Option<ResponseLine>, ClientError> {
        let line = command.encode().map_err(ClientError::Encode)?;
        debug!("-> {}", line.trim_end());

        let mut attempt = 0;
        loop {
            match self.send_once(&line, command.expects_response()) {
                Ok(response) => return Ok(response),
                Err(e) if e.is_transient() && attempt < self.options.retries => {
                    attempt += 1;
                    warn!(
                        "world request failed ({}), reconnecting (attempt {}/{})",
                        e, attempt, self.options.retries
                    );
                    self.disconnect();
                }
                Err(e) => {
                    self.disconnect();
                    return Err(e);
                }
            }
        }
    }

    /// Discard pending events on the server
    pub fn clear_events(&mut self) -> Result<(), ClientError> {
        self.request(&Command::ClearEvents).map(|_| ())
    }
}

impl World for McpiClient {
    type Error = ClientError;

    fn set_block(&mut self, pos: Coord, block: BlockType) -> Result<(), ClientError> {
        self.request(&Command::SetBlock {
            x: pos.x,
            y: pos.y,
            z: pos.z,
            id: block.id(),
        })
        .map(|_| ())
    }

    fn set_blocks(&mut self, from: Coord, to: Coord, block: BlockType) -> Result<(), ClientError> {
        self.request(&Command::SetBlocks {
            x0: from.x,
            y0: from.y,
            z0: from.z,
            x1: to.x,
            y1: to.y,
            z1: to.z,
            id: block.id(),
        })
        .map(|_| ())
    }

    fn poll_touches(&mut self) -> Result<TouchBatch, ClientError> {
        let line = self
            .request(&Command::PollBlockHits)?
            .ok_or(ClientError::Closed)?;
        let batch = parse_block_hits(&line).map_err(ClientError::Hits)?;
        if batch.dropped > 0 {
            warn!("dropped {} block hits past the batch limit", batch.dropped);
        }
        Ok(touches_from_hits(&batch))
    }

    fn clear_touches(&mut self) -> Result<(), ClientError> {
        self.clear_events()
    }

    fn set_player_position(&mut self, pos: Coord) -> Result<(), ClientError> {
        self.request(&Command::SetPlayerPos {
            x: pos.x,
            y: pos.y,
            z: pos.z,
        })
        .map(|_| ())
    }

    fn post_message(&mut self, text: &str) -> Result<(), ClientError> {
        self.request(&Command::ChatPost { text }).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    /// Reader that hands out data in fixed-size chunks
    struct Chunked<'a> {
        data: &'a [u8],
        chunk: usize,
    }

    impl Read for Chunked<'_> {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            let n = self.chunk.min(buf.len()).min(self.data.len());
            buf[..n].copy_from_slice(&self.data[..n]);
            self.data = &self.data[n..];
            Ok(n)
        }
    }

    #[test]
    fn test_read_line_across_chunks() {
        let mut reader = LineReader::new();
        let mut src = Chunked {
            data: b"6,0,3,1,1|8,0,3,1,1\n",
            chunk: 3,
        };
        let line = reader.read_line(&mut src).unwrap();
        assert_eq!(line.as_str(), "6,0,3,1,1|8,0,3,1,1");
    }

    #[test]
    fn test_read_line_keeps_leftover() {
        let mut reader = LineReader::new();
        let mut src = Chunked {
            data: b"\n14,0,3,2,1\n",
            chunk: 64,
        };
        assert_eq!(reader.read_line(&mut src).unwrap().as_str(), "");
        // Second line was already read from the source
        let mut empty = Chunked {
            data: b"",
            chunk: 64,
        };
        assert_eq!(reader.read_line(&mut empty).unwrap().as_str(), "14,0,3,2,1");
        assert!(matches!(
            reader.read_line(&mut empty),
            Err(ClientError::Closed)
        ));
    }

    #[test]
    fn test_hits_to_touches() {
        let batch = parse_block_hits("6,0,3,1,1|-9,2,11,5,2").unwrap();
        let touches = touches_from_hits(&batch);
        assert_eq!(touches.len(), 2);
        assert_eq!(touches[0].pos, Coord::new(6, 0, 3));
        assert_eq!(touches[1].pos, Coord::new(-9, 2, 11));
        assert_eq!(touches[1].face, 5);
        assert_eq!(touches[1].entity_id, 2);
    }

    #[test]
    fn test_transient_errors() {
        assert!(ClientError::Closed.is_transient());
        assert!(ClientError::Io(io::Error::from(io::ErrorKind::TimedOut)).is_transient());
        assert!(!ClientError::Resolve("nowhere".into()).is_transient());
    }
}
