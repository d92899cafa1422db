//! World text API wire codec
//!
//! This crate encodes commands for, and decodes responses from, the text
//! API served by Minecraft: Pi Edition (TCP port 4711 by default).
//!
//! # Protocol Overview
//!
//! Every command is a single ASCII line:
//! ```text
//! ┌──────────────────────┬───┬──────────────────┬───┬────┐
//! │ NAMESPACE.METHOD     │ ( │ ARG,ARG,...      │ ) │ \n │
//! └──────────────────────┴───┴──────────────────┴───┴────┘
//! ```
//!
//! Only queries produce a reply, which is also one `\n`-terminated line.
//! The only query used here is `events.block.hits()`, whose reply is a
//! `|`-separated list of `x,y,z,face,entityId` entries.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod command;
pub mod hits;
pub mod line;

pub use command::{Command, EncodeError, CommandLine, DEFAULT_PORT, MAX_COMMAND_LEN};
pub use hits::{parse_block_hits, BlockHit, HitBatch, HitParseError, MAX_HITS_PER_POLL};
pub use line::{LineError, LineParser, ResponseLine, MAX_RESPONSE_LEN};
