//! Command line interface for the `otr-fragment` binary.
//!
//! Shared with `build.rs`, which renders the man page from these
//! definitions.

use std::num::ParseIntError;

use clap::{Parser, Subcommand};

/// Command line arguments for the `otr-fragment` binary.
#[derive(Debug, Parser)]
#[command(
    name = "otr-fragment",
    version,
    about = "Reassemble or split instance-tagged message fragments"
)]
pub struct Cli {
    /// Operation to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported operations.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Read one wire message per line from stdin and print each completed
    /// message.
    Assemble {
        /// Local instance tag in hex; `0` accepts fragments for any instance.
        #[arg(short, long, default_value = "0", value_parser = parse_hex_tag)]
        instance: u16,
    },
    /// Split a message into wire fragments, one per output line.
    Split {
        /// Largest wire message the transport accepts, header included.
        #[arg(short, long)]
        limit: usize,
        /// Sender instance tag in hex; requires `--receiver`.
        #[arg(long, value_parser = parse_hex_tag, requires = "receiver")]
        sender: Option<u16>,
        /// Receiver instance tag in hex; requires `--sender`.
        #[arg(long, value_parser = parse_hex_tag, requires = "sender")]
        receiver: Option<u16>,
        /// Message to split.
        message: String,
    },
}

fn parse_hex_tag(text: &str) -> Result<u16, ParseIntError> { u16::from_str_radix(text, 16) }
