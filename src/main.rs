//! Line-oriented front end for `otr-fragment`.
//!
//! `assemble` feeds stdin through a [`FragmentAssembler`] and prints each
//! completed message; `split` prints the wire fragments for one message.

mod cli;

use std::{
    error::Error,
    io::{self, BufRead, Write},
};

use clap::Parser;
use otr_fragment::{
    FragmentAssembler,
    FragmentationConfig,
    Fragmenter,
    InstanceRoute,
    InstanceTag,
};
use tracing::warn;

use crate::cli::{Cli, Command};

fn main() -> Result<(), Box<dyn Error>> {
    // Logs go to stderr so stdout carries only messages.
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();
    match cli.command {
        Command::Assemble { instance } => assemble(InstanceTag::new(instance)),
        Command::Split {
            limit,
            sender,
            receiver,
            message,
        } => {
            let route = sender.zip(receiver).map(|(sender, receiver)| InstanceRoute {
                sender: InstanceTag::new(sender),
                receiver: InstanceTag::new(receiver),
            });
            split(limit, route, &message)
        }
    }
}

fn assemble(instance: InstanceTag) -> Result<(), Box<dyn Error>> {
    let mut assembler = FragmentAssembler::new(instance);
    let mut out = io::stdout().lock();
    for (number, line) in io::stdin().lock().lines().enumerate() {
        match assembler.push(&line?) {
            Ok(Some(message)) => writeln!(out, "{message}")?,
            Ok(None) => {}
            Err(err) => warn!(line = number + 1, error = %err, "fragment dropped"),
        }
    }
    if let Some((current, total)) = assembler.progress() {
        warn!(current, total, "input ended with an incomplete fragment sequence");
    }
    Ok(())
}

fn split(limit: usize, route: Option<InstanceRoute>, message: &str) -> Result<(), Box<dyn Error>> {
    let config = FragmentationConfig::for_transport_limit(limit, route)
        .ok_or_else(|| format!("limit {limit} cannot carry a fragment header"))?;
    let mut out = io::stdout().lock();
    for fragment in Fragmenter::new(config).fragment(message)? {
        writeln!(out, "{fragment}")?;
    }
    Ok(())
}
