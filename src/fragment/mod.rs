//! Text fragment reassembly and splitting for instance-tagged messaging.
//!
//! Transports with a small message size limit carry one logical message as
//! several numbered fragments. This module collects the types that classify
//! fragment headers, track an in-flight sequence, and split outbound messages.
//! Each sub-module focuses on a single concept while the re-exports below form
//! one cohesive API.

pub mod assembler;
pub mod config;
pub mod error;
pub mod fragmenter;
pub mod header;
pub mod instance;
pub mod state;

pub use assembler::FragmentAssembler;
pub use config::{AssemblerConfig, FragmentationConfig, InstanceRoute};
pub use error::{AssemblyError, FragmentationError};
pub use fragmenter::{FragmentBatch, Fragmenter, fragment_overhead};
pub use header::{EXTENDED_PREFIX, FragmentHeader, SHORT_PREFIX, SequenceFields};
pub use instance::InstanceTag;
pub use state::{AssemblyState, PartialMessage};
