#![doc(html_root_url = "https://docs.rs/otr-fragment/latest")]
//! Public API for the `otr-fragment` library.
//!
//! This crate reassembles instance-tagged text fragments into complete
//! protocol messages and splits outbound messages to fit transports with a
//! small message size limit. It deals only with framing; encryption and the
//! protocol state machine live elsewhere.

pub mod fragment;
pub mod metrics;

pub use fragment::{
    AssemblerConfig,
    AssemblyError,
    FragmentAssembler,
    FragmentBatch,
    FragmentationConfig,
    FragmentationError,
    Fragmenter,
    InstanceRoute,
    InstanceTag,
};
