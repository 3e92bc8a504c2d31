//! Error types emitted by the fragment reassembly and splitting layers.
//!
//! None of the inbound errors is fatal to a session. They describe why a
//! fragment produced no message, and whether the in-progress sequence
//! survived, so callers and tests can tell the drop paths apart.

use std::num::NonZeroUsize;

use thiserror::Error;

use super::InstanceTag;

/// Reasons a fragment was dropped by [`FragmentAssembler`](crate::fragment::FragmentAssembler).
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum AssemblyError {
    /// The extended header lacks its `sender|receiver` pair or the comma that
    /// separates it from the sequence fields, or the receiver is not 16-bit hex.
    #[error("malformed instance header")]
    MalformedInstanceHeader,
    /// The fragment is addressed to another instance of the same account.
    #[error("fragment addressed to instance {receiver}, local instance is {local}")]
    ForeignInstance {
        /// Receiver tag declared by the fragment.
        receiver: InstanceTag,
        /// Tag of the local endpoint.
        local: InstanceTag,
    },
    /// The `k,n,piece` fields are missing or `k`/`n` are not unsigned 16-bit
    /// integers.
    #[error("malformed sequence fields")]
    MalformedSequence,
    /// The index or total is zero, or the index exceeds the total.
    #[error("invalid fragment bounds: index {index} of {total}")]
    InvalidBounds {
        /// Declared 1-based fragment index.
        index: u16,
        /// Declared fragment count.
        total: u16,
    },
    /// The fragment does not continue the sequence being assembled.
    #[error(
        "fragment sequence mismatch: expected {expected} of {total}, found {found} of \
         {declared_total}"
    )]
    SequenceMismatch {
        /// Index the assembler expected next (`1` when nothing is in progress).
        expected: u16,
        /// Index carried by the fragment.
        found: u16,
        /// Total of the tracked sequence (`0` when nothing is in progress).
        total: u16,
        /// Total carried by the fragment.
        declared_total: u16,
    },
    /// Appending the fragment would exceed the configured message size cap.
    #[error("reassembled message exceeds size limit: {attempted} bytes > {limit} bytes")]
    MessageTooLarge {
        /// Size the buffer would have reached.
        attempted: usize,
        /// Configured cap.
        limit: NonZeroUsize,
    },
}

impl AssemblyError {
    /// Whether this error discarded the in-progress sequence.
    ///
    /// Header-level drops (malformed instance header, foreign instance,
    /// unparsable sequence fields) leave the sequence untouched; everything
    /// that reached the sequencing step resets it.
    ///
    /// # Examples
    ///
    /// ```
    /// use otr_fragment::fragment::AssemblyError;
    ///
    /// assert!(!AssemblyError::MalformedSequence.discards_state());
    /// assert!(AssemblyError::InvalidBounds { index: 0, total: 2 }.discards_state());
    /// ```
    #[must_use]
    pub const fn discards_state(&self) -> bool {
        matches!(
            self,
            Self::InvalidBounds { .. } | Self::SequenceMismatch { .. } | Self::MessageTooLarge { .. }
        )
    }

    /// Short label used for logging and metrics.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MalformedInstanceHeader => "malformed_instance_header",
            Self::ForeignInstance { .. } => "foreign_instance",
            Self::MalformedSequence => "malformed_sequence",
            Self::InvalidBounds { .. } => "invalid_bounds",
            Self::SequenceMismatch { .. } => "sequence_mismatch",
            Self::MessageTooLarge { .. } => "message_too_large",
        }
    }
}

/// Errors produced while splitting outbound messages.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FragmentationError {
    /// The transport limit leaves no room for payload after the header.
    #[error("transport limit {limit} cannot carry a fragment header of {overhead} bytes")]
    LimitTooSmall {
        /// Configured maximum wire fragment length.
        limit: usize,
        /// Bytes consumed by prefix, counters and separators.
        overhead: usize,
    },
    /// Splitting would need more fragments than a 16-bit counter can express.
    #[error("message needs {needed} fragments, at most {max} are allowed", max = u16::MAX)]
    TooManyFragments {
        /// Number of fragments the message would need.
        needed: usize,
    },
    /// A character of the message is wider than the payload cap, so no
    /// fragment within the transport limit can carry it.
    #[error("character of {width} bytes does not fit a fragment payload cap of {cap} bytes")]
    CharacterTooWide {
        /// UTF-8 width of the character.
        width: usize,
        /// Payload bytes available per fragment.
        cap: usize,
    },
    /// The payload contains the field separator and would not parse back.
    #[error("message contains the fragment field separator ','")]
    SeparatorInPayload,
}
