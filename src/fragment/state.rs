//! Explicit assembly state for a single in-flight fragment sequence.
//!
//! The assembler is either idle or assembling exactly one sequence. Leaving
//! the assembling state always goes through `discard` or `take`, so there is
//! one place that wipes sensitive data and one place that hands a finished
//! buffer to the caller. Only the assembler drives these transitions, after
//! it has checked `0 < index <= total`.

use std::{mem, time::Instant};

use zeroize::Zeroize;

/// Fragments accepted so far for the tracked sequence.
#[derive(Debug)]
pub struct PartialMessage {
    current: u16,
    total: u16,
    buffer: String,
    started_at: Instant,
}

impl PartialMessage {
    /// Index of the last accepted fragment.
    #[must_use]
    pub const fn current(&self) -> u16 { self.current }

    /// Declared fragment count of the sequence.
    #[must_use]
    pub const fn total(&self) -> u16 { self.total }

    /// Concatenated payload of fragments `1..=current`.
    #[must_use]
    pub fn buffer(&self) -> &str { &self.buffer }

    /// When the first fragment of the sequence was accepted.
    #[must_use]
    pub const fn started_at(&self) -> Instant { self.started_at }

    /// Whether `(index, total)` is the next fragment of this sequence.
    #[must_use]
    pub fn continues_with(&self, index: u16, total: u16) -> bool {
        total == self.total && self.current.checked_add(1) == Some(index)
    }
}

/// Reassembly progress owned by one [`FragmentAssembler`](crate::fragment::FragmentAssembler).
#[derive(Debug, Default)]
pub enum AssemblyState {
    /// No sequence in progress.
    #[default]
    Empty,
    /// Fragments `1..=current` of a `total`-fragment sequence have arrived.
    Assembling(PartialMessage),
}

impl AssemblyState {
    /// Borrow the partial message, if any.
    #[must_use]
    pub fn partial(&self) -> Option<&PartialMessage> {
        match self {
            Self::Empty => None,
            Self::Assembling(partial) => Some(partial),
        }
    }

    /// Replace any tracked sequence with a new one holding fragment 1.
    pub(crate) fn start(&mut self, total: u16, piece: &str, now: Instant) {
        debug_assert!(total > 0, "a sequence declares at least one fragment");
        self.discard();
        *self = Self::Assembling(PartialMessage {
            current: 1,
            total,
            buffer: piece.to_owned(),
            started_at: now,
        });
    }

    /// Append the next in-order fragment.
    ///
    /// Returns `false` and leaves the state unchanged when `index` does not
    /// directly follow the tracked sequence or `total` differs from it.
    pub(crate) fn continue_with(&mut self, index: u16, total: u16, piece: &str) -> bool {
        match self {
            Self::Assembling(partial) if partial.continues_with(index, total) => {
                partial.current = index;
                partial.buffer.push_str(piece);
                true
            }
            _ => false,
        }
    }

    /// Drop the tracked sequence, wiping its buffer.
    pub(crate) fn discard(&mut self) {
        if let Self::Assembling(mut partial) = mem::take(self) {
            partial.buffer.zeroize();
        }
    }

    /// Hand over the buffered message and return to [`AssemblyState::Empty`].
    #[must_use]
    pub(crate) fn take(&mut self) -> Option<String> {
        match mem::take(self) {
            Self::Empty => None,
            Self::Assembling(partial) => Some(partial.buffer),
        }
    }
}
