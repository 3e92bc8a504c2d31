//! Outbound helper that splits messages into wire fragments.
//!
//! [`Fragmenter`] is the counterpart of
//! [`FragmentAssembler`](crate::fragment::FragmentAssembler): every batch it
//! produces, fed in order to an assembler for the addressed instance, yields
//! the original message.

use tracing::trace;

use super::{EXTENDED_PREFIX, FragmentationConfig, FragmentationError, InstanceRoute, SHORT_PREFIX};

/// Digits used for the zero-padded `k` and `n` counters.
const COUNTER_WIDTH: usize = 5;
/// Hex digits used for each instance tag.
const TAG_WIDTH: usize = 8;

/// Number of header bytes wrapped around each fragment's piece.
///
/// Covers the prefix, the optional instance pair, both counters and the
/// three field separators.
///
/// # Examples
///
/// ```
/// use otr_fragment::fragment::fragment_overhead;
///
/// assert_eq!(fragment_overhead(false), "?OTR,00001,00002,,".len());
/// assert_eq!(
///     fragment_overhead(true),
///     "?OTR|00000001|00000002,00001,00002,,".len()
/// );
/// ```
#[must_use]
pub const fn fragment_overhead(extended: bool) -> usize {
    let counters = 2 * COUNTER_WIDTH + 3;
    if extended {
        EXTENDED_PREFIX.len() + 2 * TAG_WIDTH + 2 + counters
    } else {
        SHORT_PREFIX.len() + counters
    }
}

/// Splits outbound messages so each piece fits the transport limit.
#[derive(Clone, Copy, Debug)]
pub struct Fragmenter {
    config: FragmentationConfig,
}

impl Fragmenter {
    /// Create a fragmenter for `config`.
    #[must_use]
    pub const fn new(config: FragmentationConfig) -> Self { Self { config } }

    /// Return the active configuration.
    #[must_use]
    pub const fn config(&self) -> &FragmentationConfig { &self.config }

    /// Split `message` into wire fragments.
    ///
    /// Messages that already fit the transport limit are returned as a
    /// single unfragmented entry, unless they begin with a fragment prefix.
    /// Those are always wrapped so the receiver cannot mistake them for a
    /// fragment header; a leading `?OTR,` carries the separator and is
    /// therefore rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use otr_fragment::fragment::{FragmentationConfig, Fragmenter};
    ///
    /// let config = FragmentationConfig::for_transport_limit(20, None).expect("fits a header");
    /// let batch = Fragmenter::new(config).fragment("ABCDEFGHIJKLMNOPQRSTU").expect("splits");
    /// assert!(batch.is_fragmented());
    /// assert_eq!(batch.fragments()[0], "?OTR,00001,00011,AB,");
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`FragmentationError::LimitTooSmall`] when the limit cannot
    /// hold a header, [`FragmentationError::SeparatorInPayload`] when a
    /// message that needs wrapping contains `,`,
    /// [`FragmentationError::CharacterTooWide`] when a single character does
    /// not fit the payload cap, and [`FragmentationError::TooManyFragments`]
    /// when more than `u16::MAX` pieces would be required.
    pub fn fragment(&self, message: &str) -> Result<FragmentBatch, FragmentationError> {
        let limit = self.config.max_fragment_len.get();
        let cap = self
            .config
            .checked_payload_cap()
            .ok_or(FragmentationError::LimitTooSmall {
                limit,
                overhead: fragment_overhead(self.config.route.is_some()),
            })?
            .get();

        let prefixed = message.starts_with(SHORT_PREFIX) || message.starts_with(EXTENDED_PREFIX);
        if message.len() <= limit && !prefixed {
            return Ok(FragmentBatch::unfragmented(message.to_owned()));
        }
        if message.contains(',') {
            return Err(FragmentationError::SeparatorInPayload);
        }

        let pieces = split_pieces(message, cap)?;
        let total = u16::try_from(pieces.len()).map_err(|_| {
            FragmentationError::TooManyFragments {
                needed: pieces.len(),
            }
        })?;

        let fragments = (1..=total)
            .zip(&pieces)
            .map(|(index, piece)| self.encode(index, total, piece))
            .collect::<Vec<_>>();
        trace!(total, len = message.len(), "message fragmented");
        Ok(FragmentBatch {
            fragments,
            fragmented: true,
        })
    }

    fn encode(&self, index: u16, total: u16, piece: &str) -> String {
        let header = match self.config.route {
            Some(InstanceRoute { sender, receiver }) => {
                format!("{EXTENDED_PREFIX}{sender}|{receiver},")
            }
            None => SHORT_PREFIX.to_owned(),
        };
        format!(
            "{header}{index:0width$},{total:0width$},{piece},",
            width = COUNTER_WIDTH
        )
    }
}

/// Split on `char` boundaries into pieces of at most `cap` bytes.
fn split_pieces(message: &str, cap: usize) -> Result<Vec<&str>, FragmentationError> {
    let mut pieces = Vec::with_capacity(message.len().div_ceil(cap));
    let mut rest = message;
    while let Some(first) = rest.chars().next() {
        let width = first.len_utf8();
        if width > cap {
            return Err(FragmentationError::CharacterTooWide { width, cap });
        }
        let mut end = cap.min(rest.len());
        while !rest.is_char_boundary(end) {
            end -= 1;
        }
        let (piece, tail) = rest.split_at(end);
        pieces.push(piece);
        rest = tail;
    }
    Ok(pieces)
}

/// Wire messages produced for one logical message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FragmentBatch {
    fragments: Vec<String>,
    fragmented: bool,
}

impl FragmentBatch {
    fn unfragmented(message: String) -> Self {
        Self {
            fragments: vec![message],
            fragmented: false,
        }
    }

    /// Wire messages in transmission order.
    #[must_use]
    pub fn fragments(&self) -> &[String] { self.fragments.as_slice() }

    /// Number of wire messages in the batch.
    #[expect(
        clippy::len_without_is_empty,
        reason = "batches always hold at least one message"
    )]
    #[must_use]
    pub fn len(&self) -> usize { self.fragments.len() }

    /// Whether the message had to be split.
    #[must_use]
    pub const fn is_fragmented(&self) -> bool { self.fragmented }

    /// Consume the batch, returning the wire messages.
    #[must_use]
    pub fn into_fragments(self) -> Vec<String> { self.fragments }
}

impl IntoIterator for FragmentBatch {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter { self.fragments.into_iter() }
}
