//! Inbound helper that stitches text fragments back into complete messages.
//!
//! [`FragmentAssembler`] tracks at most one fragment sequence. Fragments must
//! arrive in order; anything that does not extend the tracked sequence either
//! starts a new one (index 1) or discards it. Extended fragments addressed to
//! another instance of the same account are ignored without touching the
//! tracked sequence.
//!
//! The assembler is not synchronised. Owners feed it one message at a time.

use std::time::Instant;

use tracing::{debug, trace};

use super::{
    AssemblerConfig,
    AssemblyError,
    AssemblyState,
    FragmentHeader,
    InstanceTag,
    SequenceFields,
};
use crate::metrics;

/// Stateful reassembler for one session's inbound fragments.
///
/// # Examples
///
/// ```
/// use otr_fragment::fragment::{FragmentAssembler, InstanceTag};
///
/// let mut assembler = FragmentAssembler::new(InstanceTag::new(1));
/// assert_eq!(assembler.accumulate("hello").as_deref(), Some("hello"));
///
/// assert_eq!(assembler.accumulate("?OTR,1,3,AB,"), None);
/// assert_eq!(assembler.accumulate("?OTR,2,3,CD,"), None);
/// assert_eq!(
///     assembler.accumulate("?OTR,3,3,EF,").as_deref(),
///     Some("ABCDEF")
/// );
/// ```
#[derive(Debug)]
pub struct FragmentAssembler {
    config: AssemblerConfig,
    state: AssemblyState,
}

impl FragmentAssembler {
    /// Create an assembler for the local endpoint `instance_tag`.
    #[must_use]
    pub fn new(instance_tag: InstanceTag) -> Self {
        Self::with_config(AssemblerConfig::new(instance_tag))
    }

    /// Create an assembler with explicit limits.
    #[must_use]
    pub fn with_config(config: AssemblerConfig) -> Self {
        Self {
            config,
            state: AssemblyState::Empty,
        }
    }

    /// Tag of the local endpoint.
    #[must_use]
    pub const fn instance_tag(&self) -> InstanceTag { self.config.instance_tag }

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &AssemblerConfig { &self.config }

    /// Whether a sequence is in progress.
    #[must_use]
    pub fn is_assembling(&self) -> bool { self.state.partial().is_some() }

    /// `(current, total)` of the sequence in progress.
    #[must_use]
    pub fn progress(&self) -> Option<(u16, u16)> {
        self.state
            .partial()
            .map(|partial| (partial.current(), partial.total()))
    }

    /// Bytes buffered for the sequence in progress.
    #[must_use]
    pub fn buffered_len(&self) -> usize {
        self.state
            .partial()
            .map_or(0, |partial| partial.buffer().len())
    }

    /// Feed one inbound message, returning the complete message if one is
    /// ready.
    ///
    /// Unfragmented messages are returned unchanged and discard any sequence
    /// in progress. Fragments return `None` until the last one of an in-order
    /// sequence arrives. Malformed, foreign and out-of-sequence fragments also
    /// return `None`; use [`push`](Self::push) to learn why.
    pub fn accumulate(&mut self, message: &str) -> Option<String> {
        self.push(message).ok().flatten()
    }

    /// Feed one inbound message, reporting why a fragment was dropped.
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError`] describing the drop. Whether the sequence
    /// in progress survived is given by [`AssemblyError::discards_state`].
    pub fn push(&mut self, message: &str) -> Result<Option<String>, AssemblyError> {
        self.push_at(message, Instant::now())
    }

    /// Feed one inbound message using an explicit clock reading.
    ///
    /// The reading only stamps the start of a new sequence for
    /// [`purge_expired_at`](Self::purge_expired_at).
    ///
    /// # Errors
    ///
    /// See [`push`](Self::push).
    pub fn push_at(
        &mut self,
        message: &str,
        now: Instant,
    ) -> Result<Option<String>, AssemblyError> {
        let result = self.process(message, now);
        if let Err(err) = &result {
            debug!(
                reason = err.as_str(),
                discarded = err.discards_state(),
                error = %err,
                "fragment dropped"
            );
            metrics::inc_dropped(err.as_str());
        }
        result
    }

    /// Discard the sequence in progress, wiping buffered data.
    pub fn reset(&mut self) { self.state.discard(); }

    /// Discard the sequence in progress if it outlived the configured
    /// timeout.
    ///
    /// Returns `true` when a sequence was discarded. Always `false` when no
    /// timeout is configured.
    pub fn purge_expired(&mut self) -> bool { self.purge_expired_at(Instant::now()) }

    /// [`purge_expired`](Self::purge_expired) with an explicit clock reading.
    pub fn purge_expired_at(&mut self, now: Instant) -> bool {
        let Some(timeout) = self.config.reassembly_timeout else {
            return false;
        };
        let expired = self
            .state
            .partial()
            .is_some_and(|partial| now.saturating_duration_since(partial.started_at()) >= timeout);
        if expired {
            debug!(progress = ?self.progress(), "stale fragment sequence purged");
            self.reset();
        }
        expired
    }

    fn process(&mut self, message: &str, now: Instant) -> Result<Option<String>, AssemblyError> {
        let fields = match FragmentHeader::classify(message)? {
            FragmentHeader::Unfragmented(text) => {
                self.reset();
                return Ok(Some(text.to_owned()));
            }
            FragmentHeader::Short { fields } => fields,
            FragmentHeader::Extended {
                receiver, fields, ..
            } => {
                let local = self.config.instance_tag;
                if !local.accepts(receiver) {
                    return Err(AssemblyError::ForeignInstance { receiver, local });
                }
                fields
            }
        };

        let fields = SequenceFields::parse(fields)?;
        self.advance(fields, now)
    }

    fn advance(
        &mut self,
        fields: SequenceFields<'_>,
        now: Instant,
    ) -> Result<Option<String>, AssemblyError> {
        let SequenceFields {
            index,
            total,
            piece,
        } = fields;

        if !fields.has_valid_bounds() {
            self.reset();
            return Err(AssemblyError::InvalidBounds { index, total });
        }

        if index == 1 {
            self.state.start(total, piece, now);
        } else if !self.state.continue_with(index, total, piece) {
            let (expected, tracked_total) = self
                .state
                .partial()
                .map_or((1, 0), |partial| {
                    (partial.current().saturating_add(1), partial.total())
                });
            self.reset();
            return Err(AssemblyError::SequenceMismatch {
                expected,
                found: index,
                total: tracked_total,
                declared_total: total,
            });
        }

        self.enforce_size_limit()?;
        trace!(index, total, "fragment accepted");
        metrics::inc_accepted();

        if !fields.is_last() {
            return Ok(None);
        }
        let message = self.state.take();
        if message.is_some() {
            metrics::inc_reassembled();
        }
        Ok(message)
    }

    fn enforce_size_limit(&mut self) -> Result<(), AssemblyError> {
        let Some(limit) = self.config.max_message_size else {
            return Ok(());
        };
        let attempted = self.buffered_len();
        if attempted > limit.get() {
            self.reset();
            return Err(AssemblyError::MessageTooLarge { attempted, limit });
        }
        Ok(())
    }
}

impl Drop for FragmentAssembler {
    fn drop(&mut self) { self.reset(); }
}
