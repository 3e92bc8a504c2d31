//! Configuration for inbound reassembly and outbound fragmentation.

use std::{num::NonZeroUsize, time::Duration};

use super::{InstanceTag, fragment_overhead};

/// Settings for a [`FragmentAssembler`](crate::fragment::FragmentAssembler).
///
/// Only the instance tag is required. The size cap and timeout are off by
/// default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssemblerConfig {
    /// Tag of the local endpoint; extended fragments addressed elsewhere are
    /// dropped. [`InstanceTag::UNSPECIFIED`] accepts every fragment.
    pub instance_tag: InstanceTag,
    /// Hard cap on the reassembled message length in bytes.
    pub max_message_size: Option<NonZeroUsize>,
    /// Age after which [`purge_expired`](crate::fragment::FragmentAssembler::purge_expired)
    /// discards an incomplete sequence.
    pub reassembly_timeout: Option<Duration>,
}

impl AssemblerConfig {
    /// Configuration for `instance_tag` with no size cap or timeout.
    #[must_use]
    pub const fn new(instance_tag: InstanceTag) -> Self {
        Self {
            instance_tag,
            max_message_size: None,
            reassembly_timeout: None,
        }
    }

    /// Cap the reassembled message length.
    #[must_use]
    pub const fn with_max_message_size(mut self, limit: NonZeroUsize) -> Self {
        self.max_message_size = Some(limit);
        self
    }

    /// Allow stalled sequences to be purged after `timeout`.
    #[must_use]
    pub const fn with_reassembly_timeout(mut self, timeout: Duration) -> Self {
        self.reassembly_timeout = Some(timeout);
        self
    }
}

/// Sender and receiver tags written into extended fragment headers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InstanceRoute {
    /// Tag of the sending endpoint.
    pub sender: InstanceTag,
    /// Tag of the intended receiver.
    pub receiver: InstanceTag,
}

/// Settings for a [`Fragmenter`](crate::fragment::Fragmenter).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FragmentationConfig {
    /// Largest message, header included, the transport accepts.
    pub max_fragment_len: NonZeroUsize,
    /// When set, fragments use the extended, instance-tagged header.
    pub route: Option<InstanceRoute>,
}

impl FragmentationConfig {
    /// Derive a configuration from the transport's message size limit.
    ///
    /// Returns `None` when `limit` cannot hold the header plus at least one
    /// payload byte.
    ///
    /// # Examples
    ///
    /// ```
    /// use otr_fragment::fragment::FragmentationConfig;
    ///
    /// assert!(FragmentationConfig::for_transport_limit(18, None).is_none());
    /// let config = FragmentationConfig::for_transport_limit(19, None).expect("fits a header");
    /// assert_eq!(config.payload_cap().get(), 1);
    /// ```
    #[must_use]
    pub fn for_transport_limit(limit: usize, route: Option<InstanceRoute>) -> Option<Self> {
        let config = Self {
            max_fragment_len: NonZeroUsize::new(limit)?,
            route,
        };
        config.checked_payload_cap().map(|_| config)
    }

    /// Payload bytes available per fragment once the header is accounted for.
    ///
    /// Configurations built through [`for_transport_limit`](Self::for_transport_limit)
    /// always have room for at least one byte; hand-built ones that do not
    /// report a cap of one and are rejected by the fragmenter.
    #[must_use]
    pub fn payload_cap(&self) -> NonZeroUsize {
        self.checked_payload_cap().unwrap_or(NonZeroUsize::MIN)
    }

    pub(crate) fn checked_payload_cap(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(
            self.max_fragment_len
                .get()
                .saturating_sub(fragment_overhead(self.route.is_some())),
        )
    }
}
