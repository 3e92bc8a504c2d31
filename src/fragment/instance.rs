//! Endpoint instance tags carried by extended fragment headers.
//!
//! Several clients logged into the same account share a conversation; the
//! instance tag tells them apart. The value `0` is the unspecified tag and
//! matches any receiver.

use std::num::ParseIntError;

use derive_more::{Display, From, Into};

/// Numeric identifier of a local or remote protocol endpoint instance.
///
/// # Examples
///
/// ```
/// use otr_fragment::fragment::InstanceTag;
///
/// let tag = InstanceTag::from_hex("00000102").expect("valid hex");
/// assert_eq!(tag.get(), 0x102);
/// assert_eq!(tag.to_string(), "00000102");
/// assert!(tag.accepts(InstanceTag::UNSPECIFIED));
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into,
)]
#[display("{_0:08x}")]
pub struct InstanceTag(u16);

impl InstanceTag {
    /// Tag matching every receiver.
    pub const UNSPECIFIED: Self = Self(0);

    /// Wrap a raw tag value.
    #[must_use]
    pub const fn new(value: u16) -> Self { Self(value) }

    /// Return the raw tag value.
    #[must_use]
    pub const fn get(self) -> u16 { self.0 }

    /// Whether this is the unspecified (wildcard) tag.
    #[must_use]
    pub const fn is_unspecified(self) -> bool { self.0 == 0 }

    /// Parse the hexadecimal wire representation of a tag.
    ///
    /// Leading zeros are accepted, so the eight digit form written by
    /// [`Fragmenter`](crate::fragment::Fragmenter) parses back as long as the
    /// value fits in 16 bits.
    ///
    /// # Errors
    ///
    /// Returns [`ParseIntError`] when `text` is empty, contains non-hex
    /// characters, or overflows `u16`.
    pub fn from_hex(text: &str) -> Result<Self, ParseIntError> {
        u16::from_str_radix(text, 16).map(Self)
    }

    /// Whether a fragment addressed to `receiver` is meant for this endpoint.
    #[must_use]
    pub const fn accepts(self, receiver: Self) -> bool {
        receiver.is_unspecified() || receiver.0 == self.0
    }
}
