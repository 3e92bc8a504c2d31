//! Wire-level classification of inbound text messages.
//!
//! A fragmented message comes in one of two shapes:
//!
//! ```text
//! ?OTR,<k>,<n>,<piece>,
//! ?OTR|<sender-hex>|<receiver-hex>,<k>,<n>,<piece>,
//! ```
//!
//! Anything without one of the two prefixes is a complete message and is
//! passed through untouched.

use super::{AssemblyError, InstanceTag};

/// Prefix of the short (two-field) fragment header.
pub const SHORT_PREFIX: &str = "?OTR,";
/// Prefix of the extended (instance-tagged) fragment header.
pub const EXTENDED_PREFIX: &str = "?OTR|";

const FIELD_SEPARATOR: char = ',';
const INSTANCE_SEPARATOR: char = '|';

/// Header shape detected on an inbound message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FragmentHeader<'a> {
    /// No fragment prefix; the message is complete as received.
    Unfragmented(&'a str),
    /// Short header; `fields` is everything after the prefix.
    Short {
        /// Remaining `k,n,piece,...` text.
        fields: &'a str,
    },
    /// Extended header with sender and receiver instance tags.
    Extended {
        /// Sender tag text. Carried through but never validated.
        sender: &'a str,
        /// Receiver tag the fragment is addressed to.
        receiver: InstanceTag,
        /// Remaining `k,n,piece,...` text.
        fields: &'a str,
    },
}

impl<'a> FragmentHeader<'a> {
    /// Classify `message` by its prefix.
    ///
    /// # Examples
    ///
    /// ```
    /// use otr_fragment::fragment::{FragmentHeader, InstanceTag};
    ///
    /// let header = FragmentHeader::classify("?OTR|00000001|00000002,1,2,Hi,").expect("well formed");
    /// assert_eq!(
    ///     header,
    ///     FragmentHeader::Extended {
    ///         sender: "00000001",
    ///         receiver: InstanceTag::new(2),
    ///         fields: "1,2,Hi,",
    ///     }
    /// );
    /// assert_eq!(
    ///     FragmentHeader::classify("hello"),
    ///     Ok(FragmentHeader::Unfragmented("hello"))
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::MalformedInstanceHeader`] when an extended
    /// header is missing its instance pair, the comma after it, or carries a
    /// receiver that is not 16-bit hex.
    pub fn classify(message: &'a str) -> Result<Self, AssemblyError> {
        if let Some(fields) = message.strip_prefix(SHORT_PREFIX) {
            return Ok(Self::Short { fields });
        }
        let Some(rest) = message.strip_prefix(EXTENDED_PREFIX) else {
            return Ok(Self::Unfragmented(message));
        };

        let (instances, fields) = rest
            .split_once(FIELD_SEPARATOR)
            .ok_or(AssemblyError::MalformedInstanceHeader)?;
        let (sender, receiver) = instances
            .split_once(INSTANCE_SEPARATOR)
            .ok_or(AssemblyError::MalformedInstanceHeader)?;
        let receiver =
            InstanceTag::from_hex(receiver).map_err(|_| AssemblyError::MalformedInstanceHeader)?;

        Ok(Self::Extended {
            sender,
            receiver,
            fields,
        })
    }

    /// Sequence field text, or `None` for an unfragmented message.
    #[must_use]
    pub const fn fields(&self) -> Option<&'a str> {
        match *self {
            Self::Unfragmented(_) => None,
            Self::Short { fields } | Self::Extended { fields, .. } => Some(fields),
        }
    }
}

/// The `k,n,piece` triple shared by both header shapes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SequenceFields<'a> {
    /// 1-based index of this fragment.
    pub index: u16,
    /// Declared number of fragments in the sequence.
    pub total: u16,
    /// Payload of this fragment.
    pub piece: &'a str,
}

impl<'a> SequenceFields<'a> {
    /// Parse `k,n,piece[,rest]`.
    ///
    /// Only the third field is kept as the piece; anything after the next
    /// comma is ignored. Bounds are not checked here, so `0,0,x` parses.
    ///
    /// # Examples
    ///
    /// ```
    /// use otr_fragment::fragment::SequenceFields;
    ///
    /// let fields = SequenceFields::parse("00002,00003,CD,trailing").expect("numeric");
    /// assert_eq!((fields.index, fields.total, fields.piece), (2, 3, "CD"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`AssemblyError::MalformedSequence`] when fewer than three
    /// fields are present or `k`/`n` are not unsigned 16-bit integers.
    pub fn parse(fields: &'a str) -> Result<Self, AssemblyError> {
        let mut parts = fields.splitn(4, FIELD_SEPARATOR);
        let index = parse_counter(parts.next())?;
        let total = parse_counter(parts.next())?;
        let piece = parts.next().ok_or(AssemblyError::MalformedSequence)?;
        Ok(Self {
            index,
            total,
            piece,
        })
    }

    /// Whether the index and total describe a possible fragment.
    #[must_use]
    pub const fn has_valid_bounds(&self) -> bool {
        self.index != 0 && self.total != 0 && self.index <= self.total
    }

    /// Whether this fragment is the last of its sequence.
    #[must_use]
    pub const fn is_last(&self) -> bool { self.total > 0 && self.index == self.total }
}

fn parse_counter(field: Option<&str>) -> Result<u16, AssemblyError> {
    field
        .and_then(|text| text.parse().ok())
        .ok_or(AssemblyError::MalformedSequence)
}
