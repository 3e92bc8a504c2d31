//! Tests for prefix classification and sequence field parsing.

use rstest::rstest;

use crate::fragment::{AssemblyError, FragmentHeader, InstanceTag, SequenceFields};

#[rstest]
#[case::plain("hello")]
#[case::empty("")]
#[case::otr_data("?OTR:AAMDdata.")]
#[case::bare_prefix("?OTR")]
#[case::lowercase("?otr,1,2,x,")]
fn messages_without_prefix_are_unfragmented(#[case] message: &str) {
    assert_eq!(
        FragmentHeader::classify(message),
        Ok(FragmentHeader::Unfragmented(message))
    );
}

#[test]
fn short_prefix_is_stripped() {
    let header = FragmentHeader::classify("?OTR,1,3,AB,").expect("short header");
    assert_eq!(header, FragmentHeader::Short { fields: "1,3,AB," });
    assert_eq!(header.fields(), Some("1,3,AB,"));
}

#[test]
fn extended_header_splits_instance_pair() {
    let header = FragmentHeader::classify("?OTR|0000abcd|00000002,1,2,Hi,").expect("extended");
    assert_eq!(
        header,
        FragmentHeader::Extended {
            sender: "0000abcd",
            receiver: InstanceTag::new(2),
            fields: "1,2,Hi,",
        }
    );
}

#[test]
fn extended_header_does_not_validate_sender() {
    let header = FragmentHeader::classify("?OTR|not-hex|0,1,1,x,").expect("sender ignored");
    assert!(matches!(
        header,
        FragmentHeader::Extended {
            sender: "not-hex",
            receiver: InstanceTag::UNSPECIFIED,
            ..
        }
    ));
}

#[rstest]
#[case::no_comma("?OTR|00000001|00000002")]
#[case::no_pipe("?OTR|00000001,1,2,Hi,")]
#[case::receiver_not_hex("?OTR|00000001|zz,1,2,Hi,")]
#[case::receiver_empty("?OTR|00000001|,1,2,Hi,")]
#[case::receiver_overflow("?OTR|00000001|10000,1,2,Hi,")]
#[case::extra_pipe("?OTR|1|2|3,1,2,Hi,")]
fn malformed_extended_headers_are_rejected(#[case] message: &str) {
    assert_eq!(
        FragmentHeader::classify(message),
        Err(AssemblyError::MalformedInstanceHeader)
    );
}

#[rstest]
#[case::minimal("1,3,AB,", 1, 3, "AB")]
#[case::zero_padded("00002,00003,CD,", 2, 3, "CD")]
#[case::no_trailing_comma("3,3,EF", 3, 3, "EF")]
#[case::trailing_content_ignored("1,2,piece,more,stuff", 1, 2, "piece")]
#[case::empty_piece("1,1,,", 1, 1, "")]
#[case::unchecked_bounds("0,0,x,", 0, 0, "x")]
fn sequence_fields_parse(
    #[case] input: &str,
    #[case] index: u16,
    #[case] total: u16,
    #[case] piece: &str,
) {
    let fields = SequenceFields::parse(input).expect("fields should parse");
    assert_eq!(
        fields,
        SequenceFields {
            index,
            total,
            piece,
        }
    );
}

#[rstest]
#[case::non_numeric_index("a,3,AB,")]
#[case::non_numeric_total("1,b,AB,")]
#[case::negative("-1,3,AB,")]
#[case::overflow("1,65536,AB,")]
#[case::missing_piece("1,3")]
#[case::empty("")]
#[case::spaces(" 1,3,AB,")]
fn malformed_sequence_fields_are_rejected(#[case] input: &str) {
    assert_eq!(
        SequenceFields::parse(input),
        Err(AssemblyError::MalformedSequence)
    );
}

#[rstest]
#[case(1, 1, true, true)]
#[case(2, 3, true, false)]
#[case(3, 3, true, true)]
#[case(0, 3, false, false)]
#[case(1, 0, false, false)]
#[case(4, 3, false, false)]
fn sequence_bounds(
    #[case] index: u16,
    #[case] total: u16,
    #[case] valid: bool,
    #[case] last: bool,
) {
    let fields = SequenceFields {
        index,
        total,
        piece: "",
    };
    assert_eq!(fields.has_valid_bounds(), valid);
    assert_eq!(fields.is_last(), last);
}

#[test]
fn instance_tag_accepts_unspecified_and_own_receiver() {
    let local = InstanceTag::new(1);
    assert!(local.accepts(InstanceTag::UNSPECIFIED));
    assert!(local.accepts(InstanceTag::new(1)));
    assert!(!local.accepts(InstanceTag::new(2)));
    assert!(InstanceTag::UNSPECIFIED.accepts(InstanceTag::new(2)));
}
