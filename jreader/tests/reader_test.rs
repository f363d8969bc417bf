mod one_byte_reader;

use jreader::CharReader;
use one_byte_reader::OneByteReader;

#[test]
fn decodes_multibyte_characters_fed_one_byte_at_a_time() {
    let input = "a\u{e9}\u{1f600}b";
    let mut reader = CharReader::new(OneByteReader::new(input.bytes()));
    let mut out = String::new();
    while let Some(c) = reader.next_char().unwrap() {
        out.push(c);
    }
    assert_eq!(out, input);
}

#[test]
fn truncated_multibyte_sequence_at_eof_is_an_error() {
    // 0xe9 0x00 is the leading byte of a 2-byte sequence, immediately followed
    // by an unrelated byte that is not a valid continuation byte.
    let mut reader = CharReader::new(OneByteReader::new([0xe9u8, 0x00].into_iter()));
    assert!(reader.next_char().is_err());
}

#[test]
fn lone_continuation_byte_at_stream_end_is_an_error() {
    let mut reader = CharReader::new(OneByteReader::new([0xe9u8].into_iter()));
    assert!(reader.next_char().is_err());
}
