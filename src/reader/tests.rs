use super::DataReader;

#[test]
fn fixed_width_reads() {
    #[rustfmt::skip]
    let data = [
        0x2a,
        0x34, 0x12,
        0x78, 0x56, 0x34, 0x12,
        0xf0, 0xde, 0xbc, 0x9a, 0x78, 0x56, 0x34, 0x12,
    ];

    let mut reader = DataReader::new(&data, 8);
    assert_eq!(reader.read_u8(0), 0x2a);
    assert_eq!(reader.read_u16(0), 0x1234);
    assert_eq!(reader.read_u32(0), 0x12345678);
    assert_eq!(reader.read_u64(0), 0x123456789abcdef0);
    assert!(!reader.has_overflow());
    assert!(!reader.has_data());
}

#[test]
fn overflow_is_sticky_and_returns_defaults() {
    let data = [0x01, 0x02];
    let mut reader = DataReader::new(&data, 4);

    assert_eq!(reader.read_u32(0xdead_beef), 0xdead_beef);
    assert!(reader.has_overflow());

    // everything after the overflow keeps returning defaults
    assert_eq!(reader.read_u8(0x7f), 0x7f);
    assert_eq!(reader.read_unsigned_leb128(99), 99);
}

#[test]
fn address_reads_respect_address_size() {
    let data = [0x78, 0x56, 0x34, 0x12, 0xff, 0xff, 0xff, 0xff];

    let mut reader = DataReader::new(&data, 4);
    assert_eq!(reader.read_address(0), 0x12345678);

    let mut reader = DataReader::new(&data, 8);
    assert_eq!(reader.read_address(0), 0xffffffff_12345678);
}

#[test]
fn unsigned_leb128() {
    // 624485 is the classic multi-byte example
    let mut reader = DataReader::new(&[0xe5, 0x8e, 0x26], 4);
    assert_eq!(reader.read_unsigned_leb128(0), 624485);

    let mut reader = DataReader::new(&[0x00], 4);
    assert_eq!(reader.read_unsigned_leb128(7), 0);

    let mut reader = DataReader::new(&[0x7f], 4);
    assert_eq!(reader.read_unsigned_leb128(0), 127);
}

#[test]
fn signed_leb128_sign_extends() {
    // -8 encodes as a single byte with the sign bit set
    let mut reader = DataReader::new(&[0x78], 4);
    assert_eq!(reader.read_signed_leb128(0), -8);

    // -123456
    let mut reader = DataReader::new(&[0xc0, 0xbb, 0x78], 4);
    assert_eq!(reader.read_signed_leb128(0), -123456);

    let mut reader = DataReader::new(&[0x3f], 4);
    assert_eq!(reader.read_signed_leb128(0), 63);
}

#[test]
fn unterminated_leb128_overflows() {
    let mut reader = DataReader::new(&[0x80, 0x80], 4);
    assert_eq!(reader.read_unsigned_leb128(42), 42);
    assert!(reader.has_overflow());
}

#[test]
fn strings() {
    let data = b"hello\0world\0";
    let mut reader = DataReader::new(data, 4);
    assert_eq!(reader.read_string(""), "hello");
    assert_eq!(reader.read_string(""), "world");
    assert!(!reader.has_overflow());
    assert!(!reader.has_data());

    // missing terminator
    let mut reader = DataReader::new(b"abc", 4);
    assert_eq!(reader.read_string("dflt"), "dflt");
    assert!(reader.has_overflow());
}

#[test]
fn initial_length_switches_to_dwarf64() {
    let mut reader = DataReader::new(&[0x10, 0x00, 0x00, 0x00], 4);
    assert_eq!(reader.read_initial_length(), (0x10, false));

    #[rustfmt::skip]
    let data = [
        0xff, 0xff, 0xff, 0xff,
        0x20, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];
    let mut reader = DataReader::new(&data, 4);
    assert_eq!(reader.read_initial_length(), (0x20, true));
}

#[test]
fn seek_and_skip() {
    let data = [0, 1, 2, 3, 4, 5, 6, 7];
    let mut reader = DataReader::new(&data, 4);

    assert!(reader.skip(3));
    assert_eq!(reader.offset(), 3);
    assert_eq!(reader.read_u8(0), 3);

    reader.seek_absolute(6);
    assert_eq!(reader.read_u8(0), 6);
    assert_eq!(reader.bytes_remaining(), 1);

    // skipping past the end overflows
    assert!(!reader.skip(5));
    assert!(reader.has_overflow());
}

#[test]
fn restricted_readers() {
    let data = [0, 1, 2, 3, 4, 5, 6, 7];
    let mut reader = DataReader::new(&data, 4);
    reader.skip(2);

    let mut sub = reader.restricted_reader(3);
    assert_eq!(sub.offset(), 0);
    assert_eq!(sub.bytes_remaining(), 3);
    assert_eq!(sub.read_u8(0), 2);

    // the parent is unaffected
    assert_eq!(reader.offset(), 2);

    reader.skip(4);
    let mut back = reader.restricted_reader_at(-4, 2);
    assert_eq!(back.read_u8(0), 2);
    assert_eq!(back.read_u8(0), 3);
    assert!(!back.has_data());
}
