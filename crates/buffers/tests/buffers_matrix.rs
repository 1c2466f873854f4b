//! Writer/Reader roundtrip and bounds-check matrix for the buffers crate.

use docwire_buffers::{BufferError, Reader, Writer};

// ---------------------------------------------------------------------------
// Roundtrips
// ---------------------------------------------------------------------------

#[test]
fn roundtrip_integers() {
    let mut w = Writer::new();
    w.u8(0xFF);
    w.i32(i32::MIN);
    w.u32(u32::MAX);
    w.i64(-1);
    w.u64(u64::MAX);
    let data = w.flush();
    assert_eq!(data.len(), 1 + 4 + 4 + 8 + 8);

    let mut r = Reader::new(&data);
    assert_eq!(r.u8().unwrap(), 0xFF);
    assert_eq!(r.i32().unwrap(), i32::MIN);
    assert_eq!(r.u32().unwrap(), u32::MAX);
    assert_eq!(r.i64().unwrap(), -1);
    assert_eq!(r.u64().unwrap(), u64::MAX);
    assert_eq!(r.size(), 0);
}

#[test]
fn integers_are_little_endian() {
    let mut w = Writer::new();
    w.i32(0x0102_0304);
    assert_eq!(w.flush(), [0x04, 0x03, 0x02, 0x01]);
}

#[test]
fn roundtrip_f64_specials() {
    let mut w = Writer::new();
    for v in [0.0, -0.0, f64::INFINITY, f64::NEG_INFINITY, f64::MIN_POSITIVE] {
        w.f64(v);
    }
    w.f64(f64::NAN);
    let data = w.flush();
    let mut r = Reader::new(&data);
    assert_eq!(r.f64().unwrap().to_bits(), 0.0f64.to_bits());
    assert_eq!(r.f64().unwrap().to_bits(), (-0.0f64).to_bits());
    assert_eq!(r.f64().unwrap(), f64::INFINITY);
    assert_eq!(r.f64().unwrap(), f64::NEG_INFINITY);
    assert_eq!(r.f64().unwrap(), f64::MIN_POSITIVE);
    assert!(r.f64().unwrap().is_nan());
}

#[test]
fn roundtrip_strings() {
    let mut w = Writer::new();
    w.cstring("name").unwrap();
    w.length_prefixed_str("héllo").unwrap();
    let data = w.flush();

    let mut r = Reader::new(&data);
    assert_eq!(r.cstring().unwrap(), "name");
    let len = r.i32().unwrap();
    assert_eq!(len, "héllo".len() as i32 + 1);
    assert_eq!(r.utf8(len as usize - 1).unwrap(), "héllo");
    assert_eq!(r.u8().unwrap(), 0);
}

#[test]
fn reserved_slot_is_patched() {
    let mut w = Writer::new();
    let pos = w.reserve_i32();
    w.u8(7);
    w.patch_i32(pos, w.len() as i32);
    assert_eq!(w.flush(), [5, 0, 0, 0, 7]);
}

#[test]
fn fixed_size_bytes() {
    let data = [1u8, 2, 3, 4, 5];
    let mut r = Reader::new(&data);
    assert_eq!(r.bytes::<3>().unwrap(), [1, 2, 3]);
    assert_eq!(r.peek().unwrap(), 4);
    r.skip(1).unwrap();
    assert_eq!(r.buf(1).unwrap(), &[5]);
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn reads_past_end_fail() {
    let data = [1u8, 2, 3];
    let mut r = Reader::new(&data);
    assert_eq!(
        r.i32(),
        Err(BufferError::EndOfBuffer {
            needed: 4,
            remaining: 3
        })
    );
    assert_eq!(r.x, 0);
    assert!(r.skip(4).is_err());
}

#[test]
fn reader_honours_its_end() {
    let data = [1u8, 2, 3, 4];
    let mut r = Reader::from_slice(&data, 1, 3);
    assert_eq!(r.size(), 2);
    assert_eq!(r.u8().unwrap(), 2);
    assert_eq!(r.u8().unwrap(), 3);
    assert!(r.u8().is_err());
}

#[test]
fn cstring_failures() {
    let mut r = Reader::new(b"abc");
    assert_eq!(r.cstring(), Err(BufferError::UnterminatedCString));

    let bad = [0xC3u8, 0x28, 0];
    let mut r = Reader::new(&bad);
    assert_eq!(r.cstring(), Err(BufferError::InvalidUtf8));

    let mut w = Writer::new();
    assert_eq!(w.cstring("a\0b"), Err(BufferError::InteriorNul));
    assert!(w.is_empty());
}
