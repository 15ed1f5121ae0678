//! Line buffer tests

use rust_tilt_morse::config::LINE_CAPACITY;
use rust_tilt_morse::console::line_buffer::{Feed, LineBuffer};

fn feed_all(buf: &mut LineBuffer, bytes: &[u8]) -> Vec<Feed> {
    bytes.iter().map(|&b| buf.feed(b)).collect()
}

#[test]
fn test_line_buffer_push() {
    let mut buf = LineBuffer::new();

    let results = feed_all(&mut buf, b"help");

    assert!(results.iter().all(|r| *r == Feed::Pending));
    assert_eq!(buf.as_str(), "help");
    assert_eq!(buf.len(), 4);
}

#[test]
fn test_line_buffer_lf_completes() {
    let mut buf = LineBuffer::new();

    feed_all(&mut buf, b"SOS");
    assert_eq!(buf.feed(b'\n'), Feed::Complete);
    assert_eq!(buf.as_str(), "SOS");
}

#[test]
fn test_line_buffer_ignores_cr() {
    let mut buf = LineBuffer::new();

    feed_all(&mut buf, b"HI\r");
    assert_eq!(buf.feed(b'\n'), Feed::Complete);
    assert_eq!(buf.as_str(), "HI");
}

#[test]
fn test_line_buffer_clear() {
    let mut buf = LineBuffer::new();

    feed_all(&mut buf, b"test\n");
    buf.clear();

    assert!(buf.is_empty());
    assert_eq!(buf.as_str(), "");
}

#[test]
fn test_line_buffer_overflow_resets() {
    let mut buf = LineBuffer::new();

    for _ in 0..LINE_CAPACITY {
        assert_eq!(buf.feed(b'x'), Feed::Pending);
    }
    assert_eq!(buf.len(), LINE_CAPACITY);

    assert_eq!(buf.feed(b'y'), Feed::Overflow);
    assert!(buf.is_empty());

    // Usable again straight away
    feed_all(&mut buf, b"ok");
    assert_eq!(buf.feed(b'\n'), Feed::Complete);
    assert_eq!(buf.as_str(), "ok");
}

#[test]
fn test_line_buffer_empty_line() {
    let mut buf = LineBuffer::new();
    assert_eq!(buf.feed(b'\n'), Feed::Complete);
    assert_eq!(buf.as_str(), "");
}

#[test]
fn test_line_buffer_repairs_invalid_utf8() {
    let mut buf = LineBuffer::new();
    feed_all(&mut buf, b"ab\xFFc");
    assert_eq!(buf.as_str(), "");

    assert_eq!(buf.repair_utf8(), 1);
    assert_eq!(buf.as_str(), "ab?c");
    // Already valid now
    assert_eq!(buf.repair_utf8(), 0);
}

#[test]
fn test_line_buffer_repair_keeps_valid_multibyte() {
    let mut buf = LineBuffer::new();
    feed_all(&mut buf, "é\u{2192}".as_bytes());
    assert_eq!(buf.repair_utf8(), 0);
    assert_eq!(buf.as_str(), "é\u{2192}");

    // Truncated sequence at the end, then a lone continuation byte
    buf.clear();
    feed_all(&mut buf, b"\x80x\xE2\x86");
    assert_eq!(buf.repair_utf8(), 3);
    assert_eq!(buf.as_str(), "?x??");
}
