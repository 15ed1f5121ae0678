//! Peer link protocol tests

use rust_tilt_morse::config::LINE_CAPACITY;
use rust_tilt_morse::peer::{transmit, transmit_best_effort, PeerReceiver, DELIMITER};
use rust_tilt_morse::{Counter, Diagnostics, Word};

/// Accepts at most `chunk` bytes per write, like a small UART FIFO.
struct ChunkedPort {
    bytes: Vec<u8>,
    chunk: usize,
    flushes: usize,
    fail_after: Option<usize>,
}

impl ChunkedPort {
    fn new(chunk: usize) -> Self {
        Self { bytes: Vec::new(), chunk, flushes: 0, fail_after: None }
    }
}

impl embedded_io::ErrorType for ChunkedPort {
    type Error = embedded_io::ErrorKind;
}

impl embedded_io::Write for ChunkedPort {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        if let Some(limit) = self.fail_after {
            if self.bytes.len() >= limit {
                return Err(embedded_io::ErrorKind::TimedOut);
            }
        }
        let n = buf.len().min(self.chunk);
        self.bytes.extend_from_slice(&buf[..n]);
        Ok(n)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

fn receive(bytes: &[u8], diag: &Diagnostics) -> Vec<String> {
    let mut rx = PeerReceiver::new();
    bytes
        .iter()
        .filter_map(|&b| rx.feed(b, diag))
        .map(|w| w.as_str().to_string())
        .collect()
}

#[test]
fn test_transmit_is_one_line() {
    let mut port = ChunkedPort::new(3);
    let word = Word::from_text("... --- ...").unwrap();

    transmit(&mut port, &word).unwrap();

    assert_eq!(port.bytes, b"... --- ...\n");
    assert_eq!(port.flushes, 1);
    assert_eq!(*port.bytes.last().unwrap(), DELIMITER);
}

#[test]
fn test_transmit_failure_is_counted_not_retried() {
    let diag = Diagnostics::new();
    let mut port = ChunkedPort::new(2);
    port.fail_after = Some(2);

    transmit_best_effort(&mut port, &Word::from_text(".-.-").unwrap(), &diag);

    assert_eq!(diag.get(Counter::PeerTxFailures), 1);
    assert_eq!(port.bytes, b".-");
    assert_eq!(port.flushes, 0);
}

#[test]
fn test_receive_words() {
    let diag = Diagnostics::new();
    assert_eq!(receive(b"-.-\r\n.-.\n", &diag), vec!["-.-", ".-."]);
}

#[test]
fn test_receive_skips_empty_lines() {
    let diag = Diagnostics::new();
    assert_eq!(receive(b"\n\r\n.\n", &diag), vec!["."]);
}

#[test]
fn test_receive_waits_for_delimiter() {
    let diag = Diagnostics::new();
    assert!(receive(b"...", &diag).is_empty());
}

#[test]
fn test_receive_replaces_invalid_bytes() {
    let diag = Diagnostics::new();
    assert_eq!(receive(b".-\xFF-\n\xC3\n", &diag), vec![".-?-", "?"]);
    assert_eq!(diag.get(Counter::InvalidInput), 2);
}

#[test]
fn test_receive_overflow_is_counted() {
    let diag = Diagnostics::new();
    let mut stream = vec![b'.'; LINE_CAPACITY + 1];
    stream.extend_from_slice(b"\n-\n");

    assert_eq!(receive(&stream, &diag), vec!["-"]);
    assert_eq!(diag.get(Counter::LineOverflows), 1);
}

#[test]
fn test_link_round_trip() {
    let diag = Diagnostics::new();
    let mut port = ChunkedPort::new(64);
    for text in ["...", "---", "..."] {
        transmit(&mut port, &Word::from_text(text).unwrap()).unwrap();
    }

    assert_eq!(receive(&port.bytes, &diag), vec!["...", "---", "..."]);
}
