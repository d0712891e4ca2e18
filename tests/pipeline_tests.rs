//! End-to-end acquisition tests over blocking, async and file-backed line sources.

use p1_rs::p1::line_source::AsyncBufLineSource;
use p1_rs::{
    acquire, AsyncP1Reader, BufLineSource, FramingError, MeasureValue, MockLineSource, P1Error,
    P1Reader,
};
use std::io::{self, BufReader, Write};
use std::time::Duration;

const TELEGRAM: &str =
    "/ISK5\r\n1-0:1.8.1(001581.123*kWh)\r\n1-0:2.8.1(000000.000*kWh)\r\n!709B\r\n";

#[test]
fn test_acquire_from_byte_slice() {
    let telegram = acquire(BufLineSource::new(TELEGRAM.as_bytes())).unwrap();
    assert_eq!(telegram.value("1.8.1"), Some(MeasureValue::Float(1581.123)));
    assert_eq!(telegram.value("2.8.1"), Some(MeasureValue::Float(0.0)));
}

/// A transport failure surfaces as such, not as an empty or framing failure.
#[test]
fn test_transport_error_propagates() {
    let mut source = MockLineSource::from_text("/ISK5\r\n1-0:1.8.1(001581.123*kWh)\r\n");
    source.fail_when_drained(io::ErrorKind::TimedOut);

    let err = acquire(source).unwrap_err();
    assert!(matches!(err, P1Error::Transport(_)));
    assert!(err.is_timeout());
    assert!(err.is_transient());
}

#[test]
fn test_disconnect_propagates() {
    let mut source = MockLineSource::new();
    source.fail_when_drained(io::ErrorKind::BrokenPipe);
    match acquire(source) {
        Err(P1Error::Transport(e)) => assert_eq!(e.kind(), io::ErrorKind::BrokenPipe),
        other => panic!("expected transport error, got {other:?}"),
    }
}

/// After a corrupted telegram the next one is read normally.
#[test]
fn test_recovery_after_checksum_mismatch() {
    let mut source = MockLineSource::from_text(&TELEGRAM.replace("!709B", "!709C"));
    source.queue_text(TELEGRAM);
    let mut reader = P1Reader::new(source);

    assert!(matches!(
        reader.read_telegram(),
        Err(P1Error::ChecksumMismatch { .. })
    ));
    assert!(reader.read_telegram().is_ok());
}

#[test]
fn test_file_with_several_telegrams() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    for _ in 0..3 {
        file.write_all(TELEGRAM.as_bytes()).unwrap();
    }
    file.flush().unwrap();

    let reopened = std::fs::File::open(file.path()).unwrap();
    let mut reader = P1Reader::new(BufLineSource::new(BufReader::new(reopened)));
    for _ in 0..3 {
        assert!(reader.read_telegram().is_ok());
    }
    assert!(matches!(
        reader.read_telegram(),
        Err(P1Error::Framing(FramingError::UnexpectedEof { buffered: 0 }))
    ));
}

/// A capture that starts mid-telegram still yields the telegrams after it.
#[test]
fn test_capture_iteration_skips_bad_telegrams() {
    let capture = format!(
        "1-0:2.8.1(000000.000*kWh)\r\n!709B\r\n{TELEGRAM}/ISK5\r\n!XYZ\r\n{TELEGRAM}/ISK5\r\n"
    );
    let reader = P1Reader::new(BufLineSource::new(capture.as_bytes()));
    let results: Vec<_> = reader.collect();

    assert_eq!(results.len(), 5);
    assert!(matches!(
        results[0],
        Err(P1Error::Framing(FramingError::MissingStartMarker))
    ));
    assert!(results[1].is_ok());
    assert!(matches!(
        results[2],
        Err(P1Error::Framing(FramingError::InvalidChecksumField(_)))
    ));
    assert!(results[3].is_ok());
    assert!(matches!(
        results[4],
        Err(P1Error::Framing(FramingError::UnexpectedEof { buffered: 7 }))
    ));
}

#[test]
fn test_capture_iteration_ends_cleanly() {
    let reader = P1Reader::new(BufLineSource::new(TELEGRAM.as_bytes()));
    let telegrams: Vec<_> = reader.collect::<Result<_, _>>().unwrap();
    assert_eq!(telegrams.len(), 1);
    assert_eq!(telegrams[0].value("1.8.1"), Some(MeasureValue::Float(1581.123)));
}

#[tokio::test]
async fn test_async_acquisition_in_chunks() {
    // Serial reads deliver arbitrary chunks, not whole lines.
    let mock = tokio_test::io::Builder::new()
        .read(b"/ISK5\r\n1-0:1.8")
        .read(b".1(001581.123*kWh)\r\n1-0:2.8.1(000000.000*kWh)\r")
        .read(b"\n!709B\r\n")
        .build();
    let source = AsyncBufLineSource::new(tokio::io::BufReader::new(mock));
    let mut reader = AsyncP1Reader::new(source);

    let telegram = reader.read_telegram().await.unwrap();
    assert_eq!(telegram.value("1.8.1"), Some(MeasureValue::Float(1581.123)));
}

#[tokio::test]
async fn test_async_read_timeout() {
    let mock = tokio_test::io::Builder::new()
        .read(b"/ISK5\r\n")
        .wait(Duration::from_secs(5))
        .build();
    let source = AsyncBufLineSource::with_timeout(
        tokio::io::BufReader::new(mock),
        Duration::from_millis(20),
    );
    let mut reader = AsyncP1Reader::new(source);

    let err = reader.read_telegram().await.unwrap_err();
    assert!(err.is_timeout());
}

#[tokio::test]
async fn test_async_read_error() {
    let mock = tokio_test::io::Builder::new()
        .read(b"/ISK5\r\n")
        .read_error(io::Error::new(io::ErrorKind::ConnectionReset, "unplugged"))
        .build();
    let mut reader = AsyncP1Reader::new(AsyncBufLineSource::new(tokio::io::BufReader::new(mock)));

    match reader.read_telegram().await {
        Err(P1Error::Transport(e)) => assert_eq!(e.kind(), io::ErrorKind::ConnectionReset),
        other => panic!("expected transport error, got {other:?}"),
    }
}
