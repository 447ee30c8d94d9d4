use loadgen_core::blocks::{block_stream, stream_blocks, string_of_size, FILLER, KILOBYTE_BLOCK};

#[test]
fn kilobyte_block_is_all_filler() {
    assert_eq!(KILOBYTE_BLOCK.len(), 1024);
    assert!(KILOBYTE_BLOCK.iter().all(|b| *b == FILLER));
}

#[test]
fn stream_blocks_writes_exactly_count_kilobytes() {
    let mut sink = Vec::new();
    let written = stream_blocks(&mut sink, 3).unwrap();
    assert_eq!(written, 3 * 1024);
    assert_eq!(sink.len(), 3 * 1024);
    assert!(sink.iter().all(|b| *b == FILLER));

    let mut empty = Vec::new();
    assert_eq!(stream_blocks(&mut empty, 0).unwrap(), 0);
    assert!(empty.is_empty());
}

#[test]
fn stream_blocks_propagates_a_sink_failure() {
    struct FailingSink;
    impl std::io::Write for FailingSink {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "gone"))
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }
    assert!(stream_blocks(&mut FailingSink, 2).is_err());
}

#[test]
fn block_stream_yields_count_blocks() {
    assert_eq!(block_stream(5).count(), 5);
    assert_eq!(block_stream(0).count(), 0);
}

#[test]
fn string_of_size_is_exact() {
    assert_eq!(string_of_size(0), "");
    let s = string_of_size(10);
    assert_eq!(s.len(), 10);
    assert!(s.chars().all(|c| c == FILLER as char));
}
