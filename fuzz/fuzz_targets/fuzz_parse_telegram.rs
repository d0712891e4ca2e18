#![no_main]

use libfuzzer_sys::fuzz_target;
use p1_rs::telegram::{checksum, decode_measures, parse_frame};
use p1_rs::{acquire, BufLineSource};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes through the blocking pipeline
    let _ = acquire(BufLineSource::new(data));

    if let Ok(text) = std::str::from_utf8(data) {
        let _ = parse_frame(text);

        // Decoding must not panic on any content that passes framing,
        // whatever the checksum says.
        let _ = decode_measures(text);

        // Re-frame with a correct checksum so the decoder path is reached.
        if let (Some(start), Some(end)) = (text.find('/'), text.rfind('!')) {
            if start < end {
                let content = &text[start..=end];
                let crc = checksum::compute(content.as_bytes());
                let _ = p1_rs::parse_telegram(&format!("{content}{crc:04X}\r\n"));
            }
        }
    }
});
