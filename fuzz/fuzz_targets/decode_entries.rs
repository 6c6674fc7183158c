#![no_main]

use libfuzzer_sys::fuzz_target;
use relir_codec::{value_input, value_output, ReadCursor, WriteCursor};

fuzz_target!(|data: &[u8]| {
    let mut input = ReadCursor::new(data);
    let mut reencoded = vec![0u8; data.len() * 2 + 64];
    let mut output = WriteCursor::new(&mut reencoded);

    while !input.is_empty() {
        let before = input.position();
        let _ = value_input::peek_type(&input);
        match value_input::read_entry(&mut input) {
            Ok(entry) => {
                assert!(input.position() > before);
                let written = value_output::write_entry(&mut output, &entry);
                assert!(matches!(written, Ok(true)));
            }
            Err(err) => {
                assert!(err.is_malformed());
                assert_eq!(input.position(), before);
                break;
            }
        }
    }
});
