#![no_main]

//! Board definition fuzzer.
//!
//! Arbitrary text must either be rejected with a `BoardError` or produce a
//! board that survives a save/load round trip unchanged.

use libfuzzer_sys::fuzz_target;
use rally::Board;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(board) = Board::from_json(text) else {
        return;
    };

    let definition = board.to_definition();
    let json = definition.to_json().expect("definition serializes");
    let reloaded = Board::from_json(&json).expect("saved board reloads");
    assert_eq!(reloaded.to_definition(), definition);
});
