#![no_main]

use libfuzzer_sys::fuzz_target;
use tactile_core::trace::TouchTrace;
use tactile_core::{GestureConfig, GestureHandlers, GestureSession};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must parse or fail cleanly; anything that parses must
    // replay without panicking and re-serialize to an equal trace.
    let Ok(trace) = TouchTrace::from_reader(data) else {
        return;
    };
    let mut gs = GestureSession::new(GestureConfig::default(), GestureHandlers::new());
    let _ = trace.replay(&mut gs);

    let text = trace.to_jsonl().expect("serialize parsed trace");
    let again = TouchTrace::from_jsonl(&text).expect("reparse serialized trace");
    assert_eq!(again.events().len(), trace.events().len());
});
