#![no_main]

use libfuzzer_sys::fuzz_target;
use reqline::RequestLineParser;

// First byte picks the chunk size, the rest is input. The outcome must be
// the same as feeding the input in one go.
fuzz_target!(|data: &[u8]| {
    let Some((size, input)) = data.split_first() else {
        return;
    };
    let size = (*size as usize).max(1);

    let mut whole = RequestLineParser::new();
    let whole_ok = whole.feed(input).is_ok();

    let mut chunked = RequestLineParser::new();
    let mut chunked_ok = true;
    for chunk in input.chunks(size) {
        if chunked.feed(chunk).is_err() {
            chunked_ok = false;
            break;
        }
    }

    assert_eq!(whole_ok, chunked_ok);
    assert_eq!(whole.is_done(), chunked.is_done());
    assert_eq!(whole.request_line(), chunked.request_line());
    // Chunks after the terminator are never fed once done.
    assert!(whole.remainder().starts_with(chunked.remainder()) || !whole.is_done());
});
