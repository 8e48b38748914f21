#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };

    let Ok(patch) = gitpatch::Patch::from_str(input) else {
        return;
    };

    // Whatever parses must render back into parseable text, and from there
    // the structure must be stable under further render/parse cycles.
    let rendered = patch.to_string();
    let reparsed = gitpatch::Patch::from_str(&rendered).unwrap();
    let rendered_again = reparsed.to_string();
    let again = gitpatch::Patch::from_str(&rendered_again).unwrap();
    assert_eq!(reparsed, again);
});
