#![no_main]

use libfuzzer_sys::fuzz_target;
use poconflicts::normalize::{clean, flatten, CleanOptions};
use pretty_assertions::assert_eq;

fuzz_target!(|input: (String, bool, String, char)| {
    let (text, ignore_case, accelerators, join) = input;
    let options = CleanOptions::new(ignore_case, accelerators);
    let cleaned = clean(&text, &options);
    assert_eq!(clean(&cleaned, &options), cleaned);

    if !join.is_alphanumeric() {
        let flat = flatten(&text, join);
        assert!(!flat.starts_with(join));
        assert!(!flat.ends_with(join));
        assert!(!flat.contains(&format!("{join}{join}")));
    }
});
