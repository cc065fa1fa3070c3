#![no_main]

use libfuzzer_sys::fuzz_target;
use poconflicts::conflicts::{build_conflict_map, reduce};
use poconflicts::index::{IndexOptions, TextIndex};
use poconflicts_fuzz::{create_index, Catalog};
use pretty_assertions::assert_eq;

fuzz_target!(|input: (Vec<Catalog>, bool)| {
    let (catalogs, invert) = input;
    let mut index = TextIndex::new(IndexOptions {
        invert,
        ..IndexOptions::default()
    });
    create_index(&catalogs, &mut index);

    let conflicts = build_conflict_map(index);
    assert!(conflicts.len() <= conflicts.total_strings());
    let entry_count = conflicts.entry_count();
    let reduced = reduce(conflicts);
    assert_eq!(reduced.entry_count(), entry_count);
});
