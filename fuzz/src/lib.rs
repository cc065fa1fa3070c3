use arbitrary::Arbitrary;
use poconflicts::index::TextIndex;
use poconflicts::unit::TranslationUnit;
use std::path::Path;

/// A randomly generated PO file.
#[derive(Arbitrary, Debug)]
pub struct Catalog<'a> {
    pub name: &'a str,
    pub translations: Vec<(&'a str, &'a str)>,
}

/// Index the given catalogs in order.
pub fn create_index(catalogs: &[Catalog], index: &mut TextIndex) {
    for catalog in catalogs {
        let units = catalog
            .translations
            .iter()
            .map(|(msgid, msgstr)| TranslationUnit::singular(msgid, msgstr));
        index.add_units(Path::new(catalog.name), units);
    }
}
