//! Data files packaged into the library at compile time.

/// One packaged data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundledFile {
    pub name: &'static str,
    pub contents: &'static str,
}

impl BundledFile {
    /// Label used in load-error messages.
    pub fn label(&self) -> String {
        format!("bundled:commodities/{}", self.name)
    }
}

/// Packaged files, sorted by name. This is their load order.
pub const BUNDLED_FILES: &[BundledFile] = &[
    BundledFile {
        name: "etfs.yaml",
        contents: include_str!("../data/commodities/etfs.yaml"),
    },
    BundledFile {
        name: "metals.yaml",
        contents: include_str!("../data/commodities/metals.yaml"),
    },
    BundledFile {
        name: "stocks.yaml",
        contents: include_str!("../data/commodities/stocks.yaml"),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::parse_document;

    #[test]
    fn bundled_files_are_sorted() {
        let names = BUNDLED_FILES.iter().map(|file| file.name).collect::<Vec<_>>();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn bundled_files_parse_cleanly() {
        for file in BUNDLED_FILES {
            let records = parse_document(file.contents)
                .unwrap_or_else(|error| panic!("{} failed: {error}", file.label()));
            assert!(!records.is_empty(), "{} should not be empty", file.name);
        }
    }
}
