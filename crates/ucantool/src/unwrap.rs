//! Container unwrapping: a manifest of every entry, or one entry's bytes.
//!
//! Entries are never decoded here. A selected entry goes back through
//! [`crate::sniff()`] so it can be any artifact kind.

use ucantool_core::Container;

use crate::config::ContainerSelection;
use crate::error::{InspectError, Result};
use crate::hexdump;

/// One line of a container manifest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ManifestEntry {
    pub index: usize,
    /// Hex dump of the entry's bytes.
    pub dump: String,
}

/// What unwrapping a container produced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Unwrapped<'a> {
    Manifest(Vec<ManifestEntry>),
    Entry(&'a [u8]),
}

/// Build the manifest of a whole container.
pub fn manifest(container: &Container) -> Vec<ManifestEntry> {
    container
        .entries
        .iter()
        .enumerate()
        .map(|(index, entry)| ManifestEntry {
            index,
            dump: hexdump::dump(entry),
        })
        .collect()
}

/// Unwrap `container` according to `selection`.
pub fn unwrap(container: &Container, selection: ContainerSelection) -> Result<Unwrapped<'_>> {
    match selection {
        ContainerSelection::Whole => Ok(Unwrapped::Manifest(manifest(container))),
        ContainerSelection::Entry(i) => container
            .entries
            .get(i)
            .map(|entry| Unwrapped::Entry(entry.as_ref()))
            .ok_or(InspectError::IndexOutOfRange {
                requested: i,
                available: container.len(),
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn two_entries() -> Container {
        Container::new(vec![Bytes::from_static(b"one"), Bytes::from_static(b"two")])
    }

    #[test]
    fn test_select_entry() {
        let ctn = two_entries();
        assert_eq!(
            unwrap(&ctn, ContainerSelection::Entry(1)).unwrap(),
            Unwrapped::Entry(b"two")
        );
    }

    #[test]
    fn test_out_of_range() {
        let ctn = two_entries();
        let err = unwrap(&ctn, ContainerSelection::Entry(2)).unwrap_err();
        assert!(matches!(
            err,
            InspectError::IndexOutOfRange {
                requested: 2,
                available: 2
            }
        ));
        assert_eq!(
            err.to_string(),
            "container index out of range, requested 2, but there are only 2 items"
        );
    }

    #[test]
    fn test_manifest_lists_every_entry() {
        let ctn = two_entries();
        let Unwrapped::Manifest(entries) = unwrap(&ctn, ContainerSelection::Whole).unwrap() else {
            panic!("expected manifest");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].index, 1);
        assert!(entries[1].dump.contains("|two|"));
    }
}
