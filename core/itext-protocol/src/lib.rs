#![no_std] // Shared with the WASM platform

extern crate alloc;

// Enable std if the feature is active (for tests/tools)
#[cfg(any(feature = "std", test))]
extern crate std;

pub mod ids;
pub mod model;

pub use ids::UnitId;
pub use model::*;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;
    use rkyv::{from_bytes, to_bytes};

    fn unit(id: u32, loc: &str, verse: &str) -> TextUnit {
        TextUnit {
            id: UnitId::new(id),
            loc: loc.to_string(),
            verse: verse.to_string(),
        }
    }

    #[test]
    fn test_corpus_archive_is_readable() {
        let corpus = Corpus {
            version: 1,
            texts: vec![Text {
                name: "vergil.georgics".to_string(),
                units: vec![
                    unit(0, "1.1", "Quid faciat laetas segetes, quo sidere terram"),
                    unit(1, "1.2", "vertere, Maecenas, ulmisque adiungere vitis"),
                ],
            }],
        };

        let bytes = to_bytes::<_, 1024>(&corpus).expect("Failed to serialize Corpus");
        let archived = rkyv::check_archived_root::<Corpus>(&bytes).expect("Archive failed validation");

        assert_eq!(archived.texts.len(), 1);
        assert_eq!(archived.texts[0].name.as_str(), "vergil.georgics");
        assert_eq!(archived.texts[0].units[1].loc.as_str(), "1.2");
        assert_eq!(archived.texts[0].units[1].id.0, 1);
    }

    #[test]
    fn test_itext_defaults_to_empty_fields() {
        let itext = Itext {
            source: "ovid.metamorphoses".to_string(),
            ..Itext::default()
        };

        let bytes = to_bytes::<_, 256>(&itext).expect("Failed to serialize Itext");
        let restored: Itext = from_bytes(&bytes).expect("Failed to deserialize Itext");

        assert_eq!(restored.source, "ovid.metamorphoses");
        assert!(restored.note.is_empty());
        assert!(restored.target_start.is_empty());
    }

    #[test]
    fn test_id_layout() {
        assert_eq!(core::mem::size_of::<UnitId>(), 4);
    }
}
