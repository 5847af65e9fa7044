use rkyv::{Archive, Deserialize, Serialize};
use crate::ids::UnitId;
use alloc::string::String;
use alloc::vec::Vec;

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// One line (verse) of a text with its canonical locus.
#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct TextUnit {
    pub id: UnitId,
    pub loc: String,
    pub verse: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Text {
    /// Tesserae name, e.g. `vergil.georgics`.
    pub name: String,
    /// Units in file order.
    pub units: Vec<TextUnit>,
}

#[derive(Debug, Clone, Default, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct Corpus {
    pub version: u32,
    pub texts: Vec<Text>,
}

/// An intertext: a cross-reference from a source passage to a target passage.
///
/// Every field is free text as entered in the annotation sheet. Missing
/// cells are stored as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[archive(check_bytes)]
pub struct Itext {
    pub source: String,
    pub source_start: String,
    pub source_stop: String,
    pub target: String,
    pub target_start: String,
    pub target_stop: String,
    /// The target words the note is about.
    pub target_text: String,
    pub note: String,
    /// Commentary or attribution.
    pub auth: String,
    /// Contributor who entered the row.
    pub added_by: String,
}

/// A request for the units of `name` between two loci, inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[archive(check_bytes)]
pub struct PassageQuery {
    pub name: String,
    pub first: String,
    pub last: String,
}
