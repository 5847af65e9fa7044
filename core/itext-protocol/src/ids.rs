use rkyv::{Archive, Deserialize, Serialize};

#[cfg(feature = "serde")]
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Position of a text unit inside its text, as assigned by the Tesserae file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Archive, Serialize, Deserialize)]
#[cfg_attr(feature = "serde", derive(SerdeDeserialize, SerdeSerialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[archive(check_bytes)]
#[repr(transparent)] // Same layout as u32
pub struct UnitId(pub u32);

impl UnitId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl From<u32> for UnitId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<UnitId> for u32 {
    fn from(id: UnitId) -> u32 {
        id.0
    }
}
