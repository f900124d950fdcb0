use std::fmt;

use serde::{Deserialize, Serialize};

/// Equipment models a complaint can be filed against.
///
/// The option text is what the CRM receives in the `equipmentBrand` part,
/// so it must stay byte-for-byte stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EquipmentBrand {
    #[serde(rename = "Скутер SMART X")]
    SmartX,
    #[serde(rename = "Скутер VMC Cyclone")]
    Cyclone,
    #[serde(rename = "VMC T16")]
    T16,
    #[serde(rename = "Питбайк VMC Raptor")]
    Raptor,
    #[serde(rename = "Питбайк VMC CRF125")]
    Crf125,
    #[serde(rename = "Питбайк VMC TTR125")]
    Ttr125,
    #[serde(rename = "Питбайк VMC YCF125")]
    Ycf125,
    #[serde(rename = "Питбайк VMC CRF190")]
    Crf190,
    #[serde(rename = "Питбайк VMC ZS190")]
    Zs190,
    #[serde(rename = "ПитБайк KXD PitBike 10/10")]
    KxdPitBike,
}

impl EquipmentBrand {
    /// Catalog in the order the picker shows it.
    pub const ALL: &[EquipmentBrand] = &[
        EquipmentBrand::SmartX,
        EquipmentBrand::Cyclone,
        EquipmentBrand::T16,
        EquipmentBrand::Raptor,
        EquipmentBrand::Crf125,
        EquipmentBrand::Ttr125,
        EquipmentBrand::Ycf125,
        EquipmentBrand::Crf190,
        EquipmentBrand::Zs190,
        EquipmentBrand::KxdPitBike,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EquipmentBrand::SmartX => "Скутер SMART X",
            EquipmentBrand::Cyclone => "Скутер VMC Cyclone",
            EquipmentBrand::T16 => "VMC T16",
            EquipmentBrand::Raptor => "Питбайк VMC Raptor",
            EquipmentBrand::Crf125 => "Питбайк VMC CRF125",
            EquipmentBrand::Ttr125 => "Питбайк VMC TTR125",
            EquipmentBrand::Ycf125 => "Питбайк VMC YCF125",
            EquipmentBrand::Crf190 => "Питбайк VMC CRF190",
            EquipmentBrand::Zs190 => "Питбайк VMC ZS190",
            EquipmentBrand::KxdPitBike => "ПитБайк KXD PitBike 10/10",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|b| b.as_str() == s)
    }

    /// Position in `ALL`, used to preselect the picker.
    pub fn index(&self) -> usize {
        Self::ALL.iter().position(|b| b == self).unwrap_or(0)
    }
}

impl fmt::Display for EquipmentBrand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
