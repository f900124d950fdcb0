use std::fmt;

use crate::attachment::FileAttachment;
use crate::equipment::EquipmentBrand;

/// Most photos a single complaint carries. Extra selections are dropped.
pub const MAX_PHOTOS: usize = 10;

/// Scalar fields of the complaint form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    ContactPerson,
    Company,
    VinCode,
    EquipmentBrand,
    VisualResult,
}

impl Field {
    /// Form order, which is also the order of the text parts on the wire.
    pub const ALL: &[Field] = &[
        Field::ContactPerson,
        Field::Company,
        Field::VinCode,
        Field::EquipmentBrand,
        Field::VisualResult,
    ];

    /// Part name used in the multipart payload.
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::ContactPerson => "contactPerson",
            Field::Company => "company",
            Field::VinCode => "vinCode",
            Field::EquipmentBrand => "equipmentBrand",
            Field::VisualResult => "visualResult",
        }
    }

    /// Placeholder shown in the form.
    pub fn label(&self) -> &'static str {
        match self {
            Field::ContactPerson => "ФИО",
            Field::Company => "Компания",
            Field::VinCode => "VIN-код",
            Field::EquipmentBrand => "Выберите марку оборудования",
            Field::VisualResult => "Описание проблемы",
        }
    }

    /// Inverse of [`Field::as_str`], for callers that address fields by
    /// their part name. The form itself works with `Field` values directly.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "contactPerson" => Some(Field::ContactPerson),
            "company" => Some(Field::Company),
            "vinCode" => Some(Field::VinCode),
            "equipmentBrand" => Some(Field::EquipmentBrand),
            "visualResult" => Some(Field::VisualResult),
            _ => None,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Everything the employee has entered for one pending complaint.
///
/// Edits never touch an existing draft: `with_field` and `with_files`
/// return a fresh snapshot and leave `self` as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintDraft {
    pub contact_person: String,
    pub company: String,
    pub vin_code: String,
    pub equipment_brand: Option<EquipmentBrand>,
    pub visual_result: String,
    pub files: Vec<FileAttachment>,
}

impl ComplaintDraft {
    /// Copy of the draft with one field replaced.
    ///
    /// For `Field::EquipmentBrand` the value is the option text; anything
    /// outside the catalog (including the empty string) clears the choice.
    pub fn with_field(&self, field: Field, value: &str) -> Self {
        let mut next = self.clone();
        match field {
            Field::ContactPerson => next.contact_person = value.to_string(),
            Field::Company => next.company = value.to_string(),
            Field::VinCode => next.vin_code = value.to_string(),
            Field::EquipmentBrand => next.equipment_brand = EquipmentBrand::from_str(value),
            Field::VisualResult => next.visual_result = value.to_string(),
        }
        next
    }

    /// Copy of the draft with the file list replaced by the first
    /// `MAX_PHOTOS` entries of `files`.
    pub fn with_files(&self, mut files: Vec<FileAttachment>) -> Self {
        files.truncate(MAX_PHOTOS);
        Self {
            files,
            ..self.clone()
        }
    }

    /// Current value of a scalar field as it would be sent.
    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::ContactPerson => &self.contact_person,
            Field::Company => &self.company,
            Field::VinCode => &self.vin_code,
            Field::EquipmentBrand => self.equipment_brand.map(|b| b.as_str()).unwrap_or(""),
            Field::VisualResult => &self.visual_result,
        }
    }

    /// Required fields that are still blank, in form order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .iter()
            .copied()
            .filter(|f| self.value(*f).trim().is_empty())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
