use crate::attachment::FileAttachment;
use crate::draft::{ComplaintDraft, Field};

/// Body of one multipart part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartBody {
    Text(String),
    File(FileAttachment),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub name: String,
    pub body: PartBody,
}

/// Ordered parts of a complaint submission, independent of any HTTP client.
///
/// Text parts come first in form order, followed by `photo1`..`photoN`
/// in selection order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartPayload {
    parts: Vec<Part>,
}

impl MultipartPayload {
    pub fn from_draft(draft: &ComplaintDraft) -> Self {
        let mut parts: Vec<Part> = Field::ALL
            .iter()
            .map(|f| Part {
                name: f.as_str().to_string(),
                body: PartBody::Text(draft.value(*f).to_string()),
            })
            .collect();

        parts.extend(draft.files.iter().enumerate().map(|(idx, file)| Part {
            name: photo_part_name(idx),
            body: PartBody::File(file.clone()),
        }));

        Self { parts }
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|p| match &p.body {
            PartBody::Text(v) if p.name == name => Some(v.as_str()),
            _ => None,
        })
    }

    pub fn file(&self, name: &str) -> Option<&FileAttachment> {
        self.parts.iter().find_map(|p| match &p.body {
            PartBody::File(f) if p.name == name => Some(f),
            _ => None,
        })
    }

    pub fn file_count(&self) -> usize {
        self.parts
            .iter()
            .filter(|p| matches!(p.body, PartBody::File(_)))
            .count()
    }
}

/// Part name for the file at zero-based `index`: `photo1`, `photo2`, ...
pub fn photo_part_name(index: usize) -> String {
    format!("photo{}", index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draft() -> ComplaintDraft {
        ComplaintDraft::default()
            .with_field(Field::ContactPerson, "Ivanov I.I.")
            .with_field(Field::Company, "ServiceCo")
            .with_field(Field::VinCode, "ABC123")
            .with_field(Field::EquipmentBrand, "Скутер SMART X")
            .with_field(Field::VisualResult, "Brake failure")
            .with_files(vec![
                FileAttachment::from_bytes("f1.jpg", "image/jpeg", &b"one"[..]),
                FileAttachment::from_bytes("f2.jpg", "image/jpeg", &b"two"[..]),
            ])
    }

    #[test]
    fn scalar_fields_use_their_wire_names() {
        let payload = MultipartPayload::from_draft(&sample_draft());
        assert_eq!(payload.text("contactPerson"), Some("Ivanov I.I."));
        assert_eq!(payload.text("company"), Some("ServiceCo"));
        assert_eq!(payload.text("vinCode"), Some("ABC123"));
        assert_eq!(payload.text("equipmentBrand"), Some("Скутер SMART X"));
        assert_eq!(payload.text("visualResult"), Some("Brake failure"));
    }

    #[test]
    fn photos_are_one_indexed_in_selection_order() {
        let payload = MultipartPayload::from_draft(&sample_draft());
        assert_eq!(payload.file("photo1").unwrap().file_name, "f1.jpg");
        assert_eq!(payload.file("photo2").unwrap().file_name, "f2.jpg");
        assert!(payload.file("photo0").is_none());
        assert!(payload.file("photo3").is_none());
        assert_eq!(payload.file_count(), 2);

        let names: Vec<&str> = payload.parts().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "contactPerson",
                "company",
                "vinCode",
                "equipmentBrand",
                "visualResult",
                "photo1",
                "photo2"
            ]
        );
    }

    #[test]
    fn empty_draft_still_sends_every_text_part() {
        let payload = MultipartPayload::from_draft(&ComplaintDraft::default());
        assert_eq!(payload.parts().len(), Field::ALL.len());
        assert_eq!(payload.text("equipmentBrand"), Some(""));
        assert_eq!(payload.file_count(), 0);
    }
}
