pub mod attachment;
pub mod draft;
pub mod equipment;
pub mod payload;

pub use attachment::{AttachmentSource, FileAttachment};
pub use draft::{ComplaintDraft, Field, MAX_PHOTOS};
pub use equipment::EquipmentBrand;
pub use payload::{MultipartPayload, Part, PartBody};
