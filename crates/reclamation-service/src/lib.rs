mod http;
mod traits;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use http::{HttpService, SEND_TO_BITRIX_PATH};
pub use traits::{ComplaintService, ServiceError, SubmitReceipt, SubmitResponse};
