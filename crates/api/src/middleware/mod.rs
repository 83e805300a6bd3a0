//! HTTP middleware components.

pub mod logging;
pub mod request_id;

pub use request_id::{request_id, RequestId, REQUEST_ID_HEADER};
