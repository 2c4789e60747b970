//! Pure transformations with no I/O.

mod retry;
mod validation;

pub use retry::{classify, retry_delay};
pub use validation::{is_redirect, parse_content_length};
