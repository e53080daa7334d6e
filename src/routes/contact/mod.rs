//! src/routes/contact/mod.rs

mod decode;
mod errors;
mod options;
mod post;

pub use decode::{DecodedSubmission, Decoder};
pub use errors::ContactError;
pub use options::{contact_preflight, method_not_allowed};
pub use post::submit_contact_form;
