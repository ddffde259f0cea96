//! Helper functions shared by page controllers and templates

mod date;
mod html;
mod url;

pub use date::*;
pub use html::*;
pub use url::*;
