//! Helper functions shared by the content and GitHub modules

mod html;
mod reading_time;
mod url;

pub use html::*;
pub use reading_time::*;
pub use url::*;
