//! Configuration module

mod site;

pub use site::GitHubConfig;
pub use site::HighlightConfig;
pub use site::SiteConfig;
