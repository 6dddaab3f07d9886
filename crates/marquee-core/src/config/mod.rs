mod dirs;
mod settings;
mod validation;

pub use dirs::Directories;
pub use settings::{CatalogConfig, Config, RouteConfig, SuggestConfig};
pub use validation::warn_unknown_fields;
