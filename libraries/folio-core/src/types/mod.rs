//! Domain types for the Folio catalog

mod settings;
mod work;

pub use settings::AppSettings;
pub use work::{CreateWork, Work, WorkMetadata, WorkType};
