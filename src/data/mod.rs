pub mod event;
pub mod export;
pub mod loader;

pub use event::{Dataset, DisasterEvent};
pub use export::{write_csv, write_parquet};
pub use loader::DataLoader;
