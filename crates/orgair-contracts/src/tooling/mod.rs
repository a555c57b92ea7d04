pub mod export;
pub mod synthetic;

pub use export::SchemaExporter;
pub use synthetic::SyntheticGenerator;
