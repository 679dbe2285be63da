pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod reference;
pub mod store;
pub mod warehouse;

pub use config::EtlConfig;
pub use error::{EtlError, Result};
pub use pipeline::{Extractor, Loader, Transformer};
