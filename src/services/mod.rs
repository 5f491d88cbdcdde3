// Service exports
pub mod bundle;

pub use bundle::{BundleError, ModelBundle};
