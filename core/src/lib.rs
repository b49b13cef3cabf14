pub mod error;
pub mod paths;
pub mod registry;
pub mod remote;
pub mod store;
pub mod sync;
pub mod templates;

pub use error::{Error, Result};
pub use paths::StorePaths;
pub use registry::{ProjectEntry, Registry};
pub use remote::{UpdateKind, UpdateReport};
pub use store::InitReport;
pub use sync::{ProjectSync, SyncReport};
