pub mod discovered_service;
pub mod discovery_run;

pub use discovered_service::*;
pub use discovery_run::*;
