pub mod catalog;
pub mod discovery;
pub mod health;

pub use catalog::{list_categories_handler, list_services_handler, search_services_handler};
pub use discovery::{
    list_discoveries_handler, list_runs_handler, trigger_discovery_handler,
    update_discovery_status_handler,
};
pub use health::health_handler;
