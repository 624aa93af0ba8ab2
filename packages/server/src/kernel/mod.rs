pub mod deps;
pub mod file_storage;
pub mod image_gen;
pub mod oracle;
pub mod scheduled_tasks;
pub mod screenshot_client;
pub mod test_dependencies;
pub mod traits;

pub use deps::ServerDeps;
pub use file_storage::HttpFileStorage;
pub use image_gen::OpenAiImageGenerator;
pub use oracle::OpenAiOracle;
pub use screenshot_client::ScreenshotClient;
pub use traits::{
    BaseDiscoveryOracle, BaseFileStorage, BaseImageGenerator, BaseScreenshotService,
    ToolCandidate,
};
