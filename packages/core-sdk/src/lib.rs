pub mod analysis;
pub mod catalog;
pub mod config;
pub mod credential;
pub mod error;
pub mod logging;
pub mod models;
pub mod prompt;
pub mod question;
pub mod resolver;
pub mod server;
pub mod telemetry;
pub mod upstream;

/**
 * \brief Common re-exports for downstream crates.
 */
pub mod prelude {
    pub use crate::catalog::{Provider, DEFAULT_PROVIDER};
    pub use crate::config::ServerConfig;
    pub use crate::error::{AttemptError, ServiceError};
    pub use crate::models::{Assessment, QuestionResult, ScenarioRequest};
    pub use crate::upstream::{Endpoints, UpstreamClient};
    pub use crate::{analysis, question, server, telemetry};
}
