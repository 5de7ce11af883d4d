pub mod config;
pub mod nlu;
pub mod registry;
pub mod session;

pub use config::Config;
pub use config::ConfigError;
pub use config::LogLevel;
pub use nlu::Command;
pub use nlu::CommandBuilder;
pub use nlu::Intent;
pub use nlu::IntentMatcher;
pub use registry::DeviceRegistry;
pub use registry::JsonFileStore;
pub use registry::LightOp;
pub use session::Outcome;
pub use session::Session;
