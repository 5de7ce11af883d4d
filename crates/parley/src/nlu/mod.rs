mod command;
mod intent;
pub mod resolver;
pub mod time;

pub use command::Chooser;
pub use command::Clock;
pub use command::Command;
pub use command::CommandBuilder;
pub use command::RandomChooser;
pub use command::SystemClock;
pub use intent::Classification;
pub use intent::Intent;
pub use intent::IntentMatcher;
pub use time::Meridiem;
pub use time::TimeError;
