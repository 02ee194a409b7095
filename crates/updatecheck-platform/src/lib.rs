mod environment;
mod paths;

pub use environment::{DEFAULT_KILL_SWITCH_VAR, HostPlatform, KillSwitch};
pub use paths::{ConfigPaths, PathsError};
