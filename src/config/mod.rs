pub mod endpoint;
pub mod hook;
pub mod source;

pub use endpoint::EndpointConfig;
pub use hook::{default_config_path, HookConfig, MessageTemplate, NotificationRules};
pub use source::ConfigFormat;
