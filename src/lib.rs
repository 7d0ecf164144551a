pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::config::{EndpointConfig, HookConfig};
pub use crate::core::{StopHookInput, Transcript, TranscriptSummary};
pub use crate::domain::{Message, MessageKind, Response, TriggerEvent};
pub use crate::utils::error::{HookError, Result};
