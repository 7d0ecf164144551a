// Domain layer: wire shapes exchanged with the robot webhook and the event they describe.

pub mod event;
pub mod message;
pub mod response;

pub use event::TriggerEvent;
pub use message::{
    ActionButton, ActionCard, AvatarVisibility, Link, Markdown, Message, MessageKind, Text,
    WireMessage,
};
pub use response::Response;
