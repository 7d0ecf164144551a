pub mod stop_hook;
pub mod transcript;

pub use stop_hook::StopHookInput;
pub use transcript::{SummaryLimits, Transcript, TranscriptEntry, TranscriptSummary};
