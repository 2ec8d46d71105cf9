pub mod client;
pub mod decoder;
pub mod error;
pub mod event;
pub mod session;

pub use client::{DEFAULT_API_URL, ImportClient, ImportJob};
pub use decoder::EventDecoder;
pub use error::ImportError;
pub use event::ImportEvent;
pub use session::{ImportOutcome, ImportSession, SessionState};
