pub mod editing;
pub mod export;
pub mod io;
pub mod recording;
pub mod seek;
pub mod session;

// Re-export key types for easier usage
pub use editing::{Cmd, Delta, DeltaKind, Document, EditError, TimestampIndex};
pub use recording::RecordingClock;
pub use seek::{SeekRequest, SeekSink};
pub use session::{LineState, Patch, Session, Settings};
