//! The per-turn editing pipeline.
//!
//! All mutations happen synchronously inside one `apply` call, in fixed
//! order: structural operation, delta, anchor renumbering, then trigger
//! evaluation. Nothing observes the session half-applied; correctness rests
//! on turn-atomicity, not locking.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::editing::{
    Cmd, Delta, Document, EditError, TimestampIndex, commands, nearest_within, position,
};
use crate::recording::{DEFAULT_LATENCY_COMPENSATION, RecordingClock};
use crate::seek::{SeekRequest, SeekSink};

/// Tunable behavior of a session
#[derive(Debug, Clone)]
pub struct Settings {
    /// Subtracted from elapsed recording time when an anchor is created
    pub latency_compensation: Duration,
    /// Strict upper bound on offset-space distance for nearest-anchor lookup
    pub seek_match_distance: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            latency_compensation: DEFAULT_LATENCY_COMPENSATION,
            seek_match_distance: 20,
        }
    }
}

/// Content state of one line, for the anchor-creation state machine
///
/// The only transition of interest is `Empty -> NonEmpty`: the moment a
/// line first receives content while recording. Whitespace-only content
/// counts as empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    Empty,
    NonEmpty,
}

impl LineState {
    pub fn of(text: &str) -> Self {
        if text.trim().is_empty() {
            LineState::Empty
        } else {
            LineState::NonEmpty
        }
    }
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Structural deltas in application order (empty for pure content edits)
    pub deltas: Vec<Delta>,
    /// Line that received an automatic anchor during this turn, if any
    pub created_anchor: Option<usize>,
    pub version: u64,
}

/// Pre-edit observation feeding the anchor trigger after the edit lands
struct TriggerWatch {
    line: usize,
    before: LineState,
    after: LineState,
}

/// One editing surface's note buffer, timestamp index and recording clock
///
/// The session owns its document and index exclusively; there are no
/// concurrent writers.
#[derive(Debug)]
pub struct Session {
    document: Document,
    timestamps: TimestampIndex,
    clock: RecordingClock,
    seek_match_distance: usize,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

impl Session {
    pub fn new(settings: Settings) -> Self {
        Self::with_document(Document::new(), settings)
    }

    pub fn with_document(document: Document, settings: Settings) -> Self {
        Self {
            document,
            timestamps: TimestampIndex::new(),
            clock: RecordingClock::new(settings.latency_compensation),
            seek_match_distance: settings.seek_match_distance,
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn timestamps(&self) -> &TimestampIndex {
        &self.timestamps
    }

    /// The current notes text, line-joined
    pub fn notes(&self) -> String {
        self.document.text()
    }

    /// The timestamp index in offset-space, for hosts that only understand
    /// character offsets. Derived fresh from the current document.
    pub fn timestamps_by_offset(&self) -> BTreeMap<usize, u64> {
        position::timestamps_by_offset(&self.document, &self.timestamps)
    }

    /// Adopt a host-supplied offset-space index, re-deriving line anchors
    pub fn restore_timestamps_from_offsets<I>(&mut self, offsets: I)
    where
        I: IntoIterator<Item = (usize, u64)>,
    {
        self.timestamps = position::timestamps_from_offsets(&self.document, offsets);
    }

    pub fn start_recording(&mut self) {
        self.clock.start();
    }

    pub fn start_recording_at(&mut self, now: Instant) {
        self.clock.start_at(now);
    }

    /// Disables future anchor creation; existing anchors are untouched
    pub fn stop_recording(&mut self) {
        self.clock.stop();
    }

    pub fn is_recording(&self) -> bool {
        self.clock.is_active()
    }

    /// Apply one command as a single logical step
    pub fn apply(&mut self, cmd: Cmd) -> Result<Patch, EditError> {
        self.apply_at(cmd, Instant::now())
    }

    /// Apply one command, using `now` for any anchor the edit creates
    ///
    /// Order within the turn is fixed: structural operation, delta, index
    /// renumbering, trigger evaluation.
    pub fn apply_at(&mut self, cmd: Cmd, now: Instant) -> Result<Patch, EditError> {
        let watch = self.trigger_watch(&cmd);

        let deltas = commands::apply_command(&mut self.document, &cmd)?;
        for delta in &deltas {
            self.timestamps.apply(delta);
        }

        let created_anchor = watch.and_then(|watch| self.evaluate_trigger(&watch, now));
        let version = self.document.bump_version();

        debug_assert!(self.timestamps.len() <= self.document.line_count());

        Ok(Patch {
            deltas,
            created_anchor,
            version,
        })
    }

    /// Observe the empty/non-empty transition a command is about to cause
    ///
    /// A split's tail line did not exist before the edit, so its previous
    /// state is `Empty`. Merges and deletions never create content on a
    /// line and are not watched. A multi-line paste is evaluated for the
    /// edited line only; continuation lines receive no automatic anchors.
    fn trigger_watch(&self, cmd: &Cmd) -> Option<TriggerWatch> {
        match cmd {
            Cmd::SetLine { index, text } => {
                if text.is_empty() && self.document.line_count() > 1 {
                    // Reinterpreted as a deletion
                    return None;
                }
                let before = LineState::of(self.document.line(*index)?);
                let first_fragment = text.split('\n').next().unwrap_or("");
                Some(TriggerWatch {
                    line: *index,
                    before,
                    after: LineState::of(first_fragment),
                })
            }
            Cmd::SplitLine { index, at } => {
                let line = self.document.line(*index)?;
                let tail: String = line.chars().skip(*at).collect();
                Some(TriggerWatch {
                    line: *index + 1,
                    before: LineState::Empty,
                    after: LineState::of(&tail),
                })
            }
            Cmd::MergeWithPrevious { .. } | Cmd::DeleteLine { .. } => None,
        }
    }

    fn evaluate_trigger(&mut self, watch: &TriggerWatch, now: Instant) -> Option<usize> {
        if watch.before != LineState::Empty || watch.after != LineState::NonEmpty {
            return None;
        }
        if !self.clock.is_active() {
            return None;
        }
        if self.timestamps.contains(watch.line) {
            return None;
        }
        // Guarded above, so a dead clock is unreachable here; if it happens
        // anyway, skip rather than store a garbage anchor.
        let elapsed = self.clock.elapsed_adjusted(now)?;
        let time_ms = elapsed.as_millis() as u64;
        if self.timestamps.create(watch.line, time_ms) {
            log::debug!("anchor created at line {} -> {}ms", watch.line, time_ms);
            Some(watch.line)
        } else {
            None
        }
    }

    /// Time anchored to a line, as a seek payload
    ///
    /// "No timestamp" is a normal state, rendered as absence.
    pub fn activate_line(&self, index: usize) -> Option<SeekRequest> {
        self.timestamps.get(index).map(SeekRequest::from_millis)
    }

    /// Resolve an offset-space target to the nearest anchored position
    /// within the configured match distance
    pub fn activate_at_offset(&self, offset: usize) -> Option<SeekRequest> {
        let anchors = self.timestamps_by_offset();
        nearest_within(anchors, offset, self.seek_match_distance)
            .map(|(_, time_ms)| SeekRequest::from_millis(time_ms))
    }

    /// Emit a seek for an anchored line into the player sink
    ///
    /// Returns whether anything was emitted.
    pub fn seek_line(&self, index: usize, sink: &mut dyn SeekSink) -> bool {
        match self.activate_line(index) {
            Some(request) => {
                log::debug!("seek line {} -> {}s", index, request.time);
                sink.seek(request);
                true
            }
            None => false,
        }
    }
}
