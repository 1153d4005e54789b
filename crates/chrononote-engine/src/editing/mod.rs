/*!
 * # Editing Core Module
 *
 * Line-granular editing model with a timestamp anchor index that stays
 * correct while the underlying text is continuously mutated.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: the line buffer
 * - The document is an ordered sequence of text lines (`Document`)
 * - A document always has at least one line; an empty document is one
 *   empty line
 *
 * ### 2. Command-Based Editing
 * - All edits are represented as **Commands** (`Cmd` enum) applied to the
 *   document, each structural change producing a **delta descriptor**
 *   (`Delta`: insert or remove at a line index)
 * - Commands are applied immediately on every input event for
 *   authoritative model updates
 *
 * ### 3. Anchor Renumbering via Deltas
 * - `TimestampIndex` maps line-space anchors to elapsed recording time
 * - Every structural edit's delta renumbers the stored anchors in the same
 *   logical step, so the index never references a stale line
 *
 * ### 4. Dual Coordinate Spaces
 * - Line-space is canonical; offset-space (char offset into the joined
 *   text) is derived on demand through the pure translator in `position`
 * - The translator is recomputed from the current document on every call
 *   and never cached across edits
 *
 * ## Module Structure
 *
 * - **`document`**: `Document` line buffer with structural operations
 * - **`commands`**: `Cmd` enum and its application logic
 * - **`delta`**: structural-edit result used to renumber anchors
 * - **`anchors`**: `TimestampIndex` with renumbering and nearest-anchor
 *   lookup
 * - **`position`**: line-space / offset-space translation
 */

// Module exports
pub mod anchors;
pub mod commands;
pub mod delta;
pub mod document;
pub mod position;

// Public API re-exports
pub use anchors::{TimestampIndex, nearest_within};
pub use commands::Cmd;
pub use delta::{Delta, DeltaKind};
pub use document::{Document, EditError};
pub use position::{line_to_offset, offset_to_line};
