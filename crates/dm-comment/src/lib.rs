//! # dm-comment — comment records, sources, and per-engine styling
//!
//! Turns raw danmaku comment documents into render-ready comments for an
//! overlay engine.
//!
//! - **[`record`]** — `CommentRecord` as it appears on the wire, plus `CommentMode`
//! - **[`source`]** — parsing the remote `{ success, items }` envelope and uploaded files
//! - **[`style`]** — `Engine` selection, font-size heuristic, DOM and canvas style objects
//! - **[`prepare`]** — delay offset + color classification → `RenderComment`
//!
//! # Pipeline
//!
//! ```text
//! JSON body / file
//!     │  source::parse_remote | source::parse_upload
//!     ▼
//! Vec<CommentRecord>
//!     │  prepare::prepare(records, &StyleOptions)
//!     ▼
//! Vec<RenderComment>   ← style chosen per engine, outline via dm-color
//! ```

pub mod prepare;
pub mod record;
pub mod source;
pub mod style;

pub use prepare::{PrepareError, RenderComment, StyleOptions, prepare};
pub use record::{CommentMode, CommentRecord};
pub use source::SourceError;
pub use style::{CanvasStyle, CommentStyle, DomStyle, Engine};
