//! # dm-player — Player state machine
//!
//! The overlay player as plain data plus one update function:
//!
//! - **[`state`]** — `PlayerState`, the `Msg` it accepts, and the `Effect`s it emits
//! - **[`runtime`]** — the `Host` trait and `dispatch`, which runs effects and
//!   feeds follow-up messages back in
//!
//! Nothing in this crate touches the network, the filesystem, or a
//! renderer. Hosts do; the state only says what should happen next.

pub mod runtime;
pub mod state;

pub use runtime::{Host, dispatch};
pub use state::{
    Effect, FetchFailure, Msg, Notice, PlayerOptions, PlayerState, RenderPlan, RendererStatus,
    VideoSource,
};
