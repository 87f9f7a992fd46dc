//! Driving a [`PlayerState`] against a host.
//!
//! The host is whatever owns the real side effects: the network, the
//! overlay engine, the place notices are shown. [`dispatch`] feeds one
//! message through `update`, carries out the resulting effects in order,
//! and loops any follow-up messages (fetch results) back in until the
//! queue drains.

use std::collections::VecDeque;

use dm_comment::CommentRecord;

use crate::state::{Effect, FetchFailure, Msg, Notice, PlayerState, RenderPlan};

/// The side-effecting half of the player.
pub trait Host {
    /// Fetch and parse the comment set at `url`.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchFailure`] describing why no comments were loaded.
    fn fetch(&mut self, url: &str) -> Result<Vec<CommentRecord>, FetchFailure>;

    /// Create the overlay from `plan`.
    fn init_renderer(&mut self, plan: RenderPlan);

    /// Tear down the current overlay.
    fn destroy_renderer(&mut self);

    /// Show `notice` to the user.
    fn notice(&mut self, notice: Notice);
}

/// Apply `msg` to `state` and run every effect it triggers.
pub fn dispatch<H: Host + ?Sized>(state: &mut PlayerState, msg: Msg, host: &mut H) {
    let mut inbox = VecDeque::from([msg]);

    while let Some(msg) = inbox.pop_front() {
        for effect in state.update(msg) {
            match effect {
                Effect::Fetch { url } => {
                    tracing::info!(%url, "fetching comments");
                    inbox.push_back(Msg::FetchCompleted(host.fetch(&url)));
                }
                Effect::DestroyRenderer => host.destroy_renderer(),
                Effect::InitRenderer(plan) => {
                    tracing::debug!(engine = %plan.engine, comments = plan.comments.len(), "init renderer");
                    host.init_renderer(plan);
                }
                Effect::Notice(notice) => host.notice(notice),
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
