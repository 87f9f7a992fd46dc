// SPDX-License-Identifier: MIT
//
// The CLI's player host: blocking HTTP for fetches, and a single slot
// standing in for the overlay engine. Whatever plan is live when the
// session ends is what gets printed.

use std::time::Duration;

use dm_comment::CommentRecord;
use dm_comment::source;
use dm_player::{FetchFailure, Host, Notice, RenderPlan};

const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

pub struct CliHost {
    agent: ureq::Agent,
    /// The plan of the live renderer, if any.
    pub plan: Option<RenderPlan>,
    pub notices: Vec<Notice>,
}

impl CliHost {
    pub fn new() -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(FETCH_TIMEOUT)
            .user_agent(concat!("danmaku-overlay/", env!("CARGO_PKG_VERSION")))
            .build();
        Self {
            agent,
            plan: None,
            notices: Vec::new(),
        }
    }
}

impl Default for CliHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for CliHost {
    fn fetch(&mut self, url: &str) -> Result<Vec<CommentRecord>, FetchFailure> {
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| FetchFailure::Network(e.to_string()))?;
        let body = response
            .into_string()
            .map_err(|e| FetchFailure::Network(e.to_string()))?;
        source::parse_remote(&body).map_err(FetchFailure::from)
    }

    fn init_renderer(&mut self, plan: RenderPlan) {
        self.plan = Some(plan);
    }

    fn destroy_renderer(&mut self) {
        self.plan = None;
    }

    fn notice(&mut self, notice: Notice) {
        tracing::warn!("{notice}");
        self.notices.push(notice);
    }
}
