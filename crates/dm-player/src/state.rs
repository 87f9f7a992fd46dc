//! Player state and the update function.
//!
//! All player state lives in one [`PlayerState`]. Input (drops, uploads,
//! fetch results, setting changes) arrives as a [`Msg`]; [`PlayerState::update`]
//! applies it and returns the [`Effect`]s the host must carry out. The
//! state never performs I/O itself.
//!
//! ```text
//!   Msg ──► update ──► PlayerState'
//!              │
//!              └──► Vec<Effect> ──► host (fetch, renderer, notices)
//!                                     │
//!                    Msg::FetchCompleted ◄┘
//! ```
//!
//! # Renderer lifecycle
//!
//! | Trigger                        | Effects                               |
//! |--------------------------------|---------------------------------------|
//! | comments replaced              | `DestroyRenderer`?, `InitRenderer`    |
//! | engine changed                 | `DestroyRenderer`?, `InitRenderer`    |
//! | delay changed, renderer active | `DestroyRenderer`, `InitRenderer`     |
//! | video cleared, renderer active | `DestroyRenderer`                     |
//!
//! `DestroyRenderer` is only emitted when a renderer is active, and always
//! before the `InitRenderer` that replaces it.

use std::fmt;
use std::path::{Path, PathBuf};

use dm_color::ColorPolicy;
use dm_comment::source::{self, DEFAULT_ENDPOINT, SourceError};
use dm_comment::{CommentRecord, Engine, RenderComment, StyleOptions};
use serde::Serialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Fixed settings for a player session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerOptions {
    /// Base URL for remote comment sets.
    pub endpoint: String,
    pub policy: ColorPolicy,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            policy: ColorPolicy::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// VideoSource / RendererStatus
// ---------------------------------------------------------------------------

/// The loaded video and how it got there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// Dragged onto the player.
    Dropped(PathBuf),
    /// Chosen through the file picker.
    Picked(PathBuf),
}

impl VideoSource {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Dropped(p) | Self::Picked(p) => p,
        }
    }
}

/// Whether an overlay renderer currently exists.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum RendererStatus {
    #[default]
    Idle,
    Active { engine: Engine, comments: usize },
}

impl RendererStatus {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active { .. })
    }
}

// ---------------------------------------------------------------------------
// Messages and effects
// ---------------------------------------------------------------------------

/// Why a remote fetch produced no comments.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchFailure {
    #[error("network error: {0}")]
    Network(String),
    #[error("source reported failure")]
    Rejected,
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<SourceError> for FetchFailure {
    fn from(err: SourceError) -> Self {
        match err {
            SourceError::Rejected => Self::Rejected,
            SourceError::Io { .. } => Self::Network(err.to_string()),
            SourceError::Json(_) | SourceError::EmptyId => Self::Malformed(err.to_string()),
        }
    }
}

/// Everything that can happen to the player.
#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    DragEnter,
    DragLeave,
    VideoDropped(PathBuf),
    VideoPicked(PathBuf),
    VideoCleared,
    SetDanmakuId(String),
    FetchRequested,
    FetchCompleted(Result<Vec<CommentRecord>, FetchFailure>),
    CommentsUploaded(Vec<CommentRecord>),
    SetEngine(Engine),
    SetDelay(f64),
    VideoResized(u32),
}

/// What the overlay engine is initialized with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderPlan {
    pub engine: Engine,
    pub comments: Vec<RenderComment>,
}

/// Something for the user to see, outside the overlay itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    EmptyDanmakuId,
    FetchFailed(FetchFailure),
    StyleFailed(String),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDanmakuId => f.write_str("enter a comment set id first"),
            Self::FetchFailed(why) => write!(f, "could not load comments: {why}"),
            Self::StyleFailed(why) => write!(f, "could not style comments: {why}"),
        }
    }
}

/// Work for the host to carry out, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// GET `url` and answer with [`Msg::FetchCompleted`].
    Fetch { url: String },
    /// Tear down the current overlay.
    DestroyRenderer,
    /// Create a new overlay with this plan.
    InitRenderer(RenderPlan),
    Notice(Notice),
}

// ---------------------------------------------------------------------------
// PlayerState
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub options: PlayerOptions,
    pub video: Option<VideoSource>,
    pub danmaku_id: String,
    pub engine: Engine,
    pub comments: Vec<CommentRecord>,
    /// Seconds added to every comment time.
    pub delay: f64,
    /// Last known rendered video height, read at renderer init.
    pub video_height: u32,
    pub is_dragover: bool,
    pub is_loading: bool,
    pub renderer: RendererStatus,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new(PlayerOptions::default())
    }
}

impl PlayerState {
    #[must_use]
    pub fn new(options: PlayerOptions) -> Self {
        Self {
            options,
            video: None,
            danmaku_id: String::new(),
            engine: Engine::default(),
            comments: Vec::new(),
            delay: 0.0,
            video_height: 720,
            is_dragover: false,
            is_loading: false,
            renderer: RendererStatus::Idle,
        }
    }

    /// Style options derived from the current state.
    #[must_use]
    pub const fn style_options(&self) -> StyleOptions {
        StyleOptions {
            engine: self.engine,
            video_height: self.video_height,
            delay: self.delay,
            policy: self.options.policy,
        }
    }

    /// Apply `msg` and return the effects it causes.
    pub fn update(&mut self, msg: Msg) -> Vec<Effect> {
        match msg {
            Msg::DragEnter => {
                self.is_dragover = true;
                Vec::new()
            }
            Msg::DragLeave => {
                self.is_dragover = false;
                Vec::new()
            }
            Msg::VideoDropped(path) => {
                self.is_dragover = false;
                self.set_video(VideoSource::Dropped(path));
                Vec::new()
            }
            Msg::VideoPicked(path) => {
                self.set_video(VideoSource::Picked(path));
                Vec::new()
            }
            Msg::VideoCleared => {
                self.video = None;
                self.destroy_renderer().into_iter().collect()
            }
            Msg::SetDanmakuId(id) => {
                self.danmaku_id = id;
                Vec::new()
            }
            Msg::FetchRequested => self.request_fetch(),
            Msg::FetchCompleted(result) => {
                self.is_loading = false;
                match result {
                    Ok(items) => {
                        tracing::info!(count = items.len(), id = %self.danmaku_id, "comments fetched");
                        self.comments = items;
                        self.reinit()
                    }
                    Err(why) => {
                        tracing::warn!(%why, id = %self.danmaku_id, "comment fetch failed");
                        vec![Effect::Notice(Notice::FetchFailed(why))]
                    }
                }
            }
            Msg::CommentsUploaded(items) => {
                tracing::info!(count = items.len(), "comments uploaded");
                self.comments = items;
                self.reinit()
            }
            Msg::SetEngine(engine) => {
                if engine == self.engine {
                    return Vec::new();
                }
                self.engine = engine;
                self.reinit()
            }
            Msg::SetDelay(delay) => {
                self.delay = delay;
                if self.renderer.is_active() {
                    self.reinit()
                } else {
                    Vec::new()
                }
            }
            Msg::VideoResized(height) => {
                self.video_height = height;
                Vec::new()
            }
        }
    }

    fn set_video(&mut self, source: VideoSource) {
        tracing::info!(path = %source.path().display(), "video loaded");
        self.video = Some(source);
    }

    fn request_fetch(&mut self) -> Vec<Effect> {
        if self.is_loading {
            tracing::debug!("fetch already in flight, ignoring request");
            return Vec::new();
        }
        match source::remote_url(&self.options.endpoint, &self.danmaku_id) {
            Ok(url) => {
                self.is_loading = true;
                vec![Effect::Fetch { url }]
            }
            Err(_) => vec![Effect::Notice(Notice::EmptyDanmakuId)],
        }
    }

    fn destroy_renderer(&mut self) -> Option<Effect> {
        if self.renderer.is_active() {
            self.renderer = RendererStatus::Idle;
            Some(Effect::DestroyRenderer)
        } else {
            None
        }
    }

    /// Replace the renderer with one built from the current state.
    fn reinit(&mut self) -> Vec<Effect> {
        let mut effects: Vec<Effect> = self.destroy_renderer().into_iter().collect();

        match dm_comment::prepare(&self.comments, &self.style_options()) {
            Ok(comments) => {
                self.renderer = RendererStatus::Active {
                    engine: self.engine,
                    comments: comments.len(),
                };
                effects.push(Effect::InitRenderer(RenderPlan {
                    engine: self.engine,
                    comments,
                }));
            }
            Err(err) => {
                tracing::warn!(%err, "renderer not initialized");
                effects.push(Effect::Notice(Notice::StyleFailed(err.to_string())));
            }
        }

        effects
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
