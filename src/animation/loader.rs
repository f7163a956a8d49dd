//! Ordered, poll-driven clip loading.
//!
//! A [`ClipLoadPlan`] lists the clips to load. [`ClipLoadQueue`] works through
//! it strictly in plan order, polling a [`ClipSource`] once per frame for the
//! entry at the head and moving on once that entry settles.

use std::collections::VecDeque;

use hashbrown::HashMap;
use log::{debug, warn};
use thiserror::Error;

use super::{Clip, ClipName};

/// One clip to load: the name it registers under and where it comes from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipEntry {
    /// Name the clip registers under.
    pub name: ClipName,
    /// Location handed to the [`ClipSource`].
    pub path: String,
}

/// Declarative list of clips, loaded in the order given.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClipLoadPlan {
    entries: Vec<ClipEntry>,
}

impl ClipLoadPlan {
    /// Creates an empty plan.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a clip to the plan.
    #[must_use]
    pub fn clip(mut self, name: impl Into<ClipName>, path: impl Into<String>) -> Self {
        self.entries.push(ClipEntry {
            name: name.into(),
            path: path.into(),
        });
        self
    }

    /// Entries in load order.
    #[must_use]
    pub fn entries(&self) -> &[ClipEntry] {
        &self.entries
    }

    /// Number of planned clips.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when nothing is planned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of polling a [`ClipSource`] for one entry.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadPoll {
    /// Nothing new yet.
    Pending,
    /// Still loading; the fraction completed so far.
    Progress(f32),
    /// The clip finished loading.
    Ready(Clip),
    /// The clip cannot be loaded.
    Failed(String),
}

/// Something able to load clips incrementally.
#[cfg_attr(test, mockall::automock)]
pub trait ClipSource {
    /// Polls the load of `entry`, starting it on the first call.
    fn poll(&mut self, entry: &ClipEntry) -> LoadPoll;
}

impl<S: ClipSource + ?Sized> ClipSource for Box<S> {
    fn poll(&mut self, entry: &ClipEntry) -> LoadPoll {
        (**self).poll(entry)
    }
}

/// A clip that could not be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("failed to load clip `{name}` from `{path}`: {detail}")]
pub struct ClipLoadError {
    /// Name the clip would have registered under.
    pub name: ClipName,
    /// Location that failed.
    pub path: String,
    /// Source-specific reason.
    pub detail: String,
}

/// Observable outcome of one [`ClipLoadQueue::poll`].
#[derive(Clone, Debug, PartialEq)]
pub enum LoadEvent {
    /// An entry reported partial progress.
    Progress {
        /// Entry being loaded.
        name: ClipName,
        /// Fraction completed, in `[0, 1]`.
        fraction: f32,
    },
    /// An entry finished loading.
    Loaded(Clip),
    /// An entry failed and was skipped.
    Failed(ClipLoadError),
    /// Every entry has settled. Emitted exactly once.
    Settled,
}

/// Works through a [`ClipLoadPlan`] one entry at a time.
#[derive(Clone, Debug, Default)]
pub struct ClipLoadQueue {
    pending: VecDeque<ClipEntry>,
    settled: bool,
}

impl ClipLoadQueue {
    /// Queues every entry of `plan`.
    #[must_use]
    pub fn new(plan: &ClipLoadPlan) -> Self {
        Self {
            pending: plan.entries().iter().cloned().collect(),
            settled: false,
        }
    }

    /// Entries not yet settled.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.pending.len()
    }

    /// Whether [`LoadEvent::Settled`] has been emitted.
    #[must_use]
    pub const fn is_settled(&self) -> bool {
        self.settled
    }

    /// Polls `source` for the head entry.
    ///
    /// A settled entry is popped and the next one is polled straight away, so
    /// a source that answers synchronously drains the whole plan in one call.
    /// Entries never settle out of order.
    pub fn poll(&mut self, source: &mut dyn ClipSource) -> Vec<LoadEvent> {
        let mut events = Vec::new();
        while let Some(entry) = self.pending.front() {
            match source.poll(entry) {
                LoadPoll::Pending => return events,
                LoadPoll::Progress(fraction) => {
                    events.push(LoadEvent::Progress {
                        name: entry.name.clone(),
                        fraction: fraction.clamp(0.0, 1.0),
                    });
                    return events;
                }
                LoadPoll::Ready(clip) => {
                    debug!("loaded clip `{}` from `{}`", entry.name, entry.path);
                    let clip = Clip::new(entry.name.clone(), clip.seconds);
                    events.push(LoadEvent::Loaded(clip));
                }
                LoadPoll::Failed(detail) => {
                    let error = ClipLoadError {
                        name: entry.name.clone(),
                        path: entry.path.clone(),
                        detail,
                    };
                    warn!("{error}");
                    events.push(LoadEvent::Failed(error));
                }
            }
            self.pending.pop_front();
        }
        if !self.settled {
            self.settled = true;
            events.push(LoadEvent::Settled);
        }
        events
    }
}

/// In-memory clip source backed by a catalog of known paths.
///
/// Each path answers after `latency` polls, reporting progress on the polls
/// in between. Unknown paths fail on their first poll.
#[derive(Clone, Debug, Default)]
pub struct CatalogClipSource {
    catalog: HashMap<String, f32>,
    polls: HashMap<String, u32>,
    latency: u32,
}

impl CatalogClipSource {
    /// Creates an empty catalog answering immediately.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `path` as a clip lasting `seconds`.
    #[must_use]
    pub fn with_clip(mut self, path: impl Into<String>, seconds: f32) -> Self {
        self.catalog.insert(path.into(), seconds);
        self
    }

    /// Number of polls each clip takes before it is ready.
    #[must_use]
    pub const fn with_latency(mut self, polls: u32) -> Self {
        self.latency = polls;
        self
    }
}

impl ClipSource for CatalogClipSource {
    fn poll(&mut self, entry: &ClipEntry) -> LoadPoll {
        let Some(&seconds) = self.catalog.get(&entry.path) else {
            return LoadPoll::Failed(format!("`{}` is not in the catalog", entry.path));
        };
        let count = self.polls.entry(entry.path.clone()).or_insert(0);
        if *count >= self.latency {
            return LoadPoll::Ready(Clip::new(entry.name.clone(), seconds));
        }
        *count += 1;
        #[expect(
            clippy::cast_precision_loss,
            reason = "Poll counts are tiny; the fraction is informational."
        )]
        let fraction = *count as f32 / (self.latency + 1) as f32;
        LoadPoll::Progress(fraction)
    }
}
