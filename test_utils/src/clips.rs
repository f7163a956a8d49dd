//! Clip sources and plans for loader tests.

use std::collections::VecDeque;

use ambler::{CatalogClipSource, ClipLoadPlan, ClipSource, LoadPoll};
use ambler::animation::ClipEntry;

/// Clip source replaying a fixed script of poll results per path.
///
/// Once a path's script runs out it keeps answering with its last result, so
/// a script ending in `Ready` stays ready. Unscripted paths stay pending.
#[derive(Clone, Debug, Default)]
pub struct ScriptedClipSource {
    scripts: Vec<(String, VecDeque<LoadPoll>)>,
    polled: Vec<String>,
}

impl ScriptedClipSource {
    /// Creates a source with no scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Scripts the answers for `path`.
    pub fn script(mut self, path: &str, answers: impl IntoIterator<Item = LoadPoll>) -> Self {
        self.scripts
            .push((path.to_owned(), answers.into_iter().collect()));
        self
    }

    /// Paths in the order they were polled, one entry per poll.
    pub fn polled(&self) -> &[String] {
        &self.polled
    }
}

impl ClipSource for ScriptedClipSource {
    fn poll(&mut self, entry: &ClipEntry) -> LoadPoll {
        self.polled.push(entry.path.clone());
        let Some((_, script)) = self.scripts.iter_mut().find(|(path, _)| *path == entry.path)
        else {
            return LoadPoll::Pending;
        };
        match script.len() {
            0 => LoadPoll::Pending,
            1 => script.front().cloned().unwrap_or(LoadPoll::Pending),
            _ => script.pop_front().unwrap_or(LoadPoll::Pending),
        }
    }
}

/// Idle, walk, run and cheer clips under `clips/`.
pub fn standard_plan() -> ClipLoadPlan {
    ClipLoadPlan::new()
        .clip("idle", "clips/idle.anim")
        .clip("walk", "clips/walk.anim")
        .clip("run", "clips/run.anim")
        .clip("cheer", "clips/cheer.anim")
}

/// Catalog answering every path of [`standard_plan`] after `latency` polls.
pub fn standard_catalog(latency: u32) -> CatalogClipSource {
    CatalogClipSource::new()
        .with_clip("clips/idle.anim", 2.0)
        .with_clip("clips/walk.anim", 1.0)
        .with_clip("clips/run.anim", 0.7)
        .with_clip("clips/cheer.anim", 2.5)
        .with_latency(latency)
}
