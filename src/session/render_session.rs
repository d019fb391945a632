use anyhow::Context;
use rayon::prelude::*;

use crate::animation::timing::Repeat;
use crate::compose::scene_builder::PageScene;
use crate::config::RenderConfig;
use crate::eval::snapshot::SnapshotEngine;
use crate::foundation::core::{Fps, FrameIndex, FrameRange};
use crate::foundation::error::{LiltError, LiltResult, Warning};
use crate::scene::node::SceneNode;

#[derive(Clone, Debug, Default)]
/// How [`RenderSession::render_range`] schedules frames.
pub struct RenderThreading {
    /// Evaluate frames on a dedicated thread pool.
    pub parallel: bool,
    /// Worker count for the pool; `None` lets rayon decide. `Some(0)` is rejected.
    pub threads: Option<usize>,
    /// Evaluate frames after the last change once and clone the result.
    pub static_frame_elision: bool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Counters from one [`RenderSession::render_range_with_stats`] call.
pub struct RenderStats {
    /// Frames returned.
    pub frames_total: u64,
    /// Frames actually evaluated.
    pub frames_rendered: u64,
    /// Frames cloned from an identical evaluated frame.
    pub frames_elided: u64,
}

#[derive(Debug)]
/// Frame clock bound to one animated scene.
///
/// Every frame is an independent snapshot query, so ranges can be evaluated in any order
/// and on any number of threads; results always come back in frame order.
pub struct RenderSession {
    engine: SnapshotEngine,
    fps: Fps,
    duration: Option<f64>,
}

impl RenderSession {
    /// Bind `scene` to a frame rate.
    pub fn new(scene: SceneNode, fps: Fps) -> LiltResult<Self> {
        Ok(Self {
            engine: SnapshotEngine::new(scene)?,
            fps,
            duration: None,
        })
    }

    /// Session for a composed page, running until the last word has faded.
    pub fn from_page(page: PageScene, config: &RenderConfig) -> LiltResult<Self> {
        let fps = config.frame_rate()?;
        let end = page.span.map(|s| s.end + config.fade_out);
        let mut session = Self::new(page.root, fps)?;
        session.duration = end.map(|e| e.max(session.engine.last_change_secs()));
        Ok(session)
    }

    /// Override the session length in seconds.
    pub fn with_duration(mut self, secs: f64) -> Self {
        self.duration = Some(secs);
        self
    }

    /// The underlying snapshot engine.
    pub fn engine(&self) -> &SnapshotEngine {
        &self.engine
    }

    /// Recovered problems found while extracting the scene's declarations.
    pub fn warnings(&self) -> &[Warning] {
        self.engine.warnings()
    }

    /// Output frame rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Session length: the explicit duration, else the last time anything changes.
    pub fn duration_secs(&self) -> f64 {
        self.duration.unwrap_or_else(|| self.engine.last_change_secs())
    }

    /// Frames covering the whole session (at least one).
    pub fn frame_count(&self) -> u64 {
        self.fps.frames_for_secs(self.duration_secs()).max(1)
    }

    /// `[0, frame_count)`.
    pub fn full_range(&self) -> FrameRange {
        FrameRange {
            start: FrameIndex(0),
            end: FrameIndex(self.frame_count()),
        }
    }

    /// Bake one frame.
    pub fn render_frame(&self, frame: FrameIndex) -> LiltResult<SceneNode> {
        self.engine.snapshot(self.fps.frame_time_secs(frame))
    }

    /// Bake every frame in `range`, in frame order.
    pub fn render_range(
        &self,
        range: FrameRange,
        threading: &RenderThreading,
    ) -> LiltResult<Vec<SceneNode>> {
        self.render_range_with_stats(range, threading).map(|(frames, _)| frames)
    }

    /// Bake every frame in `range`, in frame order, reporting how many were evaluated.
    ///
    /// Fails with [`LiltError::Validation`] on an empty range or `threads == Some(0)`.
    #[tracing::instrument(
        skip(self, threading),
        fields(frames = range.len_frames(), parallel = threading.parallel)
    )]
    pub fn render_range_with_stats(
        &self,
        range: FrameRange,
        threading: &RenderThreading,
    ) -> LiltResult<(Vec<SceneNode>, RenderStats)> {
        if range.is_empty() {
            return Err(LiltError::validation("render range must be non-empty"));
        }

        let settle = if threading.static_frame_elision {
            self.settle_secs()
        } else {
            None
        };

        let mut unique: Vec<FrameIndex> = Vec::new();
        let mut frame_to_unique: Vec<usize> = Vec::with_capacity(range.len_frames() as usize);
        let mut settled_slot: Option<usize> = None;
        for frame in range.iter() {
            let t = self.fps.frame_time_secs(frame);
            let slot = match settle {
                Some(s) if t > s => *settled_slot.get_or_insert_with(|| {
                    unique.push(frame);
                    unique.len() - 1
                }),
                _ => {
                    unique.push(frame);
                    unique.len() - 1
                }
            };
            frame_to_unique.push(slot);
        }

        let rendered: Vec<SceneNode> = if threading.parallel {
            let pool = build_thread_pool(threading.threads)?;
            pool.install(|| {
                unique
                    .par_iter()
                    .map(|f| self.render_frame(*f))
                    .collect::<LiltResult<Vec<_>>>()
            })?
        } else {
            unique
                .iter()
                .map(|f| self.render_frame(*f))
                .collect::<LiltResult<Vec<_>>>()?
        };

        let mut remaining = vec![0usize; rendered.len()];
        for &u in &frame_to_unique {
            remaining[u] += 1;
        }
        let mut slots: Vec<Option<SceneNode>> = rendered.into_iter().map(Some).collect();
        let mut out = Vec::with_capacity(frame_to_unique.len());
        for u in frame_to_unique {
            remaining[u] -= 1;
            let frame = if remaining[u] == 0 {
                slots[u].take()
            } else {
                slots[u].clone()
            };
            out.push(frame.ok_or_else(|| {
                LiltError::Other(anyhow::anyhow!("internal error: evaluated frame missing"))
            })?);
        }

        let total = out.len() as u64;
        let evaluated = unique.len() as u64;
        tracing::debug!(total, evaluated, "frames rendered");
        Ok((
            out,
            RenderStats {
                frames_total: total,
                frames_rendered: evaluated,
                frames_elided: total.saturating_sub(evaluated),
            },
        ))
    }

    // After this instant every snapshot is identical; `None` while anything repeats forever.
    fn settle_secs(&self) -> Option<f64> {
        let repeats_forever = self.engine.primitives().any(|p| {
            matches!(p.timing.repeat_count, Some(Repeat::Indefinite))
                || matches!(p.timing.repeat_dur, Some(Repeat::Indefinite))
        });
        (!repeats_forever).then(|| self.engine.last_change_secs())
    }
}

fn build_thread_pool(threads: Option<usize>) -> LiltResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(LiltError::validation(
            "render threading 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    let pool = builder.build().context("failed to build rayon thread pool")?;
    Ok(pool)
}

#[cfg(test)]
#[path = "../../tests/unit/session/render_session.rs"]
mod tests;
