//! Lilt turns a timed text document into an animated read-along scene and bakes that
//! scene into static frames.
//!
//! # Pipeline overview
//!
//! 1. **Time**: `Document + [Cue] -> Timeline` ([`propagate`]) gives every node a window.
//! 2. **Lay out**: `Document + RenderConfig + FontMetrics -> Layout` ([`layout_document`]).
//! 3. **Compose**: per page, text nodes carry highlight declarations and the bouncing
//!    indicator is lowered from an [`IndicatorPlan`] ([`build_page_scene`]).
//! 4. **Snapshot**: [`SnapshotEngine`] extracts every declaration once, then bakes the
//!    scene at any time `t` into an animation-free [`SceneNode`] tree.
//! 5. **Frames**: [`RenderSession`] maps frame indices to times and bakes ranges,
//!    sequentially or on a rayon pool.
//!
//! Rasterization, font shaping, audio decoding and encoding are host concerns; fonts and
//! audio come in through the [`FontMetrics`] and [`AmplitudeSource`] traits.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod animation;
mod compose;
mod config;
mod document;
mod eval;
mod foundation;
mod indicator;
mod layout;
mod scene;
mod session;
mod timeline;

pub use animation::interp::interpolate;
pub use animation::path::{MotionPath, PathCache};
pub use animation::primitive::{
    AnimationPrimitive, Effect, Fragment, Orient, PrimitiveKind, TransformFamily, TransformKind,
};
pub use animation::timing::{
    Fill, Phase, Repeat, Timing, parse_clock_value, parse_repeat_count, parse_repeat_dur, phase,
};
pub use compose::scene_builder::{
    INDICATOR_ID, PageScene, build_document_scenes, build_page_scene, build_page_scene_with,
};
pub use config::{IndicatorConfig, RenderConfig};
pub use document::model::{DocEntry, Document, DocumentNode, NodeKind};
pub use eval::snapshot::SnapshotEngine;
pub use foundation::core::{BezPath, Fps, FrameIndex, FrameRange, NodeIdx, Point, Rect, Span, Vec2};
pub use foundation::error::{LiltError, LiltResult, Warning, WarningKind};
pub use indicator::waypoint::{
    Bounce, Hold, IndicatorPlan, Waypoint, collect_waypoints, compile_waypoints, narrow_waypoints,
};
pub use layout::text::{FixedAdvanceMetrics, FontMetrics, Layout, layout_document};
pub use scene::node::{Bounds, DECLARATION_TAGS, SceneNode};
pub use session::render_session::{RenderSession, RenderStats, RenderThreading};
pub use timeline::amplitude::{AmplitudeSource, SampledAmplitude, narrow_span};
pub use timeline::cues::{Cue, INSTANT_CUE_SECS, Timeline, propagate};
