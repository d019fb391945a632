use std::collections::HashMap;

use crate::document::model::Document;
use crate::foundation::core::{NodeIdx, Span};
use crate::foundation::error::{LiltError, LiltResult, Warning, WarningKind};

/// Length given to a synthesized cue that has no following sibling to stretch to.
pub const INSTANT_CUE_SECS: f64 = 0.001;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// An explicit timestamp for one document node.
pub struct Cue {
    /// Id of the cued node.
    pub node_id: String,
    /// Start in seconds.
    pub begin: f64,
    /// End in seconds, `>= begin`.
    pub end: f64,
}

impl Cue {
    /// Build a cue, rejecting reversed or non-finite bounds.
    pub fn new(node_id: impl Into<String>, begin: f64, end: f64) -> LiltResult<Self> {
        Span::new(begin, end)?;
        Ok(Self {
            node_id: node_id.into(),
            begin,
            end,
        })
    }
}

#[derive(Clone, Debug)]
/// Resolved time window of every timed document node.
pub struct Timeline {
    spans: Vec<Option<Span>>,
    warnings: Vec<Warning>,
}

/// Resolve explicit cues into a time window for every timed node.
///
/// Explicit cues win; containers take the envelope of their children; uncued leaves are
/// filled from their neighbours (see [`Timeline::fill_gaps`]). Cues naming unknown ids
/// are dropped with a [`WarningKind::UnresolvedCue`] warning.
#[tracing::instrument(skip(doc, cues), fields(nodes = doc.len(), cue_count = cues.len()))]
pub fn propagate(doc: &Document, cues: &[Cue]) -> Timeline {
    let mut warnings = Vec::new();
    let mut explicit: HashMap<NodeIdx, Span> = HashMap::new();
    for cue in cues {
        let Some(idx) = doc.find(&cue.node_id) else {
            warnings.push(Warning::new(
                WarningKind::UnresolvedCue,
                LiltError::unresolved_cue(&cue.node_id).to_string(),
            ));
            continue;
        };
        if !doc.is_timed(idx) {
            tracing::debug!(node = %cue.node_id, "cue on untimed node ignored");
            continue;
        }
        explicit.insert(
            idx,
            Span {
                begin: cue.begin,
                end: cue.end.max(cue.begin),
            },
        );
    }

    let mut timeline = Timeline {
        spans: vec![None; doc.len()],
        warnings,
    };
    for (idx, span) in &explicit {
        timeline.spans[idx.index()] = Some(*span);
    }
    timeline.recompute_envelopes(doc, &explicit);
    timeline.fill_gaps(doc);
    timeline.recompute_envelopes(doc, &explicit);
    timeline
}

impl Timeline {
    /// Window of `idx`, if it is timed and resolved.
    pub fn span(&self, idx: NodeIdx) -> Option<Span> {
        self.spans.get(idx.index()).copied().flatten()
    }

    /// Window of the node carrying `id`.
    pub fn span_of(&self, doc: &Document, id: &str) -> Option<Span> {
        doc.find(id).and_then(|i| self.span(i))
    }

    /// Envelope of the whole document.
    pub fn total(&self, doc: &Document) -> Option<Span> {
        self.span(doc.root())
    }

    /// Recovered problems found while resolving cues.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    // Children always sit after their parent, so a reverse sweep is post-order.
    fn recompute_envelopes(&mut self, doc: &Document, explicit: &HashMap<NodeIdx, Span>) {
        for idx in doc.indices().rev() {
            if doc.is_timed_leaf(idx) || !doc.is_timed(idx) || explicit.contains_key(&idx) {
                continue;
            }
            self.spans[idx.index()] = doc
                .children(idx)
                .iter()
                .filter_map(|c| self.span(*c))
                .reduce(Span::union);
        }
    }

    /// Give every uncued timed leaf a window, in document order.
    ///
    /// `begin` is the previous timed sibling's end, or the parent's begin for a first
    /// child, or the end of the last window seen so far, or zero. `end` is `begin` plus
    /// [`INSTANT_CUE_SECS`], stretched to meet the next sibling when that sibling already
    /// has a window.
    pub fn fill_gaps(&mut self, doc: &Document) {
        let mut cursor: Option<f64> = None;
        for idx in doc.indices() {
            if !doc.is_timed(idx) {
                continue;
            }
            if let Some(span) = self.span(idx) {
                if doc.is_timed_leaf(idx) {
                    cursor = Some(cursor.map_or(span.end, |c| c.max(span.end)));
                }
                continue;
            }
            if !doc.is_timed_leaf(idx) {
                continue;
            }

            let parent = doc.node(idx).parent;
            let siblings: Vec<NodeIdx> = parent
                .map(|p| {
                    doc.children(p)
                        .iter()
                        .copied()
                        .filter(|c| doc.is_timed(*c))
                        .collect()
                })
                .unwrap_or_default();
            let pos = siblings.iter().position(|s| *s == idx);

            let prev_end = pos
                .and_then(|p| p.checked_sub(1))
                .and_then(|p| self.span(siblings[p]))
                .map(|s| s.end);
            let begin = prev_end
                .or_else(|| {
                    pos.filter(|p| *p == 0)
                        .and(parent)
                        .and_then(|p| self.span(p))
                        .map(|s| s.begin)
                })
                .or(cursor)
                .unwrap_or(0.0);

            let next_begin = pos
                .and_then(|p| siblings.get(p + 1))
                .and_then(|s| self.span(*s))
                .map(|s| s.begin);
            let end = match next_begin {
                Some(nb) if nb >= begin => nb,
                _ => begin + INSTANT_CUE_SECS,
            };

            self.spans[idx.index()] = Some(Span { begin, end });
            cursor = Some(cursor.map_or(end, |c| c.max(end)));
        }
    }

    /// Stretch the timed children of `parent` so they tile `[0, total]`.
    ///
    /// The first child starts at zero, the last ends at `total`, and the gap (or
    /// overlap) between neighbours is split at its midpoint. Envelopes above `parent`
    /// are not recomputed.
    pub fn pad_children(&mut self, doc: &Document, parent: NodeIdx, total: f64) {
        let kids: Vec<NodeIdx> = doc
            .children(parent)
            .iter()
            .copied()
            .filter(|c| self.span(*c).is_some())
            .collect();
        let (Some(first), Some(last)) = (kids.first().copied(), kids.last().copied()) else {
            return;
        };

        for pair in kids.windows(2) {
            let (Some(a), Some(b)) = (self.span(pair[0]), self.span(pair[1])) else {
                continue;
            };
            let mid = (a.end + b.begin) / 2.0;
            self.spans[pair[0].index()] = Some(Span {
                begin: a.begin,
                end: mid,
            });
            self.spans[pair[1].index()] = Some(Span {
                begin: mid,
                end: b.end,
            });
        }
        if let Some(s) = self.span(first) {
            self.spans[first.index()] = Some(Span {
                begin: 0.0_f64.min(s.end),
                end: s.end,
            });
        }
        if let Some(s) = self.span(last) {
            self.spans[last.index()] = Some(Span {
                begin: s.begin,
                end: total.max(s.begin),
            });
        }
        if let Some(s) = self.span(parent) {
            self.spans[parent.index()] = Some(s.union(Span {
                begin: 0.0,
                end: total.max(0.0),
            }));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/timeline/cues.rs"]
mod tests;
