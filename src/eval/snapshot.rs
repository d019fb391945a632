use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use crate::animation::declaration::{href_target, parse_declaration};
use crate::animation::path::PathCache;
use crate::animation::primitive::{AnimationPrimitive, Effect, TransformFamily};
use crate::animation::timing::Repeat;
use crate::foundation::core::NodeIdx;
use crate::foundation::error::{LiltError, LiltResult, Warning, WarningKind};
use crate::scene::node::{Bounds, SceneNode};

const SYNTHETIC_ID_PREFIX: &str = "lilt-anim-";

#[derive(Clone, Debug)]
struct ArenaNode {
    tag: String,
    id: Option<String>,
    attributes: BTreeMap<String, String>,
    text: Option<String>,
    bounds: Option<Bounds>,
    children: Vec<NodeIdx>,
}

#[derive(Clone, Debug)]
struct Registered {
    target: NodeIdx,
    seq: usize,
    primitive: AnimationPrimitive,
}

#[derive(Debug)]
/// Bakes an animated scene into static snapshots.
///
/// Construction walks the scene once, removes every animation declaration, binds each one
/// to its target node and fixes the evaluation order (ascending `begin`, then discovery
/// order). [`SnapshotEngine::snapshot`] is then a pure function of `t`: it resets the
/// authored attributes, applies every primitive, and flattens accumulated transform
/// fragments into each node's transform list.
pub struct SnapshotEngine {
    nodes: Vec<ArenaNode>,
    root: NodeIdx,
    primitives: Vec<Registered>,
    warnings: Vec<Warning>,
    paths: Arc<PathCache>,
}

struct PendingDecl {
    target: String,
    node: SceneNode,
}

impl SnapshotEngine {
    #[tracing::instrument(skip(scene), fields(nodes = scene.count()))]
    /// Extract all declarations from `scene` with a fresh path cache.
    pub fn new(scene: SceneNode) -> LiltResult<Self> {
        Self::with_path_cache(scene, Arc::new(PathCache::new()))
    }

    /// Extract all declarations from `scene`, sharing an existing path cache.
    ///
    /// Fails with [`LiltError::AmbiguousTarget`] when a declaration's target id is carried
    /// by more than one node.
    pub fn with_path_cache(scene: SceneNode, paths: Arc<PathCache>) -> LiltResult<Self> {
        let mut taken: HashSet<String> = HashSet::new();
        collect_ids(&scene, &mut taken);

        let mut builder = Builder {
            nodes: Vec::new(),
            pending: Vec::new(),
            taken,
            next_synthetic: 0,
        };
        let root = builder.push(scene);

        let mut index: HashMap<&str, Vec<NodeIdx>> = HashMap::new();
        for (i, node) in builder.nodes.iter().enumerate() {
            if let Some(id) = &node.id {
                index.entry(id.as_str()).or_default().push(NodeIdx::from_usize(i));
            }
        }

        let mut warnings = Vec::new();
        let mut primitives = Vec::new();
        for (seq, decl) in builder.pending.iter().enumerate() {
            let target = match index.get(decl.target.as_str()).map(Vec::as_slice) {
                None | Some([]) => {
                    warnings.push(Warning::new(
                        WarningKind::MissingTarget,
                        LiltError::missing_target(&decl.target).to_string(),
                    ));
                    continue;
                }
                Some([only]) => *only,
                Some(many) => {
                    return Err(LiltError::AmbiguousTarget {
                        id: decl.target.clone(),
                        count: many.len(),
                    });
                }
            };

            match parse_declaration(&decl.node, &decl.target, &paths, &mut warnings) {
                Ok(primitive) => primitives.push(Registered {
                    target,
                    seq,
                    primitive,
                }),
                Err(e) => warnings.push(Warning::new(WarningKind::Parse, e.to_string())),
            }
        }

        primitives.sort_by(|a, b| {
            a.primitive
                .timing
                .begin
                .total_cmp(&b.primitive.timing.begin)
                .then(a.seq.cmp(&b.seq))
        });

        tracing::debug!(
            primitives = primitives.len(),
            warnings = warnings.len(),
            "scene extracted"
        );

        Ok(Self {
            nodes: builder.nodes,
            root,
            primitives,
            warnings,
            paths,
        })
    }

    /// Recovered problems found while extracting declarations.
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of registered primitives.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
    }

    /// Registered primitives in evaluation order.
    pub fn primitives(&self) -> impl Iterator<Item = &AnimationPrimitive> {
        self.primitives.iter().map(|r| &r.primitive)
    }

    /// The path cache populated during extraction.
    pub fn path_cache(&self) -> &Arc<PathCache> {
        &self.paths
    }

    /// Latest time at which any primitive still changes (ignores indefinite repeats).
    pub fn last_change_secs(&self) -> f64 {
        self.primitives
            .iter()
            .map(|r| {
                let t = &r.primitive.timing;
                let cycles = match t.repeat_count {
                    Some(Repeat::Finite(n)) => n,
                    _ => 1.0,
                };
                let active = match t.repeat_dur {
                    Some(Repeat::Finite(d)) => d,
                    _ => t.dur.max(0.0) * cycles,
                };
                t.begin + active
            })
            .fold(0.0, f64::max)
    }

    #[tracing::instrument(level = "debug", skip(self))]
    /// Bake the scene at time `t` into an animation-free tree.
    ///
    /// Fails with [`LiltError::IncompatibleValues`] when an active primitive's endpoints
    /// cannot be interpolated.
    pub fn snapshot(&self, t: f64) -> LiltResult<SceneNode> {
        // Reset: overrides start empty, so every attribute reads as authored.
        let mut overrides: HashMap<NodeIdx, BTreeMap<String, String>> = HashMap::new();
        let mut pending: BTreeMap<(NodeIdx, String), Vec<(TransformFamily, usize, String)>> =
            BTreeMap::new();

        // Apply.
        for reg in &self.primitives {
            let Some(effect) = reg.primitive.evaluate(t)? else {
                continue;
            };
            match effect {
                Effect::Attribute { name, value } => {
                    overrides.entry(reg.target).or_default().insert(name, value);
                }
                Effect::Fragments(fragments) => {
                    for f in fragments {
                        pending
                            .entry((reg.target, f.attribute))
                            .or_default()
                            .push((f.family, reg.seq, f.value));
                    }
                }
            }
        }

        // Flatten.
        for ((idx, attribute), mut fragments) in pending {
            fragments.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
            let authored = self.nodes[idx.index()].attributes.get(&attribute);
            let current = overrides
                .get(&idx)
                .and_then(|o| o.get(&attribute))
                .or(authored);
            let mut value = current.map(|s| s.trim().to_string()).unwrap_or_default();
            for (_, _, fragment) in fragments {
                if !value.is_empty() {
                    value.push(' ');
                }
                value.push_str(&fragment);
            }
            overrides.entry(idx).or_default().insert(attribute, value);
        }

        Ok(self.materialize(self.root, &overrides))
    }

    fn materialize(
        &self,
        idx: NodeIdx,
        overrides: &HashMap<NodeIdx, BTreeMap<String, String>>,
    ) -> SceneNode {
        let node = &self.nodes[idx.index()];
        let mut attributes = node.attributes.clone();
        if let Some(o) = overrides.get(&idx) {
            attributes.extend(o.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        SceneNode {
            tag: node.tag.clone(),
            id: node.id.clone(),
            attributes,
            text: node.text.clone(),
            bounds: node.bounds,
            children: node
                .children
                .iter()
                .map(|c| self.materialize(*c, overrides))
                .collect(),
        }
    }
}

struct Builder {
    nodes: Vec<ArenaNode>,
    pending: Vec<PendingDecl>,
    taken: HashSet<String>,
    next_synthetic: usize,
}

impl Builder {
    fn push(&mut self, scene: SceneNode) -> NodeIdx {
        let SceneNode {
            tag,
            mut id,
            attributes,
            text,
            bounds,
            children,
        } = scene;

        let (decls, kept): (Vec<SceneNode>, Vec<SceneNode>) =
            children.into_iter().partition(SceneNode::is_declaration);

        let needs_parent_id = decls.iter().any(|d| href_target(d).is_none());
        if needs_parent_id && id.is_none() {
            id = Some(self.synthetic_id());
        }
        for decl in decls {
            let target = match href_target(&decl) {
                Some(h) => h.to_string(),
                None => id.clone().unwrap_or_default(),
            };
            self.pending.push(PendingDecl { target, node: decl });
        }

        let idx = NodeIdx::from_usize(self.nodes.len());
        self.nodes.push(ArenaNode {
            tag,
            id,
            attributes,
            text,
            bounds,
            children: Vec::new(),
        });
        let children: Vec<NodeIdx> = kept.into_iter().map(|c| self.push(c)).collect();
        self.nodes[idx.index()].children = children;
        idx
    }

    fn synthetic_id(&mut self) -> String {
        loop {
            let candidate = format!("{SYNTHETIC_ID_PREFIX}{}", self.next_synthetic);
            self.next_synthetic += 1;
            if self.taken.insert(candidate.clone()) {
                return candidate;
            }
        }
    }
}

fn collect_ids(node: &SceneNode, out: &mut HashSet<String>) {
    if let Some(id) = &node.id {
        out.insert(id.clone());
    }
    for child in &node.children {
        collect_ids(child, out);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/snapshot.rs"]
mod tests;
