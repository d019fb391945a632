use crate::config::RenderConfig;
use crate::document::model::{Document, NodeKind};
use crate::foundation::core::{NodeIdx, Rect};

/// Text measurement, supplied by the host.
pub trait FontMetrics: Send + Sync {
    /// Advance width of `text` in pixels.
    fn text_width(&self, text: &str, family: &str, size: f64) -> f64;
    /// Distance from a line's top to its baseline in pixels.
    fn ascent(&self, family: &str, size: f64) -> f64;
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// Monospace-style metrics: every character advances by the same fraction of the size.
pub struct FixedAdvanceMetrics {
    /// Advance per character, in ems.
    pub advance_em: f64,
    /// Ascent, in ems.
    pub ascent_em: f64,
}

impl Default for FixedAdvanceMetrics {
    fn default() -> Self {
        Self {
            advance_em: 0.5,
            ascent_em: 0.8,
        }
    }
}

impl FontMetrics for FixedAdvanceMetrics {
    fn text_width(&self, text: &str, _family: &str, size: f64) -> f64 {
        text.chars().count() as f64 * self.advance_em * size
    }

    fn ascent(&self, _family: &str, size: f64) -> f64 {
        self.ascent_em * size
    }
}

#[derive(Clone, Debug)]
/// Screen boxes for laid-out document nodes.
pub struct Layout {
    boxes: Vec<Option<Rect>>,
    ascent: f64,
}

impl Layout {
    /// Box of `idx`, if the node was laid out.
    pub fn rect(&self, idx: NodeIdx) -> Option<Rect> {
        self.boxes.get(idx.index()).copied().flatten()
    }

    /// Baseline of a token laid out at `rect`.
    pub fn baseline(&self, rect: Rect) -> f64 {
        rect.y0 + self.ascent
    }

    /// Ascent used for every line.
    pub fn ascent(&self) -> f64 {
        self.ascent
    }
}

struct Token {
    idx: NodeIdx,
    width: f64,
    content: bool,
}

/// Lay every page out independently on a canvas of the configured size.
///
/// Sentences stack from the top; each breaks greedily into lines no wider than the
/// content width, breaking only before a word. Lines are centred horizontally and the
/// page block is centred vertically when it is shorter than the canvas. Containers get
/// the union of their children's boxes.
#[tracing::instrument(skip(doc, config, metrics), fields(nodes = doc.len()))]
pub fn layout_document(
    doc: &Document,
    config: &RenderConfig,
    metrics: &dyn FontMetrics,
) -> Layout {
    let ascent = metrics.ascent(&config.font, config.font_size);
    let pitch = config.font_size * config.line_height;
    let width = config.content_width();
    let mut boxes: Vec<Option<Rect>> = vec![None; doc.len()];

    for page in doc.pages() {
        let mut sentences = doc.descendants_of_kind(page, NodeKind::Sentence);
        if sentences.is_empty() {
            sentences.push(page);
        }

        let mut lines: Vec<Vec<Token>> = Vec::new();
        for sentence in sentences {
            let mut line: Vec<Token> = Vec::new();
            let mut line_width = 0.0;
            for idx in tokens_of(doc, sentence) {
                let node = doc.node(idx);
                let text = node.text.as_deref().unwrap_or_default();
                let w = metrics.text_width(text, &config.font, config.font_size);
                let content = node.kind == NodeKind::Word;
                if content && !line.is_empty() && line_width + w > width {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0.0;
                }
                line_width += w;
                line.push(Token {
                    idx,
                    width: w,
                    content,
                });
            }
            if !line.is_empty() {
                lines.push(line);
            }
        }

        let block = if lines.is_empty() {
            0.0
        } else {
            (lines.len() - 1) as f64 * pitch + config.font_size
        };
        let top = ((config.height - block) / 2.0).max(0.0);

        for (row, line) in lines.iter().enumerate() {
            let line_width: f64 = line.iter().map(|t| t.width).sum();
            let mut x = config.margin_left + (width - line_width) / 2.0;
            let y = top + row as f64 * pitch;
            for token in line {
                boxes[token.idx.index()] = Some(Rect::new(x, y, x + token.width, y + ascent));
                x += token.width;
            }
            tracing::trace!(
                row,
                tokens = line.len(),
                words = line.iter().filter(|t| t.content).count(),
                "line placed"
            );
        }
    }

    // Children always sit after their parent, so a reverse sweep is post-order.
    for idx in doc.indices().rev() {
        if boxes[idx.index()].is_some() {
            continue;
        }
        boxes[idx.index()] = doc
            .children(idx)
            .iter()
            .filter_map(|c| boxes[c.index()])
            .reduce(|a, b| a.union(b));
    }

    Layout { boxes, ascent }
}

/// Leaves with text below `root`, in reading order.
pub(crate) fn tokens_of(doc: &Document, root: NodeIdx) -> Vec<NodeIdx> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(i) = stack.pop() {
        let node = doc.node(i);
        if node.children.is_empty() {
            if node.text.is_some() && matches!(node.kind, NodeKind::Word | NodeKind::Text) {
                out.push(i);
            }
        } else {
            stack.extend(node.children.iter().rev());
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/layout/text.rs"]
mod tests;
