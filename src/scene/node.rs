use std::collections::BTreeMap;

/// Tags that declare an animation rather than draw something.
pub const DECLARATION_TAGS: [&str; 4] = ["set", "animate", "animateTransform", "animateMotion"];

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// Layout metadata carried by nodes produced from the text layout.
pub struct Bounds {
    /// Left edge in canvas pixels.
    pub x: f64,
    /// Top edge in canvas pixels.
    pub y: f64,
    /// Width in canvas pixels.
    pub width: f64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
/// A node of the renderable scene tree.
///
/// Attribute maps hold the authored state. Animation declarations are ordinary children
/// whose tag is one of [`DECLARATION_TAGS`]; the snapshot engine extracts them once and
/// every baked snapshot is free of them.
pub struct SceneNode {
    /// Element name, e.g. `svg`, `g`, `text`, `animate`.
    pub tag: String,
    /// Unique identifier, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Attribute name to value.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Character content (for `text` nodes).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Optional layout box.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds: Option<Bounds>,
    /// Owned children in document order.
    #[serde(default)]
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    /// A node with the given tag and nothing else.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Set the identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the character content.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the layout box.
    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Append a child.
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Attribute value by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// True when this node is an animation declaration.
    pub fn is_declaration(&self) -> bool {
        DECLARATION_TAGS.contains(&self.tag.as_str())
    }

    /// Depth-first search for every node carrying `id`.
    pub fn find_all(&self, id: &str) -> Vec<&SceneNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.id.as_deref() == Some(id) {
                out.push(node);
            }
            stack.extend(node.children.iter().rev());
        }
        out
    }

    /// First node carrying `id`, in document order.
    pub fn find(&self, id: &str) -> Option<&SceneNode> {
        self.find_all(id).into_iter().next()
    }

    /// Total number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::count).sum::<usize>()
    }

    /// Serialize as SVG markup for an external rasterizer.
    pub fn to_svg_string(&self) -> String {
        let mut out = String::new();
        if self.tag == "svg" && !self.attributes.contains_key("xmlns") {
            let mut root = self.clone();
            root.attributes
                .insert("xmlns".to_string(), "http://www.w3.org/2000/svg".to_string());
            write_node(&mut out, &root, 0);
        } else {
            write_node(&mut out, self, 0);
        }
        out
    }
}

fn write_node(out: &mut String, node: &SceneNode, depth: usize) {
    let indent = "  ".repeat(depth);
    out.push_str(&indent);
    out.push('<');
    out.push_str(&node.tag);
    if let Some(id) = &node.id {
        out.push_str(&format!(r#" id="{}""#, escape_xml(id)));
    }
    for (k, v) in &node.attributes {
        out.push_str(&format!(r#" {k}="{}""#, escape_xml(v)));
    }

    match (&node.text, node.children.is_empty()) {
        (None, true) => out.push_str("/>\n"),
        (Some(text), true) => {
            out.push('>');
            out.push_str(&escape_xml(text));
            out.push_str(&format!("</{}>\n", node.tag));
        }
        (text, false) => {
            out.push_str(">\n");
            if let Some(text) = text {
                out.push_str(&indent);
                out.push_str("  ");
                out.push_str(&escape_xml(text));
                out.push('\n');
            }
            for child in &node.children {
                write_node(out, child, depth + 1);
            }
            out.push_str(&indent);
            out.push_str(&format!("</{}>\n", node.tag));
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
#[path = "../../tests/unit/scene/node.rs"]
mod tests;
