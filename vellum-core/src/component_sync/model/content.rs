/*
    content.rs - Text content tree

    The content of a text shape is a nested node tree, independent of the
    shape tree: a root node holding paragraphs holding text leaves. Any
    node may carry its own color and typography references, so library
    sync walks this tree on its own.
*/

use serde::{Deserialize, Serialize};

use super::types::{ColorId, FileId, Gradient, TypographyId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentNodeType {
    Root,
    Paragraph,
    Text,
}

/// A node in the text content tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentNode {
    pub node_type: ContentNodeType,
    pub text: Option<String>,
    pub children: Vec<ContentNode>,

    // Per-node fill, overriding the shape-level fill
    pub fill_color: Option<String>,
    pub fill_opacity: Option<f64>,
    pub fill_color_gradient: Option<Gradient>,
    pub fill_color_ref_id: Option<ColorId>,
    pub fill_color_ref_file: Option<FileId>,

    pub stroke_color_ref_id: Option<ColorId>,
    pub stroke_color_ref_file: Option<FileId>,

    pub typography_ref_id: Option<TypographyId>,
    pub typography_ref_file: Option<FileId>,

    // Font attributes, normally filled in from a typography asset
    pub font_id: Option<String>,
    pub font_family: Option<String>,
    pub font_variant_id: Option<String>,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
    pub font_style: Option<String>,
    pub line_height: Option<String>,
    pub letter_spacing: Option<String>,
    pub text_transform: Option<String>,
}

impl ContentNode {
    pub fn new(node_type: ContentNodeType) -> Self {
        ContentNode {
            node_type,
            text: None,
            children: Vec::new(),
            fill_color: None,
            fill_opacity: None,
            fill_color_gradient: None,
            fill_color_ref_id: None,
            fill_color_ref_file: None,
            stroke_color_ref_id: None,
            stroke_color_ref_file: None,
            typography_ref_id: None,
            typography_ref_file: None,
            font_id: None,
            font_family: None,
            font_variant_id: None,
            font_size: None,
            font_weight: None,
            font_style: None,
            line_height: None,
            letter_spacing: None,
            text_transform: None,
        }
    }

    /// A text leaf
    pub fn text(text: &str) -> Self {
        let mut node = ContentNode::new(ContentNodeType::Text);
        node.text = Some(text.to_string());
        node
    }

    /// A root node wrapping the given children
    pub fn root(children: Vec<ContentNode>) -> Self {
        let mut node = ContentNode::new(ContentNodeType::Root);
        node.children = children;
        node
    }

    /// A paragraph wrapping the given children
    pub fn paragraph(children: Vec<ContentNode>) -> Self {
        let mut node = ContentNode::new(ContentNodeType::Paragraph);
        node.children = children;
        node
    }
}

/// True if any node of the tree satisfies the predicate
pub fn some_node<F>(pred: &F, node: &ContentNode) -> bool
where
    F: Fn(&ContentNode) -> bool,
{
    pred(node) || node.children.iter().any(|child| some_node(pred, child))
}

/// Structural map over the tree. The function transforms each node's own
/// attributes; children are rebuilt from the input tree, so the function
/// must not edit `children` itself.
pub fn map_node<F>(f: &F, node: &ContentNode) -> ContentNode
where
    F: Fn(&ContentNode) -> ContentNode,
{
    let mut mapped = f(node);
    mapped.children = node.children.iter().map(|child| map_node(f, child)).collect();
    mapped
}
