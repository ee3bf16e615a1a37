//! The node tree the link transform works on.
//!
//! Only four node kinds matter to the transform: plain text, inline code,
//! links and images. Everything else is carried through as an opaque
//! [`Node::Parent`] (with children) or [`Node::Literal`] (without), keeping
//! its mdast `type` and remaining properties so the serialized tree is
//! still mdast. Reference-style links are kept apart as
//! [`Node::Reference`]: they render as links, so like [`Node::Link`] they
//! are closed to the transform. Attributes that must reach the rendered
//! element live in a `data.hProperties` map.

mod convert;

pub use convert::parse;

use std::collections::BTreeMap;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Side-channel attributes attached to a node.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeData {
    #[serde(rename = "hProperties", default)]
    pub h_properties: BTreeMap<String, String>,
}

impl NodeData {
    pub fn with_property(mut self, key: &str, value: impl Into<String>) -> NodeData {
        self.h_properties.insert(key.to_string(), value.into());
        self
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.h_properties.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.h_properties.is_empty()
    }
}

/// mdast properties besides `type`, `children` and `value` (`depth`,
/// `lang`, `ordered`, `identifier`, ...).
pub type Fields = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Any container the transform does not interpret (root, paragraph, heading, ...)
    Parent {
        kind: String,
        fields: Fields,
        children: Vec<Node>,
    },
    /// A `linkReference`; its children are link text and are never rewritten
    Reference {
        kind: String,
        fields: Fields,
        children: Vec<Node>,
    },
    /// Any leaf the transform does not interpret (code block, html, definition, ...)
    Literal {
        kind: String,
        fields: Fields,
        value: Option<String>,
    },
    Text {
        value: String,
    },
    InlineCode {
        value: String,
    },
    Link {
        url: String,
        title: Option<String>,
        data: NodeData,
        children: Vec<Node>,
    },
    Image {
        url: String,
        alt: String,
        title: Option<String>,
        data: NodeData,
    },
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;

        match self {
            Node::Parent {
                kind,
                fields,
                children,
            }
            | Node::Reference {
                kind,
                fields,
                children,
            } => {
                map.serialize_entry("type", kind)?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                map.serialize_entry("children", children)?;
            }
            Node::Literal {
                kind,
                fields,
                value,
            } => {
                map.serialize_entry("type", kind)?;
                for (key, value) in fields {
                    map.serialize_entry(key, value)?;
                }
                if let Some(value) = value {
                    map.serialize_entry("value", value)?;
                }
            }
            Node::Text { value } => {
                map.serialize_entry("type", "text")?;
                map.serialize_entry("value", value)?;
            }
            Node::InlineCode { value } => {
                map.serialize_entry("type", "inlineCode")?;
                map.serialize_entry("value", value)?;
            }
            Node::Link {
                url,
                title,
                data,
                children,
            } => {
                map.serialize_entry("type", "link")?;
                map.serialize_entry("url", url)?;
                if let Some(title) = title {
                    map.serialize_entry("title", title)?;
                }
                if !data.is_empty() {
                    map.serialize_entry("data", data)?;
                }
                map.serialize_entry("children", children)?;
            }
            Node::Image {
                url,
                alt,
                title,
                data,
            } => {
                map.serialize_entry("type", "image")?;
                map.serialize_entry("url", url)?;
                map.serialize_entry("alt", alt)?;
                if let Some(title) = title {
                    map.serialize_entry("title", title)?;
                }
                if !data.is_empty() {
                    map.serialize_entry("data", data)?;
                }
            }
        }

        map.end()
    }
}

impl Node {
    pub fn text(value: impl Into<String>) -> Node {
        Node::Text {
            value: value.into(),
        }
    }

    pub fn inline_code(value: impl Into<String>) -> Node {
        Node::InlineCode {
            value: value.into(),
        }
    }

    pub fn parent(kind: &str, children: Vec<Node>) -> Node {
        Node::Parent {
            kind: kind.to_string(),
            fields: Fields::new(),
            children,
        }
    }

    /// Children the transform may rewrite. Links, references and images
    /// are closed.
    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Parent { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Parent { children, .. }
            | Node::Reference { children, .. }
            | Node::Link { children, .. } => Some(children),
            _ => None,
        }
    }

    pub fn kind(&self) -> &str {
        match self {
            Node::Parent { kind, .. } | Node::Reference { kind, .. } | Node::Literal { kind, .. } => {
                kind
            }
            Node::Text { .. } => "text",
            Node::InlineCode { .. } => "inlineCode",
            Node::Link { .. } => "link",
            Node::Image { .. } => "image",
        }
    }

    pub fn data(&self) -> Option<&NodeData> {
        match self {
            Node::Link { data, .. } | Node::Image { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Concatenated text content, the way it reads once rendered.
    pub fn text_content(&self) -> String {
        match self {
            Node::Text { value } | Node::InlineCode { value } => value.clone(),
            Node::Literal { value, .. } => value.clone().unwrap_or_default(),
            Node::Image { alt, .. } => alt.clone(),
            Node::Parent { children, .. }
            | Node::Reference { children, .. }
            | Node::Link { children, .. } => children.iter().map(Node::text_content).collect(),
        }
    }

    /// Depth-first pre-order walk over this node and its descendants.
    pub fn descendants(&self) -> Vec<&Node> {
        let mut out = vec![self];
        if let Some(children) = self.children() {
            for child in children {
                out.extend(child.descendants());
            }
        }
        out
    }
}
