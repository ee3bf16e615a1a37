use anyhow::anyhow;
use markdown::mdast::{AlignKind, ReferenceKind};
use markdown::{mdast, to_mdast, ParseOptions};
use serde_json::{json, Value};

use super::{Fields, Node, NodeData};

/// Parses GitHub-flavored markdown into a [`Node`] tree.
pub fn parse(text: &str) -> anyhow::Result<Node> {
    let ast = to_mdast(text, &ParseOptions::gfm()).map_err(|err| anyhow!("Parse err: {err}"))?;
    Ok(Node::from(&ast))
}

fn kind_name(node: &mdast::Node) -> &'static str {
    match node {
        mdast::Node::Root(_) => "root",
        mdast::Node::Paragraph(_) => "paragraph",
        mdast::Node::Heading(_) => "heading",
        mdast::Node::Blockquote(_) => "blockquote",
        mdast::Node::List(_) => "list",
        mdast::Node::ListItem(_) => "listItem",
        mdast::Node::Table(_) => "table",
        mdast::Node::TableRow(_) => "tableRow",
        mdast::Node::TableCell(_) => "tableCell",
        mdast::Node::Emphasis(_) => "emphasis",
        mdast::Node::Strong(_) => "strong",
        mdast::Node::Delete(_) => "delete",
        mdast::Node::FootnoteDefinition(_) => "footnoteDefinition",
        mdast::Node::FootnoteReference(_) => "footnoteReference",
        mdast::Node::LinkReference(_) => "linkReference",
        mdast::Node::ImageReference(_) => "imageReference",
        mdast::Node::Definition(_) => "definition",
        mdast::Node::Code(_) => "code",
        mdast::Node::Math(_) => "math",
        mdast::Node::InlineMath(_) => "inlineMath",
        mdast::Node::Html(_) => "html",
        mdast::Node::Break(_) => "break",
        mdast::Node::ThematicBreak(_) => "thematicBreak",
        mdast::Node::Yaml(_) => "yaml",
        mdast::Node::Toml(_) => "toml",
        _ => "unknown",
    }
}

fn reference_type(kind: &ReferenceKind) -> &'static str {
    match kind {
        ReferenceKind::Shortcut => "shortcut",
        ReferenceKind::Collapsed => "collapsed",
        ReferenceKind::Full => "full",
    }
}

fn align_name(align: &AlignKind) -> Option<&'static str> {
    match align {
        AlignKind::Left => Some("left"),
        AlignKind::Right => Some("right"),
        AlignKind::Center => Some("center"),
        AlignKind::None => None,
    }
}

/// The node's properties besides `type`, `children` and `value`. Unset
/// ones are left out, as in mdast.
fn fields(node: &mdast::Node) -> Fields {
    let value = match node {
        mdast::Node::Heading(heading) => json!({ "depth": heading.depth }),
        mdast::Node::Code(code) => json!({ "lang": code.lang, "meta": code.meta }),
        mdast::Node::Math(math) => json!({ "meta": math.meta }),
        mdast::Node::List(list) => json!({
            "ordered": list.ordered,
            "start": list.start,
            "spread": list.spread,
        }),
        mdast::Node::ListItem(item) => json!({ "checked": item.checked, "spread": item.spread }),
        mdast::Node::Table(table) => json!({
            "align": table.align.iter().map(align_name).collect::<Vec<_>>(),
        }),
        mdast::Node::Definition(definition) => json!({
            "url": definition.url,
            "title": definition.title,
            "identifier": definition.identifier,
            "label": definition.label,
        }),
        mdast::Node::LinkReference(reference) => json!({
            "identifier": reference.identifier,
            "label": reference.label,
            "referenceType": reference_type(&reference.reference_kind),
        }),
        mdast::Node::ImageReference(reference) => json!({
            "alt": reference.alt,
            "identifier": reference.identifier,
            "label": reference.label,
            "referenceType": reference_type(&reference.reference_kind),
        }),
        mdast::Node::FootnoteDefinition(definition) => json!({
            "identifier": definition.identifier,
            "label": definition.label,
        }),
        mdast::Node::FootnoteReference(reference) => json!({
            "identifier": reference.identifier,
            "label": reference.label,
        }),
        _ => return Fields::new(),
    };

    match value {
        Value::Object(map) => map.into_iter().filter(|(_, v)| !v.is_null()).collect(),
        _ => Fields::new(),
    }
}

fn literal_value(node: &mdast::Node) -> Option<String> {
    match node {
        mdast::Node::Code(code) => Some(code.value.clone()),
        mdast::Node::Math(math) => Some(math.value.clone()),
        mdast::Node::InlineMath(math) => Some(math.value.clone()),
        mdast::Node::Html(html) => Some(html.value.clone()),
        mdast::Node::Yaml(yaml) => Some(yaml.value.clone()),
        mdast::Node::Toml(toml) => Some(toml.value.clone()),
        _ => None,
    }
}

/// Converts children, merging runs of adjacent text nodes so that bracket
/// syntaxes the parser split apart are scanned as one span.
fn convert_children(children: &[mdast::Node]) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(children.len());

    for child in children {
        let converted = Node::from(child);
        if let (Some(Node::Text { value: previous }), Node::Text { value }) =
            (out.last_mut(), &converted)
        {
            previous.push_str(value);
            continue;
        }
        out.push(converted);
    }

    out
}

impl From<&mdast::Node> for Node {
    fn from(node: &mdast::Node) -> Self {
        match node {
            mdast::Node::Text(text) => Node::text(&text.value),
            mdast::Node::InlineCode(code) => Node::inline_code(&code.value),
            mdast::Node::Link(link) => Node::Link {
                url: link.url.clone(),
                title: link.title.clone(),
                data: NodeData::default(),
                children: convert_children(&link.children),
            },
            mdast::Node::Image(image) => Node::Image {
                url: image.url.clone(),
                alt: image.alt.clone(),
                title: image.title.clone(),
                data: NodeData::default(),
            },
            mdast::Node::LinkReference(reference) => Node::Reference {
                kind: kind_name(node).to_string(),
                fields: fields(node),
                children: convert_children(&reference.children),
            },
            other => match other.children() {
                Some(children) => Node::Parent {
                    kind: kind_name(other).to_string(),
                    fields: fields(other),
                    children: convert_children(children),
                },
                None => Node::Literal {
                    kind: kind_name(other).to_string(),
                    fields: fields(other),
                    value: literal_value(other),
                },
            },
        }
    }
}
