//! Splicing resolved references back into the node tree.
//!
//! A text node becomes a sequence of text, link and image nodes covering the
//! original text exactly once: gaps stay text, each match's source
//! substring is replaced by its node. An inline code node whose whole
//! content resolves becomes a link wrapping the code (or an image).
//!
//! Links carry their target twice: in the `maestro-file://` URL and in the
//! `data-maestro-file` attribute. HTML sanitizers may strip unknown
//! protocols; the attribute survives and is what the file-open handler
//! reads.

use itertools::Itertools;

use crate::mdast::{Node, NodeData};
use crate::resolver::{Match, MatchKind, ResolutionContext};

pub const FILE_LINK_PROTOCOL: &str = "maestro-file://";
pub const FILE_ATTRIBUTE: &str = "data-maestro-file";
pub const IMAGE_ATTRIBUTE: &str = "data-maestro-image";
pub const WIDTH_ATTRIBUTE: &str = "data-maestro-width";
pub const FROM_TREE_ATTRIBUTE: &str = "data-maestro-from-tree";

/// A link to `found.resolved_path` around `children`.
pub fn link_node(found: &Match, children: Vec<Node>) -> Node {
    Node::Link {
        url: format!("{FILE_LINK_PROTOCOL}{}", found.resolved_path),
        title: None,
        data: NodeData::default().with_property(FILE_ATTRIBUTE, &found.resolved_path),
        children,
    }
}

/// Where the renderer should load an image match from.
///
/// With a project root this is an absolute `file://` URL; without one the
/// tree-relative path is returned for the caller to resolve.
pub fn image_src(found: &Match, ctx: &ResolutionContext) -> String {
    let path = ctx.image_path(found);
    match ctx.project_root {
        Some(root) => format!("file://{}/{path}", root.trim_end_matches('/')),
        None => path,
    }
}

fn image_style(width: Option<u32>) -> String {
    match width {
        Some(width) => format!("width: {width}px; max-width: 100%; height: auto;"),
        None => "max-width: 100%; height: auto;".to_string(),
    }
}

pub fn image_node(found: &Match, ctx: &ResolutionContext) -> Node {
    let mut data = NodeData::default()
        .with_property(IMAGE_ATTRIBUTE, ctx.image_path(found))
        .with_property("style", image_style(found.image_width));

    if let Some(width) = found.image_width {
        data = data.with_property(WIDTH_ATTRIBUTE, width.to_string());
    }
    if found.is_from_file_tree {
        data = data.with_property(FROM_TREE_ATTRIBUTE, "true");
    }

    Node::Image {
        url: image_src(found, ctx),
        alt: found.display.clone(),
        title: None,
        data,
    }
}

/// Rebuilds `text` around `matches`, which must not overlap.
///
/// Without matches the result is the text itself, unchanged.
pub fn reconstruct(text: &str, matches: &[Match], ctx: &ResolutionContext) -> Vec<Node> {
    if matches.is_empty() {
        return vec![Node::text(text)];
    }

    let mut nodes = vec![];
    let mut cursor = 0;

    for found in matches.iter().sorted_by_key(|found| found.start) {
        if found.start > cursor {
            nodes.push(Node::text(&text[cursor..found.start]));
        }

        nodes.push(match found.kind {
            MatchKind::Link => link_node(found, vec![Node::text(&found.display)]),
            MatchKind::Image => image_node(found, ctx),
        });

        cursor = found.end;
    }

    if cursor < text.len() {
        nodes.push(Node::text(&text[cursor..]));
    }

    nodes
}

pub fn transform_text(text: &str, ctx: &ResolutionContext) -> Vec<Node> {
    reconstruct(text, &ctx.resolve_references(text), ctx)
}

pub fn transform_inline_code(code: String, ctx: &ResolutionContext) -> Node {
    if !ctx.settings.inline_code_links {
        return Node::InlineCode { value: code };
    }

    match ctx.resolve_inline_code(&code) {
        Some(found) => match found.kind {
            MatchKind::Link => link_node(&found, vec![Node::inline_code(&found.display)]),
            MatchKind::Image => image_node(&found, ctx),
        },
        None => Node::InlineCode { value: code },
    }
}

fn transform_child(child: Node, ctx: &ResolutionContext) -> Vec<Node> {
    match child {
        Node::Text { value } => transform_text(&value, ctx),
        Node::InlineCode { value } => vec![transform_inline_code(value, ctx)],
        mut parent @ Node::Parent { .. } => {
            transform_tree(&mut parent, ctx);
            vec![parent]
        }
        other => vec![other],
    }
}

/// Rewrites every text and inline code node below `node` in place.
///
/// Links, link references and images are not entered, so no link ends up
/// nested in another and a transformed tree can be transformed again
/// without change.
pub fn transform_tree(node: &mut Node, ctx: &ResolutionContext) {
    let Some(children) = node.children_mut() else {
        return;
    };

    *children = std::mem::take(children)
        .into_iter()
        .flat_map(|child| transform_child(child, ctx))
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::sample_index;

    #[test]
    fn no_matches_is_identity() {
        let index = sample_index();
        let ctx = ResolutionContext::new(&index, "");

        assert_eq!(
            transform_text("Nothing to see here.", &ctx),
            vec![Node::text("Nothing to see here.")]
        );
        assert_eq!(transform_text("", &ctx), vec![Node::text("")]);
    }

    #[test]
    fn text_around_matches_is_kept() {
        let index = sample_index();
        let ctx = ResolutionContext::new(&index, "");

        let nodes = transform_text("See [[TODO]] for tasks.", &ctx);

        assert_eq!(
            nodes,
            vec![
                Node::text("See "),
                Node::Link {
                    url: "maestro-file://Notes/TODO.md".into(),
                    title: None,
                    data: NodeData::default().with_property(FILE_ATTRIBUTE, "Notes/TODO.md"),
                    children: vec![Node::text("TODO")],
                },
                Node::text(" for tasks."),
            ]
        );
    }

    #[test]
    fn adjacent_matches_leave_no_empty_text() {
        let index = sample_index();
        let ctx = ResolutionContext::new(&index, "");

        let nodes = transform_text("[[TODO]][[guide]]", &ctx);

        assert_eq!(nodes.len(), 2);
        assert!(nodes.iter().all(|n| matches!(n, Node::Link { .. })));
    }

    #[test]
    fn fallback_image_src_joins_root_and_cwd() {
        let index = sample_index();
        let ctx = ResolutionContext::new(&index, "docs").with_project_root("/proj");

        let nodes = transform_text("![[missing.png]]", &ctx);

        let Node::Image { url, alt, data, .. } = &nodes[0] else {
            panic!("Expected an image node, got {:?}", nodes[0]);
        };
        assert_eq!(url, "file:///proj/docs/_attachments/missing.png");
        assert_eq!(alt, "missing.png");
        assert_eq!(
            data.property(IMAGE_ATTRIBUTE),
            Some("docs/_attachments/missing.png")
        );
        assert_eq!(data.property(FROM_TREE_ATTRIBUTE), None);
        assert_eq!(data.property(WIDTH_ATTRIBUTE), None);
    }

    #[test]
    fn tree_image_carries_width_and_origin() {
        let index = sample_index();
        let ctx = ResolutionContext::new(&index, "docs");

        let nodes = transform_text("Chart: ![[diagram.png|320]]", &ctx);

        let Node::Image { url, data, .. } = &nodes[1] else {
            panic!("Expected an image node, got {:?}", nodes[1]);
        };
        assert_eq!(url, "docs/diagram.png");
        assert_eq!(data.property(WIDTH_ATTRIBUTE), Some("320"));
        assert_eq!(data.property(FROM_TREE_ATTRIBUTE), Some("true"));
        assert_eq!(
            data.property("style"),
            Some("width: 320px; max-width: 100%; height: auto;")
        );
    }

    #[test]
    fn inline_code_link_wraps_code() {
        let index = sample_index();
        let ctx = ResolutionContext::new(&index, "").with_project_root("/proj");

        let node = transform_inline_code("/proj/src/main.rs".into(), &ctx);

        assert_eq!(
            node,
            Node::Link {
                url: "maestro-file://src/main.rs".into(),
                title: None,
                data: NodeData::default().with_property(FILE_ATTRIBUTE, "src/main.rs"),
                children: vec![Node::inline_code("main.rs")],
            }
        );
    }

    #[test]
    fn inline_code_pass_can_be_disabled() {
        let index = sample_index();
        let ctx = ResolutionContext::new(&index, "").with_settings(crate::config::Settings {
            inline_code_links: false,
            ..Default::default()
        });

        assert_eq!(
            transform_inline_code("src/main.rs".into(), &ctx),
            Node::inline_code("src/main.rs")
        );
    }

    #[test]
    fn tree_transform_skips_existing_links() {
        let index = sample_index();
        let ctx = ResolutionContext::new(&index, "");
        let existing = Node::Link {
            url: "https://example.com".into(),
            title: None,
            data: NodeData::default(),
            children: vec![Node::text("src/main.rs")],
        };
        let mut tree = Node::parent(
            "root",
            vec![Node::parent(
                "paragraph",
                vec![Node::text("Edit src/main.rs "), existing.clone()],
            )],
        );

        transform_tree(&mut tree, &ctx);

        let paragraph = &tree.children().unwrap()[0];
        let children = paragraph.children().unwrap();
        assert_eq!(children.len(), 4);
        assert_eq!(children[0], Node::text("Edit "));
        assert!(matches!(&children[1], Node::Link { url, .. } if url == "maestro-file://src/main.rs"));
        assert_eq!(children[2], Node::text(" "));
        assert_eq!(children[3], existing);
    }

    #[test]
    fn tree_transform_skips_reference_links() {
        let index = sample_index();
        let ctx = ResolutionContext::new(&index, "");
        let mut tree =
            crate::mdast::parse("[see src/main.rs][ref] or src/main.rs\n\n[ref]: https://example.com")
                .unwrap();

        transform_tree(&mut tree, &ctx);

        let reference = tree
            .descendants()
            .into_iter()
            .find(|n| n.kind() == "linkReference")
            .unwrap();
        assert_eq!(reference.children().unwrap(), &[Node::text("see src/main.rs")]);

        let file_links = tree
            .descendants()
            .into_iter()
            .filter(|n| matches!(n, Node::Link { url, .. } if url.starts_with(FILE_LINK_PROTOCOL)))
            .count();
        assert_eq!(file_links, 1);
    }

    #[test]
    fn transforming_twice_changes_nothing_more() {
        let index = sample_index();
        let ctx = ResolutionContext::new(&index, "");
        let mut tree = Node::parent("paragraph", vec![Node::text("[[TODO]] and src/main.rs")]);

        transform_tree(&mut tree, &ctx);
        let once = tree.clone();
        transform_tree(&mut tree, &ctx);

        assert_eq!(tree, once);
    }
}
