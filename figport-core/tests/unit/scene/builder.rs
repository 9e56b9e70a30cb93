use std::path::Path;
use std::sync::Mutex;

use super::*;
use crate::document::model::{Fill, TextStyle};
use crate::foundation::core::{BoundingBox, ImageFormat, Rgba, Vec2};
use crate::foundation::error::FigportResult;
use crate::package::sink::ImageHandle;
use crate::scene::node::TextRun;

/// Sink that records template persistence instead of writing anywhere.
#[derive(Default)]
struct RecordingSink {
    templates: Mutex<Vec<(String, usize)>>,
}

impl AssetSink for RecordingSink {
    fn persist_image(
        &self,
        path_hint: &Path,
        _bytes: &[u8],
        _format: ImageFormat,
    ) -> FigportResult<ImageHandle> {
        Ok(ImageHandle {
            path: path_hint.to_path_buf(),
        })
    }

    fn persist_template(&self, tree: &SceneTree, root: SceneId, name: &str) -> FigportResult<()> {
        self.templates
            .lock()
            .unwrap()
            .push((name.to_string(), tree.subtree(root).len()));
        Ok(())
    }
}

fn node(id: &str, name: &str, node_type: NodeType, bb: BoundingBox) -> Node {
    Node {
        id: id.to_string(),
        name: name.to_string(),
        node_type,
        absolute_bounding_box: bb,
        children: vec![],
        fills: vec![],
        characters: None,
        style: None,
    }
}

fn page(children: Vec<Node>) -> Node {
    let mut n = node("0:1", "Page 1", NodeType::Canvas, BoundingBox::default());
    n.children = children;
    n
}

fn build_doc(doc: &Document) -> (BuildOutput, Vec<(String, usize)>) {
    let sink = RecordingSink::default();
    let tracker = CompletionTracker::new();
    let out = SceneBuilder::new(TextBackend::Plain, &sink, &tracker).build(doc);
    let templates = sink.templates.into_inner().unwrap();
    (out, templates)
}

fn names(tree: &SceneTree) -> Vec<&str> {
    tree.nodes().map(|n| n.name.as_str()).collect()
}

#[test]
fn frame_with_text_becomes_a_named_template() {
    let mut text = node(
        "1:2",
        "Greeting",
        NodeType::Text,
        BoundingBox::new(10.0, 10.0, 80.0, 20.0),
    );
    text.fills = vec![Fill {
        color: Some(Rgba {
            r: 1.0,
            g: 1.0,
            b: 1.0,
            a: 1.0,
        }),
        image_ref: None,
    }];
    text.characters = Some("Hi".to_string());
    text.style = Some(TextStyle { font_size: 12.0 });

    let mut frame = node("1:1", "Home", NodeType::Frame, BoundingBox::new(0.0, 0.0, 100.0, 50.0));
    frame.children = vec![text];
    let doc = Document {
        children: vec![page(vec![frame])],
    };

    let (out, templates) = build_doc(&doc);
    assert_eq!(templates, vec![("Canvas_Home".to_string(), 3)]);
    assert_eq!(out.stats.pages, 1);
    assert_eq!(out.stats.templates, 1);

    let tree = &out.tree;
    assert_eq!(tree.roots().len(), 1);

    let canvas = tree.get(tree.roots()[0]);
    assert_eq!(canvas.name, "Canvas_Home");
    assert!(matches!(
        canvas.payload,
        Payload::Surface { reference_size } if reference_size == Vec2::new(100.0, 50.0)
    ));

    let panel = tree.get(canvas.children[0]);
    assert_eq!(panel.name, "Panel");
    assert_eq!(panel.placement.size, Vec2::new(100.0, 50.0));

    let greeting = tree.get(panel.children[0]);
    assert_eq!(greeting.placement.position, Vec2::new(10.0, -10.0));
    assert_eq!(greeting.placement.size, Vec2::new(80.0, 20.0));
    match &greeting.payload {
        Payload::Text(TextRun {
            content,
            font_size,
            color,
        }) => {
            assert_eq!(content, "Hi");
            assert_eq!(*font_size, 12);
            assert_eq!(*color, Rgba { r: 1.0, g: 1.0, b: 1.0, a: 1.0 });
        }
        other => panic!("expected text payload, got {other:?}"),
    }
}

#[test]
fn traversal_is_document_order_with_one_materialization_per_node() {
    let mut group = node("2:1", "a", NodeType::Group, BoundingBox::new(0.0, 0.0, 10.0, 10.0));
    group.children = vec![node(
        "2:2",
        "a1",
        NodeType::Rectangle,
        BoundingBox::new(1.0, 1.0, 4.0, 4.0),
    )];
    let ellipse = node("2:3", "b", NodeType::Ellipse, BoundingBox::new(5.0, 5.0, 4.0, 4.0));

    let mut frame = node("1:1", "F", NodeType::Frame, BoundingBox::new(0.0, 0.0, 20.0, 20.0));
    frame.children = vec![group, ellipse];
    let doc = Document {
        children: vec![page(vec![frame])],
    };

    let (out, _) = build_doc(&doc);
    assert_eq!(names(&out.tree), vec!["Canvas_F", "Panel", "a", "a1", "b"]);
    assert_eq!(out.stats.materialized, 3);

    let refs: Vec<&str> = out.requests.iter().map(|r| r.image_ref.as_str()).collect();
    assert_eq!(refs, vec!["2:2", "2:3"]);
}

#[test]
fn page_children_that_are_neither_section_nor_frame_are_ignored() {
    // A top-level RECTANGLE or TEXT under a page is dropped silently,
    // requests included.
    let rect = node("1:1", "stray", NodeType::Rectangle, BoundingBox::new(0.0, 0.0, 4.0, 4.0));
    let text = node("1:2", "loose", NodeType::Text, BoundingBox::new(0.0, 0.0, 4.0, 4.0));
    let doc = Document {
        children: vec![page(vec![rect, text])],
    };

    let (out, templates) = build_doc(&doc);
    assert!(out.tree.is_empty());
    assert!(out.requests.is_empty());
    assert!(templates.is_empty());
    assert_eq!(out.stats.materialized, 0);
}

#[test]
fn non_canvas_top_level_nodes_are_skipped() {
    let frame = node("1:1", "F", NodeType::Frame, BoundingBox::new(0.0, 0.0, 20.0, 20.0));
    let doc = Document {
        children: vec![frame],
    };

    let (out, templates) = build_doc(&doc);
    assert_eq!(out.stats.pages, 0);
    assert!(out.tree.is_empty());
    assert!(templates.is_empty());
}

#[test]
fn section_frame_becomes_independent_template_parented_under_section() {
    let card = node("3:1", "Card", NodeType::Frame, BoundingBox::new(20.0, 30.0, 120.0, 80.0));
    let mut section = node("2:1", "Hero", NodeType::Section, BoundingBox::new(0.0, 0.0, 400.0, 300.0));
    section.children = vec![card];
    let doc = Document {
        children: vec![page(vec![section])],
    };

    let (out, templates) = build_doc(&doc);
    assert_eq!(templates, vec![("Canvas_Card".to_string(), 2)]);

    let tree = &out.tree;
    assert_eq!(tree.roots().len(), 1);
    let section_node = tree.get(tree.roots()[0]);
    assert_eq!(section_node.name, "Section_Hero");
    assert_eq!(section_node.placement.size, Vec2::new(400.0, 300.0));
    assert!(matches!(section_node.payload, Payload::Container));

    let canvas = tree.get(section_node.children[0]);
    assert_eq!(canvas.name, "Canvas_Card");
    assert_eq!(canvas.parent, Some(tree.roots()[0]));
}

#[test]
fn section_non_frame_children_recurse_with_section_as_parent() {
    let rect = node("3:1", "chip", NodeType::Rectangle, BoundingBox::new(110.0, 50.0, 8.0, 8.0));
    let mut section = node("2:1", "Hero", NodeType::Section, BoundingBox::new(100.0, 40.0, 400.0, 300.0));
    section.children = vec![rect];
    let doc = Document {
        children: vec![page(vec![section])],
    };

    let (out, _) = build_doc(&doc);
    let tree = &out.tree;
    let section_node = tree.get(tree.roots()[0]);
    let chip = tree.get(section_node.children[0]);
    assert_eq!(chip.name, "chip");
    // SECTION is a plain container, so its anchored origin is subtracted.
    assert_eq!(chip.placement.position, Vec2::new(10.0, -10.0));
    assert_eq!(out.requests.len(), 1);
}

#[test]
fn textless_text_still_descends_into_children() {
    let child = node("4:2", "swatch", NodeType::Rectangle, BoundingBox::new(15.0, 20.0, 4.0, 4.0));
    let mut text = node("4:1", "label", NodeType::Text, BoundingBox::new(10.0, 10.0, 80.0, 20.0));
    text.characters = Some("Hi".to_string());
    text.children = vec![child];

    let mut frame = node("1:1", "F", NodeType::Frame, BoundingBox::new(0.0, 0.0, 100.0, 50.0));
    frame.children = vec![text];
    let doc = Document {
        children: vec![page(vec![frame])],
    };

    let (out, _) = build_doc(&doc);
    assert_eq!(out.stats.textless_text_nodes, 1);
    assert_eq!(out.stats.materialized, 2);

    let tree = &out.tree;
    let panel = tree.get(tree.get(tree.roots()[0]).children[0]);
    let label = tree.get(panel.children[0]);
    assert!(matches!(label.payload, Payload::Container));

    let swatch = tree.get(label.children[0]);
    assert_eq!(swatch.name, "swatch");
    // TEXT parent is a plain container for coordinate purposes.
    assert_eq!(swatch.placement.position, Vec2::new(5.0, -10.0));
    assert_eq!(out.requests.len(), 1);
    assert_eq!(out.requests[0].image_ref, "4:2");
}
