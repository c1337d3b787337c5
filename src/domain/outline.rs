//! Heading outline of a markdown document, used for tables of contents.

use comrak::{
    Arena,
    nodes::{AstNode, NodeValue},
    options::Options,
    parse_document,
};
use serde::Serialize;

use crate::domain::slug::AnchorSlugger;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineHeading {
    pub level: u8,
    pub title: String,
    pub anchor: String,
}

/// Collect headings (levels 1–6) in document order with unique anchors.
pub fn extract_outline(markdown: &str) -> Vec<OutlineHeading> {
    let arena = Arena::new();
    let options = Options::default();
    let root = parse_document(&arena, markdown, &options);

    let mut slugger = AnchorSlugger::new();
    let mut headings = Vec::new();

    for node in root.descendants() {
        let Some(level) = heading_level(node) else {
            continue;
        };

        let text = collect_inline_text(node);
        let title = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if title.is_empty() {
            continue;
        }

        let anchor = slugger
            .anchor_for(&title)
            .unwrap_or_else(|_| format!("section-{}", headings.len() + 1));

        headings.push(OutlineHeading {
            level,
            title,
            anchor,
        });
    }

    headings
}

fn heading_level(node: &AstNode<'_>) -> Option<u8> {
    let data = node.data.borrow();
    if let NodeValue::Heading(heading) = &data.value {
        Some(heading.level)
    } else {
        None
    }
}

fn collect_inline_text(node: &AstNode<'_>) -> String {
    fn walk(node: &AstNode<'_>, buffer: &mut String) {
        {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Text(text) => buffer.push_str(text),
                NodeValue::Code(code) => buffer.push_str(&code.literal),
                NodeValue::LineBreak | NodeValue::SoftBreak => buffer.push(' '),
                _ => {}
            }
        }
        let mut child = node.first_child();
        while let Some(next) = child {
            walk(next, buffer);
            child = next.next_sibling();
        }
    }

    let mut text = String::new();
    let mut child = node.first_child();
    while let Some(next) = child {
        walk(next, &mut text);
        child = next.next_sibling();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn outline_lists_headings_in_order() {
        let markdown = "# Intro\n\nText.\n\n## Setup `cargo`\n\n```\n# not a heading\n```\n\n### Intro\n";
        let outline = extract_outline(markdown);

        assert_eq!(
            outline,
            vec![
                OutlineHeading {
                    level: 1,
                    title: "Intro".into(),
                    anchor: "intro".into(),
                },
                OutlineHeading {
                    level: 2,
                    title: "Setup cargo".into(),
                    anchor: "setup-cargo".into(),
                },
                OutlineHeading {
                    level: 3,
                    title: "Intro".into(),
                    anchor: "intro-2".into(),
                },
            ]
        );
    }

    #[test]
    fn outline_of_plain_text_is_empty() {
        assert!(extract_outline("just a paragraph").is_empty());
        assert!(extract_outline("").is_empty());
    }
}
