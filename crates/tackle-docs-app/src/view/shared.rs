//! Building blocks shared by the documentation pages.

use crate::config::SiteConfig;
use crate::view::{el, Element, Node};

/// Render a code listing, one numbered `pre` per line.
///
/// Lines containing `// ` are flagged as comments.
pub fn lined_mockup_code(code: &str) -> Node {
    let lines = code.split('\n').enumerate().map(|(i, line)| {
        el("pre")
            .attr("data-prefix", (i + 1).to_string())
            .class_if(line.contains("// "), "text-warning")
            .child(el("code").text(line))
    });

    el("div").class("mockup-code").children(lines).into()
}

/// Code listing beside a live-rendered example.
pub fn coded_view(title: &str, code: &str, example: Node) -> Node {
    coded_layout(
        title,
        vec![
            code_column(code),
            divider(),
            el("div").class("grid flex-1").child(example),
        ],
    )
}

/// Code listing beside a picture of its result.
pub fn coded_with_picture_view(title: &str, code: &str, image_src: &str) -> Node {
    coded_layout(
        title,
        vec![
            code_column(code),
            divider(),
            el("div")
                .class("grid flex-1")
                .child(el("img").attr("src", image_src)),
        ],
    )
}

/// Code listing beside a second listing showing its output.
pub fn coded_with_text_example_view(title: &str, code: &str, example: &str) -> Node {
    coded_layout(
        title,
        vec![code_column(code), divider(), code_column(example)],
    )
}

/// Code listing on its own.
pub fn coded_no_example_view(title: &str, code: &str) -> Node {
    coded_layout(title, vec![code_column(code)])
}

/// Link to the source of a documentation page.
pub fn fix_docs_view(file_name: &str, site: &SiteConfig) -> Node {
    el("div")
        .child(
            el("a")
                .attr("href", site.source_url(file_name))
                .text(format!("Fix docs file {} here", file_name)),
        )
        .into()
}

fn coded_layout(title: &str, columns: Vec<Element>) -> Node {
    el("div")
        .class("mb-10")
        .child(el("div").class("description").text(title))
        .child(el("div").class("flex flex-row w-full").children(columns))
        .into()
}

fn code_column(code: &str) -> Element {
    el("div")
        .class("grid flex-1 h-full")
        .child(lined_mockup_code(code))
}

fn divider() -> Element {
    el("div")
        .class("divider")
        .class("divider-horizontal")
        .class("text-neutral")
        .class("after:bg-opacity-30 before:bg-opacity-30")
        .text("👉")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(node: &Node) -> &Element {
        match node {
            Node::Element(e) => e,
            other => panic!("expected element, got {:?}", other),
        }
    }

    #[test]
    fn numbers_lines_from_one() {
        let node = lined_mockup_code("let a = 1\nlet b = 2");
        let block = element(&node);

        assert_eq!(block.get_attr("class"), Some("mockup-code"));
        assert_eq!(block.children.len(), 2);
        assert_eq!(element(&block.children[0]).get_attr("data-prefix"), Some("1"));
        assert_eq!(element(&block.children[1]).get_attr("data-prefix"), Some("2"));
    }

    #[test]
    fn flags_comment_lines() {
        let node = lined_mockup_code("let a = 1\n// a comment\nlet url = \"http://x\"");
        let block = element(&node);

        assert_eq!(element(&block.children[0]).get_attr("class"), None);
        assert_eq!(
            element(&block.children[1]).get_attr("class"),
            Some("text-warning")
        );
        // "//" without a trailing space is not a comment marker
        assert_eq!(element(&block.children[2]).get_attr("class"), None);
    }

    #[test]
    fn keeps_leading_empty_line() {
        let node = lined_mockup_code("\nopen AzureTackle");
        assert_eq!(element(&node).children.len(), 2);
    }

    #[test]
    fn coded_view_has_code_divider_and_example() {
        let node = coded_view("Title", "x", Node::Text("example".to_string()));
        let html = node.render();

        assert!(html.contains(r#"<div class="description">Title</div>"#));
        assert!(html.contains("mockup-code"));
        assert!(html.contains("divider-horizontal"));
        assert!(html.contains("example"));
    }

    #[test]
    fn picture_view_embeds_image() {
        let html = coded_with_picture_view("T", "x", "/chart.png").render();
        assert!(html.contains(r#"<img src="/chart.png">"#));
    }

    #[test]
    fn text_example_view_has_two_listings() {
        let html = coded_with_text_example_view("T", "input", "output").render();
        assert_eq!(html.matches("mockup-code").count(), 2);
    }

    #[test]
    fn no_example_view_has_no_divider() {
        let html = coded_no_example_view("T", "x").render();
        assert!(!html.contains("divider"));
    }

    #[test]
    fn fix_docs_links_to_source() {
        let html = fix_docs_view("QueryTable", &SiteConfig::default()).render();
        assert!(html.contains("Fix docs file QueryTable here"));
        assert!(html.contains("/blob/main/src/Docs/Pages/QueryTable.fs"));
    }
}
