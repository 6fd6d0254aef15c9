//! Collection of in-page link targets.
//!
//! A single pass over the whole tree records every fragment name referenced by
//! a link of the form `<a href="#name">`. The renderer consults the set to
//! decide which `id`/`name` attributes deserve a `<<name>>` target.

use std::collections::HashSet;

use markup5ever_rcdom::Handle;

use super::dom;

/// Collect the fragment names referenced by in-page links under `root`.
///
/// Every descendant is visited, including subtrees the renderer skips.
pub fn collect_fragment_targets(root: &Handle) -> HashSet<String> {
    let mut targets = HashSet::new();
    let mut stack = vec![root.clone()];

    while let Some(node) = stack.pop() {
        if dom::tag_name(&node) == Some("a") {
            if let Some(name) = dom::attr(&node, "href").as_deref().and_then(fragment_name) {
                targets.insert(name.to_string());
            }
        }
        stack.extend(node.children.borrow().iter().cloned());
    }

    log::trace!("collected {} fragment targets", targets.len());
    targets
}

/// The fragment name of a bare `#name` reference.
pub(crate) fn fragment_name(href: &str) -> Option<&str> {
    href.strip_prefix('#').filter(|name| !name.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::parse_html;

    #[test]
    fn collects_referenced_fragments() {
        let dom = parse_html(r##"<a href="#intro">Intro</a><p><a href="#usage">Usage</a></p><a href="/x#no">x</a>"##);
        let targets = collect_fragment_targets(&dom.document);
        assert_eq!(targets.len(), 2);
        assert!(targets.contains("intro"));
        assert!(targets.contains("usage"));
    }

    #[test]
    fn ignores_empty_fragments_and_non_links() {
        let dom = parse_html(r##"<a href="#">top</a><div data-href="#fake"></div><area href="#area">"##);
        assert!(collect_fragment_targets(&dom.document).is_empty());
    }

    #[test]
    fn visits_nested_content() {
        let dom = parse_html(r##"<table><tr><td><ul><li><a href="#deep">deep</a></li></ul></td></tr></table>"##);
        let targets = collect_fragment_targets(&dom.document);
        assert!(targets.contains("deep"));
    }

    #[test]
    fn fragment_name_requires_a_name() {
        assert_eq!(fragment_name("#a"), Some("a"));
        assert_eq!(fragment_name("#"), None);
        assert_eq!(fragment_name("a#b"), None);
    }
}
