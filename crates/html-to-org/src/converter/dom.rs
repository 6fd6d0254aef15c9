//! Small accessors over the `markup5ever_rcdom` tree.

use markup5ever_rcdom::{Handle, NodeData};

/// Local tag name of an element node.
pub(crate) fn tag_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

/// Value of attribute `key`, or `None` when absent.
pub(crate) fn attr(handle: &Handle, key: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attribute| &*attribute.name.local == key)
            .map(|attribute| attribute.value.to_string()),
        _ => None,
    }
}

/// Value of attribute `key`, or the empty string when absent.
pub(crate) fn attr_or_empty(handle: &Handle, key: &str) -> String {
    attr(handle, key).unwrap_or_default()
}

/// Contents of a text node.
pub(crate) fn text_contents(handle: &Handle) -> Option<String> {
    match &handle.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

/// Space-separated classes of the element.
pub(crate) fn classes(handle: &Handle) -> Vec<String> {
    attr(handle, "class")
        .map(|value| value.split_ascii_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Is any descendant of `handle` an element matching `predicate`?
pub(crate) fn any_descendant(handle: &Handle, predicate: &dyn Fn(&str) -> bool) -> bool {
    let mut stack: Vec<Handle> = handle.children.borrow().iter().cloned().collect();
    while let Some(node) = stack.pop() {
        if tag_name(&node).is_some_and(predicate) {
            return true;
        }
        stack.extend(node.children.borrow().iter().cloned());
    }
    false
}

/// Concatenated text of every text node under `handle`, in document order.
pub(crate) fn deep_text(handle: &Handle) -> String {
    let mut out = String::new();
    let mut stack = vec![handle.clone()];
    while let Some(node) = stack.pop() {
        if let NodeData::Text { contents } = &node.data {
            out.push_str(&contents.borrow());
        }
        stack.extend(node.children.borrow().iter().rev().cloned());
    }
    out
}
