use std::io;

use html5ever::interface::{Attribute, QualName};
use html5ever::parse_document;
use html5ever::serialize::{serialize, SerializeOpts};
use html5ever::tendril::{format_tendril, TendrilSink};
use html5ever::tree_builder::{create_element, NodeOrText, TreeSink};
use html5ever::{namespace_url, ns, LocalName};
use markup5ever_rcdom::{Handle, NodeData, RcDom, SerializableHandle};

pub fn html_to_dom(html: &str) -> io::Result<RcDom> {
    parse_document(RcDom::default(), Default::default())
        .from_utf8()
        .read_from(&mut html.as_bytes())
}

pub fn serialize_dom(dom: &RcDom) -> io::Result<String> {
    let mut buf: Vec<u8> = Vec::new();
    let serializable: SerializableHandle = dom.document.clone().into();
    serialize(&mut buf, &serializable, SerializeOpts::default())?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn get_node_name(node: &Handle) -> Option<&'_ str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(name.local.as_ref()),
        _ => None,
    }
}

pub fn get_node_attr(node: &Handle, attr_name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|attr| &*attr.name.local == attr_name)
            .map(|attr| attr.value.to_string()),
        _ => None,
    }
}

pub fn has_class(node: &Handle, class_name: &str) -> bool {
    get_node_attr(node, "class")
        .map(|classes| classes.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

/// First descendant (document order, `node` excluded) carrying `class_name`.
pub fn find_first_by_class(node: &Handle, class_name: &str) -> Option<Handle> {
    for child in node.children.borrow().iter() {
        if has_class(child, class_name) {
            return Some(child.clone());
        }
        if let Some(found) = find_first_by_class(child, class_name) {
            return Some(found);
        }
    }
    None
}

pub fn find_all_by_class(node: &Handle, class_name: &str) -> Vec<Handle> {
    let mut found_nodes = Vec::new();

    for child in node.children.borrow().iter() {
        if has_class(child, class_name) {
            found_nodes.push(child.clone());
        }
        found_nodes.append(&mut find_all_by_class(child, class_name));
    }

    found_nodes
}

/// Last descendant element named `node_name`, in document order.
pub fn find_last_by_name(node: &Handle, node_name: &str) -> Option<Handle> {
    let mut last = None;

    for child in node.children.borrow().iter() {
        if get_node_name(child) == Some(node_name) {
            last = Some(child.clone());
        }
        if let Some(found) = find_last_by_name(child, node_name) {
            last = Some(found);
        }
    }

    last
}

pub fn text_content(node: &Handle) -> String {
    let mut text = String::new();
    collect_text(node, &mut text);
    text
}

fn collect_text(node: &Handle, text: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        text.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, text);
    }
}

pub fn new_element(dom: &RcDom, node_name: &str, class_name: Option<&str>) -> Handle {
    let attrs = class_name
        .map(|class_name| {
            vec![Attribute {
                name: QualName::new(None, ns!(), LocalName::from("class")),
                value: format_tendril!("{}", class_name),
            }]
        })
        .unwrap_or_default();

    create_element(
        dom,
        QualName::new(None, ns!(), LocalName::from(node_name)),
        attrs,
    )
}

pub fn append_node(dom: &RcDom, parent: &Handle, child: &Handle) {
    dom.append(parent, NodeOrText::AppendNode(child.clone()));
}

pub fn append_text(dom: &RcDom, parent: &Handle, text: &str) {
    dom.append(parent, NodeOrText::AppendText(format_tendril!("{}", text)));
}

pub fn insert_before(dom: &RcDom, sibling: &Handle, node: &Handle) {
    dom.append_before_sibling(sibling, NodeOrText::AppendNode(node.clone()));
}

pub fn remove_node(dom: &RcDom, node: &Handle) {
    dom.remove_from_parent(node);
}

/// Replaces all children of `node` with a single text node.
pub fn set_text(dom: &RcDom, node: &Handle, text: &str) {
    let children: Vec<Handle> = node.children.borrow().clone();
    for child in children.iter() {
        dom.remove_from_parent(child);
    }
    append_text(dom, node, text);
}
