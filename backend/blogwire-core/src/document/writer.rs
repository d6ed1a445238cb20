use crate::document::{Element, Node, ns};

use quick_xml::escape::escape;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Namespace bindings visible at some point of the output.
#[derive(Debug, Clone, Default)]
struct Scope {
    default: Option<String>,
    /// `(namespace, prefix)`
    prefixes: Vec<(String, String)>,
}

impl Scope {
    fn prefix_for(&self, namespace: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .rev()
            .find(|(n, _)| n == namespace)
            .map(|(_, p)| p.as_str())
    }

    fn bind(&mut self, namespace: &str) -> String {
        let base = preferred_prefix(namespace);
        let mut prefix = base.to_string();
        let mut n = 1;
        while self.prefixes.iter().any(|(_, p)| *p == prefix) {
            prefix = format!("{base}{n}");
            n += 1;
        }
        self.prefixes.push((namespace.to_string(), prefix.clone()));
        prefix
    }
}

fn preferred_prefix(namespace: &str) -> &'static str {
    match namespace {
        ns::ATOM_10 | ns::ATOM_03 => "atom",
        ns::APP_10 | ns::APP_DRAFT | ns::APP_03 => "app",
        ns::DC => "dc",
        ns::XHTML => "xhtml",
        _ => "ns",
    }
}

pub(super) fn write_document(root: &Element) -> String {
    // Root namespace goes default; everything else is bound once on the root.
    let mut scope = Scope {
        default: None,
        prefixes: Vec::new(),
    };
    let mut declarations = Vec::new();
    if let Some(root_ns) = &root.ns {
        scope.default = Some(root_ns.clone());
        declarations.push(("xmlns".to_string(), root_ns.clone()));
    }

    let mut used = Vec::new();
    collect_namespaces(root, &mut used);
    for namespace in used {
        let element_only = scope.default.as_deref() == Some(namespace.as_str())
            && !attr_uses_namespace(root, &namespace);
        if element_only || scope.prefix_for(&namespace).is_some() {
            continue;
        }
        let prefix = scope.bind(&namespace);
        declarations.push((format!("xmlns:{prefix}"), namespace));
    }

    let mut out = String::from(XML_DECLARATION);
    write_element(root, &scope, declarations, &mut out);
    out
}

pub(super) fn write_children(parent: &Element) -> String {
    let scope = Scope {
        default: parent.ns.clone(),
        prefixes: Vec::new(),
    };
    let mut out = String::new();
    for node in &parent.children {
        write_node(node, &scope, &mut out);
    }
    out
}

fn write_node(node: &Node, scope: &Scope, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&escape(text.as_str())),
        Node::Element(element) => write_element(element, scope, Vec::new(), out),
    }
}

fn write_element(
    element: &Element,
    parent: &Scope,
    mut declarations: Vec<(String, String)>,
    out: &mut String,
) {
    let mut scope = parent.clone();

    let qname = match element.ns.as_deref() {
        None => {
            if scope.default.is_some() {
                declarations.push(("xmlns".to_string(), String::new()));
                scope.default = None;
            }
            element.name.clone()
        }
        Some(namespace) if scope.default.as_deref() == Some(namespace) => element.name.clone(),
        Some(namespace) => match scope.prefix_for(namespace) {
            Some(prefix) => format!("{prefix}:{}", element.name),
            None => {
                declarations.push(("xmlns".to_string(), namespace.to_string()));
                scope.default = Some(namespace.to_string());
                element.name.clone()
            }
        },
    };

    let mut attributes = Vec::with_capacity(element.attrs.len());
    for attr in &element.attrs {
        let name = match attr.ns.as_deref() {
            None => attr.name.clone(),
            Some(namespace) => {
                let prefix = match scope.prefix_for(namespace) {
                    Some(prefix) => prefix.to_string(),
                    None => {
                        let prefix = scope.bind(namespace);
                        declarations.push((format!("xmlns:{prefix}"), namespace.to_string()));
                        prefix
                    }
                };
                format!("{prefix}:{}", attr.name)
            }
        };
        attributes.push((name, attr.value.as_str()));
    }

    out.push('<');
    out.push_str(&qname);
    for (name, value) in &declarations {
        push_attribute(out, name, value);
    }
    for (name, value) in attributes {
        push_attribute(out, &name, value);
    }

    if element.children.is_empty() {
        out.push_str("/>");
        return;
    }

    out.push('>');
    for node in &element.children {
        write_node(node, &scope, out);
    }
    out.push_str("</");
    out.push_str(&qname);
    out.push('>');
}

fn push_attribute(out: &mut String, name: &str, value: &str) {
    out.push(' ');
    out.push_str(name);
    out.push_str("=\"");
    out.push_str(&escape(value));
    out.push('"');
}

fn collect_namespaces(element: &Element, used: &mut Vec<String>) {
    let names = element
        .ns
        .iter()
        .chain(element.attrs.iter().filter_map(|a| a.ns.as_ref()));
    for namespace in names {
        if !used.contains(namespace) {
            used.push(namespace.clone());
        }
    }
    for child in element.elements() {
        collect_namespaces(child, used);
    }
}

fn attr_uses_namespace(element: &Element, namespace: &str) -> bool {
    element.attrs.iter().any(|a| a.ns.as_deref() == Some(namespace))
        || element.elements().any(|c| attr_uses_namespace(c, namespace))
}
