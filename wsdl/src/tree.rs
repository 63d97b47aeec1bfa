use quick_xml::{
    events::{BytesStart, Event},
    Reader,
};
use std::io::BufRead;

use super::{
    error::ParseError,
    namespaces::{Namespace, Namespaces},
};

/// An element of a loaded document. Children keep document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub namespace: Namespace,
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Element>,
}

impl Element {
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn is(&self, namespace: &Namespace, name: &str) -> bool {
        self.namespace == *namespace && self.name == name
    }

    pub fn children<'a>(
        &'a self,
        namespace: &Namespace,
        name: &'a str,
    ) -> impl Iterator<Item = &'a Element> + 'a {
        let namespace = namespace.clone();
        self.children
            .iter()
            .filter(move |child| child.is(&namespace, name))
    }

    pub fn child(&self, namespace: &Namespace, name: &str) -> Option<&Element> {
        self.children.iter().find(|child| child.is(namespace, name))
    }

    /// Every matching element below this one, in document order. The element
    /// itself is never included.
    pub fn descendants<'a>(&'a self, namespace: &Namespace, name: &str) -> Vec<&'a Element> {
        let mut found = Vec::new();
        self.collect_descendants(namespace, name, &mut found);
        found
    }

    pub fn descendant(&self, namespace: &Namespace, name: &str) -> Option<&Element> {
        self.children.iter().find_map(|child| {
            if child.is(namespace, name) {
                Some(child)
            } else {
                child.descendant(namespace, name)
            }
        })
    }

    fn collect_descendants<'a>(
        &'a self,
        namespace: &Namespace,
        name: &str,
        found: &mut Vec<&'a Element>,
    ) {
        for child in &self.children {
            if child.is(namespace, name) {
                found.push(child);
            }
            child.collect_descendants(namespace, name, found);
        }
    }

    /// Indented listing of this element and everything below it, one element
    /// per line.
    pub fn outline(&self, namespaces: &Namespaces) -> String {
        let mut out = String::new();
        self.write_outline(namespaces, 0, &mut out);
        out
    }

    fn write_outline(&self, namespaces: &Namespaces, level: usize, out: &mut String) {
        let tag = match namespaces.uri(&self.namespace) {
            Some(uri) => format!("{{{}}}{}", uri, self.name),
            None => self.name.clone(),
        };

        out.push_str(&"  ".repeat(level));
        out.push_str("- ");
        out.push_str(&tag);
        if !self.attributes.is_empty() {
            let attributes = self
                .attributes
                .iter()
                .map(|(key, value)| format!("{}=\"{}\"", key, value))
                .collect::<Vec<_>>()
                .join(" ");
            out.push_str(&format!(" [{}]", attributes));
        }
        out.push('\n');

        for child in &self.children {
            child.write_outline(namespaces, level + 1, out);
        }
    }
}

fn to_element<B: BufRead>(
    reader: &Reader<B>,
    namespaces: &Namespaces,
    namespace: Option<&[u8]>,
    start: &BytesStart<'_>,
) -> Result<Element, ParseError> {
    let namespace = match namespace {
        Some(namespace) => Some(reader.decode(namespace)?),
        None => None,
    };

    let mut attributes = Vec::new();
    for attribute in start.attributes() {
        let attribute = attribute?;
        let key = reader.decode(attribute.key)?.to_owned();
        let value = attribute.unescape_and_decode_value(reader)?;
        attributes.push((key, value));
    }

    Ok(Element {
        namespace: namespaces.classify(namespace),
        name: reader.decode(start.local_name())?.to_owned(),
        attributes,
        children: Vec::new(),
    })
}

fn attach(
    stack: &mut Vec<Element>,
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(ParseError::TrailingContent),
    }

    Ok(())
}

/// Parses `bytes` into an element tree, classifying every element namespace
/// against `namespaces`.
pub fn load(bytes: &[u8], namespaces: &Namespaces) -> Result<Element, ParseError> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);

    let mut stack: Vec<Element> = Vec::new();
    let mut root = None;
    let mut buffer = Vec::new();
    let mut namespace_buffer = Vec::new();

    loop {
        let (namespace, event) =
            reader.read_namespaced_event(&mut buffer, &mut namespace_buffer)?;

        match event {
            Event::Start(start) => {
                let element = to_element(&reader, namespaces, namespace, &start)?;
                if stack.is_empty() && root.is_some() {
                    return Err(ParseError::TrailingContent);
                }
                stack.push(element);
            }

            Event::Empty(start) => {
                let element = to_element(&reader, namespaces, namespace, &start)?;
                attach(&mut stack, &mut root, element)?;
            }

            Event::End(..) => match stack.pop() {
                Some(element) => attach(&mut stack, &mut root, element)?,
                None => return Err(ParseError::TrailingContent),
            },

            Event::Eof => break,

            _ => (),
        }

        buffer.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::UnclosedElement(open.name));
    }

    root.ok_or(ParseError::MissingRoot)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOCUMENT: &str = r#"<?xml version="1.0"?>
        <wsdl:definitions name="Calc"
            xmlns:wsdl="http://schemas.xmlsoap.org/wsdl/"
            xmlns:xsd="http://www.w3.org/2001/XMLSchema">
          <wsdl:types>
            <xsd:schema targetNamespace="urn:calc">
              <xsd:element name="a"/>
              <xsd:complexType name="T">
                <xsd:sequence><xsd:element name="b" type="xsd:int"/></xsd:sequence>
              </xsd:complexType>
            </xsd:schema>
          </wsdl:types>
          <wsdl:message name="M"/>
          <message name="Unqualified"/>
        </wsdl:definitions>"#;

    fn load_document() -> Element {
        load(DOCUMENT.as_bytes(), &Namespaces::STANDARD).unwrap()
    }

    #[test]
    fn resolves_prefixed_names_to_namespaces() {
        let root = load_document();

        assert!(root.is(&Namespace::Wsdl, "definitions"));
        assert_eq!(root.attribute("name"), Some("Calc"));
        assert_eq!(root.children(&Namespace::Wsdl, "message").count(), 1);
        assert!(root.child(&Namespace::None, "message").is_some());
    }

    #[test]
    fn descendants_are_in_document_order() {
        let root = load_document();
        let names = root
            .descendants(&Namespace::Schema, "element")
            .into_iter()
            .filter_map(|element| element.attribute("name"))
            .collect::<Vec<_>>();

        assert_eq!(names, ["a", "b"]);
        assert!(root.descendants(&Namespace::Wsdl, "definitions").is_empty());
    }

    #[test]
    fn default_namespace_applies_to_unprefixed_elements() {
        let document = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"><service name="S"/></definitions>"#;
        let root = load(document.as_bytes(), &Namespaces::STANDARD).unwrap();

        assert!(root.child(&Namespace::Wsdl, "service").is_some());
    }

    #[test]
    fn mismatched_end_tag_is_an_error() {
        let document = r#"<definitions><message name="A"></definitions>"#;

        assert!(load(document.as_bytes(), &Namespaces::STANDARD).is_err());
    }

    #[test]
    fn unclosed_root_is_an_error() {
        let document = r#"<definitions><message name="A"/>"#;

        assert!(load(document.as_bytes(), &Namespaces::STANDARD).is_err());
    }

    #[test]
    fn empty_input_has_no_root() {
        assert!(matches!(
            load(b"", &Namespaces::STANDARD),
            Err(ParseError::MissingRoot)
        ));
    }

    #[test]
    fn second_root_is_rejected() {
        assert!(matches!(
            load(b"<a/><b/>", &Namespaces::STANDARD),
            Err(ParseError::TrailingContent)
        ));
    }

    #[test]
    fn outline_indents_children() {
        let root = load(b"<a x=\"1\"><b/></a>", &Namespaces::STANDARD).unwrap();

        assert_eq!(root.outline(&Namespaces::STANDARD), "- a [x=\"1\"]\n  - b\n");
    }

    #[test]
    fn outline_names_namespaces() {
        let document = r#"<definitions xmlns="http://schemas.xmlsoap.org/wsdl/"><message name="M"/></definitions>"#;
        let root = load(document.as_bytes(), &Namespaces::STANDARD).unwrap();

        assert_eq!(
            root.outline(&Namespaces::STANDARD),
            "- {http://schemas.xmlsoap.org/wsdl/}definitions\n  \
             - {http://schemas.xmlsoap.org/wsdl/}message [name=\"M\"]\n"
        );
    }
}
