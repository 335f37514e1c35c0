//! Minimal DOM for generated SQL map documents.
//!
//! Elements own their children exclusively, so moving a node from one parent to another
//! is a plain move. Text spans share their content through an `Arc<str>`; cloning a
//! [`TextElement`] re-attaches the same span rather than copying it.

use std::sync::Arc;

/// DOCTYPE identifiers of a MyBatis 3 mapper document.
pub const MAPPER_PUBLIC_ID: &str = "-//mybatis.org//DTD Mapper 3.0//EN";
pub const MAPPER_SYSTEM_ID: &str = "http://mybatis.org/dtd/mybatis-3-mapper.dtd";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A literal text span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextElement {
    content: Arc<str>,
}

impl TextElement {
    pub fn new(content: impl Into<Arc<str>>) -> Self {
        Self {
            content: content.into(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns `true` if both handles point at the same span.
    pub fn same_span(&self, other: &TextElement) -> bool {
        Arc::ptr_eq(&self.content, &other.content)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(TextElement),
}

impl XmlNode {
    pub fn as_element(&self) -> Option<&XmlElement> {
        match self {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&TextElement> {
        match self {
            XmlNode::Text(t) => Some(t),
            XmlNode::Element(_) => None,
        }
    }
}

impl From<XmlElement> for XmlNode {
    fn from(e: XmlElement) -> Self {
        XmlNode::Element(e)
    }
}

impl From<TextElement> for XmlNode {
    fn from(t: TextElement) -> Self {
        XmlNode::Text(t)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub children: Vec<XmlNode>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder-style [`XmlElement::add_attribute`].
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_attribute(name, value);
        self
    }

    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.push(Attribute::new(name, value));
    }

    /// Value of the last attribute named `name`, if any.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .rev()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    pub fn add_element(&mut self, element: XmlElement) {
        self.children.push(XmlNode::Element(element));
    }

    pub fn add_text(&mut self, content: impl Into<Arc<str>>) {
        self.children.push(XmlNode::Text(TextElement::new(content)));
    }

    pub fn add_node(&mut self, node: impl Into<XmlNode>) {
        self.children.push(node.into());
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &XmlElement> {
        self.children.iter().filter_map(XmlNode::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut XmlElement> {
        self.children.iter_mut().filter_map(|n| match n {
            XmlNode::Element(e) => Some(e),
            XmlNode::Text(_) => None,
        })
    }

    /// Direct child elements whose tag equals `tag`, ignoring ASCII case.
    pub fn find_children(&self, tag: &str) -> Vec<&XmlElement> {
        self.child_elements()
            .filter(|e| e.name.eq_ignore_ascii_case(tag))
            .collect()
    }

    /// Renders this element and its subtree at the given indentation level.
    pub fn formatted_content(&self, indent: usize) -> String {
        let mut out = String::new();
        write_element(&mut out, self, indent);
        out
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub public_id: Option<String>,
    pub system_id: Option<String>,
    pub root: XmlElement,
}

impl Document {
    pub fn new(root: XmlElement) -> Self {
        Self {
            public_id: None,
            system_id: None,
            root,
        }
    }

    /// A `<mapper>` document carrying the MyBatis 3 DOCTYPE.
    pub fn mapper(root: XmlElement) -> Self {
        Self {
            public_id: Some(MAPPER_PUBLIC_ID.to_string()),
            system_id: Some(MAPPER_SYSTEM_ID.to_string()),
            root,
        }
    }

    /// Top-level statement whose `id` attribute equals `id` exactly.
    pub fn statement(&self, id: &str) -> Option<&XmlElement> {
        self.root
            .child_elements()
            .find(|e| e.attribute("id") == Some(id))
    }

    pub fn formatted_content(&self) -> String {
        let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        match (&self.public_id, &self.system_id) {
            (Some(public_id), Some(system_id)) => {
                out.push_str(&format!(
                    "<!DOCTYPE {} PUBLIC \"{public_id}\" \"{system_id}\">\n",
                    self.root.name
                ));
            }
            (None, Some(system_id)) => {
                out.push_str(&format!(
                    "<!DOCTYPE {} SYSTEM \"{system_id}\">\n",
                    self.root.name
                ));
            }
            _ => {}
        }
        write_element(&mut out, &self.root, 0);
        out
    }
}

fn write_indent(out: &mut String, indent: usize) {
    for _ in 0..indent {
        out.push_str("  ");
    }
}

fn write_element(out: &mut String, e: &XmlElement, indent: usize) {
    write_indent(out, indent);
    out.push('<');
    out.push_str(&e.name);
    for a in &e.attributes {
        out.push_str(&format!(" {}=\"{}\"", a.name, escape(&a.value, true)));
    }

    if e.children.is_empty() {
        out.push_str(" />\n");
        return;
    }
    out.push_str(">\n");

    for child in &e.children {
        match child {
            XmlNode::Element(c) => write_element(out, c, indent + 1),
            XmlNode::Text(t) => {
                for line in t.content().lines() {
                    write_indent(out, indent + 1);
                    out.push_str(&escape(line, false));
                    out.push('\n');
                }
            }
        }
    }

    write_indent(out, indent);
    out.push_str(&format!("</{}>\n", e.name));
}

fn escape(s: &str, attribute: bool) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_children_ignores_case() {
        let mut insert = XmlElement::new("insert");
        insert.add_text("insert into t");
        insert.add_element(XmlElement::new("trim"));
        insert.add_element(XmlElement::new("TRIM"));
        insert.add_element(XmlElement::new("if"));

        assert_eq!(insert.find_children("trim").len(), 2);
        assert_eq!(insert.find_children("where").len(), 0);
    }

    #[test]
    fn cloned_text_keeps_the_same_span() {
        let t = TextElement::new("id,");
        let again = t.clone();
        assert!(t.same_span(&again));
        assert!(!t.same_span(&TextElement::new("id,")));
    }

    #[test]
    fn renders_nested_elements_and_escapes() {
        let mut when = XmlElement::new("if").with_attribute("test", "a != null && b < 1");
        when.add_text("a = #{a},");
        let mut root = XmlElement::new("mapper").with_attribute("namespace", "x.Y");
        root.add_element(when);
        root.add_element(XmlElement::new("sql").with_attribute("id", "empty"));

        let doc = Document::mapper(root);
        let rendered = doc.formatted_content();

        assert!(rendered.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n"));
        assert!(rendered.contains(
            "<!DOCTYPE mapper PUBLIC \"-//mybatis.org//DTD Mapper 3.0//EN\" \"http://mybatis.org/dtd/mybatis-3-mapper.dtd\">"
        ));
        assert!(rendered.contains("  <if test=\"a != null &amp;&amp; b &lt; 1\">\n    a = #{a},\n  </if>\n"));
        assert!(rendered.contains("  <sql id=\"empty\" />\n"));
        assert!(rendered.ends_with("</mapper>\n"));
    }

    #[test]
    fn statement_lookup_is_case_sensitive() {
        let mut root = XmlElement::new("mapper");
        root.add_element(XmlElement::new("insert").with_attribute("id", "insertSelective"));
        let doc = Document::new(root);

        assert!(doc.statement("insertSelective").is_some());
        assert!(doc.statement("InsertSelective").is_none());
    }
}
