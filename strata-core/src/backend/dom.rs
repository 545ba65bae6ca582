//! Flat DOM output.
//!
//! Elements are stored as an opening node, attribute nodes, body nodes and
//! a closing node, all in one ordered list. [`DomOutput::to_html`] turns
//! that list back into markup. Anchors serialize to nothing; the
//! placeholder of an empty dynamic range serializes as an empty comment.

use crate::error::Result;
use crate::reactive::Var;
use crate::region::{CursorAdapter, RegionAppender};
use crate::update::BoxedUpdater;

use super::list::{Document, ListAppender, ListCursor, ListRange, OutputNode, SharedDocument};

/// A node in a DOM document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    Text(String),
    Comment,
    Open(String),
    Attr { name: String, value: String },
    Close(String),
    Anchor,
}

impl OutputNode for DomNode {
    type Atom = Var<String>;

    fn anchor() -> Self {
        DomNode::Anchor
    }

    fn placeholder() -> Self {
        DomNode::Comment
    }

    fn append(appender: &mut ListAppender<Self>, text: Var<String>) -> Result<Option<BoxedUpdater>> {
        appender.push_var(text, |text: &String| DomNode::Text(text.clone()))
    }
}

/// Appender type for DOM output.
pub type DomAppender = ListAppender<DomNode>;

/// An attribute written in an element's head.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub name: String,
    pub value: Var<String>,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<Var<String>>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Adapter that opens an element, takes attributes, then children.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl CursorAdapter<DomAppender> for Element {
    type Child = DomAppender;
    type Head = Attribute;

    fn child(&self, parent: &mut DomAppender) -> Result<DomAppender> {
        parent.push(DomNode::Open(self.tag.clone()))?;
        Ok(ListAppender::nested(parent.cursor()))
    }

    fn head(&self, child: &mut DomAppender, head: Attribute) -> Result<Option<BoxedUpdater>> {
        let Attribute { name, value } = head;
        child.push_var(value, move |value: &String| DomNode::Attr {
            name: name.clone(),
            value: value.clone(),
        })
    }

    fn flush(&self, parent: &mut DomAppender, _child: ListRange<DomNode>) -> Result<()> {
        parent.push(DomNode::Close(self.tag.clone()))?;
        Ok(())
    }
}

/// A document that programs render markup into.
#[derive(Debug, Default)]
pub struct DomOutput {
    doc: SharedDocument<DomNode>,
}

impl DomOutput {
    pub fn new() -> Self {
        Self {
            doc: Document::shared(),
        }
    }

    /// Cursor at the end of the document.
    pub fn cursor(&self) -> ListCursor<DomNode> {
        ListCursor::end_of(&self.doc)
    }

    pub fn clears(&self) -> usize {
        self.doc.borrow().clears()
    }

    pub fn writes(&self) -> usize {
        self.doc.borrow().writes()
    }

    /// Serialize the document.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let mut tag_open = false;

        for node in self.doc.borrow().nodes() {
            if let DomNode::Attr { name, value } = node {
                html.push(' ');
                html.push_str(name);
                html.push_str("=\"");
                escape_into(&mut html, value);
                html.push('"');
                continue;
            }
            if tag_open {
                html.push('>');
                tag_open = false;
            }
            match node {
                DomNode::Text(text) => escape_into(&mut html, text),
                DomNode::Comment => html.push_str("<!---->"),
                DomNode::Open(tag) => {
                    html.push('<');
                    html.push_str(tag);
                    tag_open = true;
                }
                DomNode::Close(tag) => {
                    html.push_str("</");
                    html.push_str(tag);
                    html.push('>');
                }
                DomNode::Anchor | DomNode::Attr { .. } => {}
            }
        }
        if tag_open {
            html.push('>');
        }

        html
    }
}

fn escape_into(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::NullHost;
    use crate::reactive::Signal;
    use crate::region::{Phase, Region};
    use crate::RenderError;
    use std::rc::Rc;

    fn region(output: &DomOutput) -> Region<DomAppender> {
        Region::new(DomAppender::at(output.cursor()), Rc::new(NullHost))
    }

    #[test]
    fn text_is_escaped() {
        let output = DomOutput::new();
        let mut region = region(&output);

        region.atom("a < b & c".into()).unwrap();

        assert_eq!(output.to_html(), "a &lt; b &amp; c");
    }

    #[test]
    fn element_with_attribute_and_children() {
        let output = DomOutput::new();
        let mut region = region(&output);
        let class = Signal::new("greeting".to_owned());

        let mut div = region.open(Element::new("div")).unwrap();
        div.head(Attribute::new("class", class.clone())).unwrap();
        div.flush().unwrap().atom("hi".into()).unwrap();
        div.close().unwrap();
        region.atom("!".into()).unwrap();

        assert_eq!(output.to_html(), r#"<div class="greeting">hi</div>!"#);

        // The attribute updater was folded into the parent region.
        assert_eq!(region.pending(), 1);
        let rendered = region.finalize().unwrap();
        class.set("farewell".to_owned());
        rendered.updater.unwrap().poll().unwrap();
        assert_eq!(output.to_html(), r#"<div class="farewell">hi</div>!"#);
    }

    #[test]
    fn empty_element_closes_tag() {
        let output = DomOutput::new();
        let mut region = region(&output);

        let mut br = region.open(Element::new("br")).unwrap();
        br.flush().unwrap();
        br.close().unwrap();

        assert_eq!(output.to_html(), "<br></br>");
    }

    #[test]
    fn head_after_flush_is_rejected() {
        let output = DomOutput::new();
        let mut region = region(&output);

        let mut div = region.open(Element::new("div")).unwrap();
        div.flush().unwrap();
        let err = div.head(Attribute::new("id", "x")).err().unwrap();

        assert!(matches!(
            err,
            RenderError::Phase {
                operation: "head",
                phase: Phase::Body
            }
        ));
    }

    #[test]
    fn close_before_flush_is_rejected() {
        let output = DomOutput::new();
        let mut region = region(&output);

        let div = region.open(Element::new("div")).unwrap();
        assert_eq!(div.phase(), Phase::Head);
        let err = div.close().unwrap_err();

        assert!(matches!(err, RenderError::Phase { operation: "close", .. }));
    }
}
