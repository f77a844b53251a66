use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::{Map, Value};
use thiserror::Error;

/// Errors raised while reading an XML document
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("invalid XML attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("unbalanced XML document")]
    Unbalanced,

    #[error("XML document has no root element")]
    Empty,
}

/// A namespace-agnostic XML element tree
///
/// Element and attribute names keep only their local part; namespace
/// declarations are dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn parse(input: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(XmlNode::from_start(&start)?),
                Event::Empty(start) => {
                    let node = XmlNode::from_start(&start)?;
                    attach(&mut stack, &mut root, node);
                }
                Event::End(_) => {
                    let node = stack.pop().ok_or(XmlError::Unbalanced)?;
                    attach(&mut stack, &mut root, node);
                }
                Event::Text(text) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8_lossy(&data.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if !stack.is_empty() {
            return Err(XmlError::Unbalanced);
        }
        root.ok_or(XmlError::Empty)
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            if attr.key.as_namespace_binding().is_some() {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            attributes.push((key, attr.unescape_value()?.into_owned()));
        }

        Ok(Self {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attributes,
            text: String::new(),
            children: Vec::new(),
        })
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Convert the element's content to a JSON-like value
    ///
    /// Leaves become strings, `xsi:nil` becomes null, repeated siblings become
    /// arrays and SOAP-encoded arrays (`item` children) become arrays.
    pub fn to_value(&self) -> Value {
        if self.attribute("nil") == Some("true") {
            return Value::Null;
        }
        if self.children.is_empty() {
            return Value::String(self.text.clone());
        }
        if self.children.iter().all(|c| c.name == "item") {
            return Value::Array(self.children.iter().map(XmlNode::to_value).collect());
        }

        let mut map = Map::new();
        for child in &self.children {
            let value = child.to_value();
            if self.children_named(&child.name).nth(1).is_none() {
                map.insert(child.name.clone(), value);
                continue;
            }
            if let Value::Array(items) = map
                .entry(child.name.clone())
                .or_insert_with(|| Value::Array(Vec::new()))
            {
                items.push(value);
            }
        }
        Value::Object(map)
    }
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None => *root = Some(node),
    }
}
