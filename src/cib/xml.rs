//! Text codec for the configuration document.
//!
//! Decoding and encoding go through `xot`; the engine itself only works on
//! [`Node`] values. Comments and processing instructions are dropped on
//! decode, whitespace-only text is ignored, and other text content is kept.

use super::node::{Node, Tag};
use crate::error::{Error, Result};
use xot::Xot;

fn malformed(err: impl std::fmt::Display) -> Error {
    Error::MalformedDocument {
        message: err.to_string(),
    }
}

/// Decode a document (or a fragment with a single root element).
pub fn parse(text: &str) -> Result<Node> {
    let mut xot = Xot::new();
    let document = xot.parse(text).map_err(malformed)?;
    let root = xot.document_element(document).map_err(malformed)?;
    convert(&xot, root)
}

fn convert(xot: &Xot, element: xot::Node) -> Result<Node> {
    let name = xot
        .element(element)
        .map(|e| e.name())
        .ok_or_else(|| malformed("expected an element"))?;
    let mut node = Node::new(Tag::from(xot.local_name_str(name)));

    for (key, value) in xot.attributes(element).iter() {
        node.set(xot.local_name_str(key.to_owned()), value.to_string());
    }

    let mut text = String::new();
    for child in xot.children(element) {
        if xot.is_element(child) {
            node.push(convert(xot, child)?);
        } else if let Some(content) = xot.text_str(child) {
            text.push_str(content);
        }
    }
    if !text.trim().is_empty() {
        node.set_text(text);
    }

    Ok(node)
}

/// Encode `node` as text.
pub fn serialize(node: &Node) -> Result<String> {
    let mut xot = Xot::new();
    let root = build(&mut xot, node).map_err(malformed)?;
    let document = xot.new_document_with_element(root).map_err(malformed)?;
    xot.to_string(document).map_err(malformed)
}

fn build(xot: &mut Xot, node: &Node) -> std::result::Result<xot::Node, xot::Error> {
    let name = xot.add_name(node.tag().as_str());
    let element = xot.new_element(name);

    for (key, value) in node.attributes().iter() {
        let key = xot.add_name(key);
        xot.attributes_mut(element).insert(key, value.to_string());
    }

    if let Some(text) = node.text() {
        let text = xot.new_text(text);
        xot.append(element, text)?;
    }

    for child in node.children() {
        let child = build(xot, child)?;
        xot.append(element, child)?;
    }

    Ok(element)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESOURCES: &str = r#"<resources>
  <primitive id="vip1" class="ocf" provider="heartbeat" type="IPaddr2">
    <instance_attributes id="vip1-instance_attributes">
      <nvpair id="vip1-instance_attributes-ip" name="ip" value="192.168.50.206"/>
    </instance_attributes>
  </primitive>
  <!-- managed by hand -->
</resources>"#;

    #[test]
    fn test_parse_builds_tree() {
        let root = parse(RESOURCES).unwrap();
        assert_eq!(root.tag().as_str(), "resources");
        assert_eq!(root.children().len(), 1);

        let primitive = &root.children()[0];
        assert_eq!(primitive.tag(), &Tag::Primitive);
        assert_eq!(primitive.id(), Some("vip1"));
        assert_eq!(primitive.get("type"), Some("IPaddr2"));

        let nvpair = &primitive.children()[0].children()[0];
        assert_eq!(nvpair.tag(), &Tag::Nvpair);
        assert_eq!(nvpair.get("value"), Some("192.168.50.206"));
        assert!(nvpair.text().is_none());
    }

    #[test]
    fn test_serialize_then_parse_is_stable() {
        let root = parse(RESOURCES).unwrap();
        let text = serialize(&root).unwrap();
        assert!(text.contains("<primitive"));
        assert!(text.contains("id=\"vip1\""));
        let again = parse(&text).unwrap();
        assert_eq!(root, again);
        assert_eq!(serialize(&again).unwrap(), text);
    }

    #[test]
    fn test_text_content_is_kept() {
        let root =
            parse("<configuration><description>db tier</description></configuration>").unwrap();
        assert_eq!(root.children()[0].text(), Some("db tier"));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        let err = parse("<resources><primitive></resources>").unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { .. }));
    }

    #[test]
    fn test_serialize_escapes_attribute_values() {
        let node = Node::new(Tag::Nvpair).with_attr("value", "a<b & \"c\"");
        let text = serialize(&node).unwrap();
        let back = parse(&text).unwrap();
        assert_eq!(back.get("value"), Some("a<b & \"c\""));
    }
}
