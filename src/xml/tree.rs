//! Arena tree built from quick-xml events.
//!
//! Input is decoded from the encoding named by its byte order mark or XML
//! declaration. Element namespaces are resolved while the tree is built, and
//! every namespace declaration is kept for the prefix resolver.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use encoding_rs::{Encoding, UTF_8};
use quick_xml::Reader;
use quick_xml::escape::{self, EscapeError};
use quick_xml::events::{BytesStart, Event};

use super::path::{self, PathExpr};
use crate::core::{ExtractError, PathError};

/// Namespace URN bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Parser configuration.
///
/// The defaults drop whitespace-only text and replace entity references,
/// so text extraction never sees indentation or raw `&amp;` escapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Drop text nodes that consist only of whitespace.
    pub strip_blank_text: bool,
    /// Replace predefined, numeric and DOCTYPE-declared entity references.
    pub resolve_entities: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            strip_blank_text: true,
            resolve_entities: true,
        }
    }
}

impl ParseOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strip_blank_text(mut self, on: bool) -> Self {
        self.strip_blank_text = on;
        self
    }

    pub fn resolve_entities(mut self, on: bool) -> Self {
        self.resolve_entities = on;
        self
    }
}

/// Index of a node inside its [`Document`]. Ids grow in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

/// A namespace declaration (`xmlns` or `xmlns:prefix`) found in a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceDecl {
    /// `None` for the default namespace.
    pub prefix: Option<String>,
    pub urn: String,
}

#[derive(Debug)]
struct ElementData {
    name: String,
    local: String,
    namespace: Option<String>,
    attributes: Vec<(String, String)>,
}

#[derive(Debug)]
enum NodeKind {
    Document,
    Element(ElementData),
    Text(String),
}

#[derive(Debug)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A parsed XML document owning its node tree.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<NodeData>,
    declarations: Vec<NamespaceDecl>,
}

impl Document {
    /// Parse a byte buffer with the default [`ParseOptions`].
    pub fn parse(bytes: &[u8]) -> Result<Self, ExtractError> {
        Self::parse_with(bytes, &ParseOptions::default())
    }

    /// Parse a byte buffer.
    ///
    /// Malformed XML is an [`ExtractError::Xml`]; nothing here is recovered.
    pub fn parse_with(bytes: &[u8], options: &ParseOptions) -> Result<Self, ExtractError> {
        let mut builder = TreeBuilder::new(*options);

        // The reader tokenizes ASCII-compatible bytes only, so UTF-16 input
        // is transcoded before reading.
        let input: Cow<'_, [u8]> = match Encoding::for_bom(bytes) {
            Some((encoding, bom)) => {
                builder.fix_encoding();
                if encoding == UTF_8 {
                    Cow::Borrowed(&bytes[bom..])
                } else {
                    let text = encoding
                        .decode_without_bom_handling_and_without_replacement(&bytes[bom..])
                        .ok_or_else(|| {
                            ExtractError::Xml(format!("invalid {} input", encoding.name()))
                        })?;
                    Cow::Owned(text.into_owned().into_bytes())
                }
            }
            None => Cow::Borrowed(bytes),
        };

        let mut reader = Reader::from_reader(input.as_ref());
        reader.config_mut().trim_text(false);

        loop {
            match reader.read_event() {
                Ok(Event::Decl(ref decl)) => {
                    if let Some(Ok(label)) = decl.encoding() {
                        builder.declare_encoding(&label)?;
                    }
                }
                Ok(Event::Start(ref e)) => builder.open(e, false)?,
                Ok(Event::Empty(ref e)) => builder.open(e, true)?,
                Ok(Event::End(_)) => builder.close()?,
                Ok(Event::Text(ref e)) => {
                    let raw = builder.decode(e)?;
                    let text = if options.resolve_entities {
                        builder
                            .unescape(&raw)
                            .map_err(|err| xml_error(&reader, err))?
                    } else {
                        raw.into_owned()
                    };
                    builder.text(text, options.strip_blank_text)?;
                }
                Ok(Event::CData(ref e)) => {
                    let text = builder.decode(e)?.into_owned();
                    builder.text(text, false)?;
                }
                Ok(Event::DocType(ref e)) => {
                    let doctype = builder.decode(e)?.into_owned();
                    builder.declare_entities(&doctype);
                }
                Ok(Event::Eof) => break,
                // Comments and processing instructions carry no data.
                Ok(_) => {}
                Err(e) => return Err(xml_error(&reader, e)),
            }
        }

        builder.finish()
    }

    /// The document node. Its only element child is the document element.
    pub fn node(&self) -> Node<'_> {
        Node {
            doc: self,
            id: NodeId(0),
        }
    }

    /// The document element.
    pub fn root_element(&self) -> Option<Node<'_>> {
        self.node().children().next()
    }

    /// Every distinct namespace declaration, in document order.
    ///
    /// A prefix bound to different URNs in different subtrees appears once
    /// per URN.
    pub fn namespace_declarations(&self) -> &[NamespaceDecl] {
        &self.declarations
    }

    /// The URN a path prefix stands for in this document.
    ///
    /// `xmlns` names the default namespace, `xml` is always bound. A prefix
    /// declared for several URNs stands for the first one.
    pub fn prefix_urn(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE);
        }
        let wanted = (prefix != super::namespace::DEFAULT_PREFIX).then_some(prefix);
        self.declarations
            .iter()
            .find(|decl| decl.prefix.as_deref() == wanted)
            .map(|decl| decl.urn.as_str())
    }

    pub(crate) fn node_at(&self, id: NodeId) -> Node<'_> {
        Node { doc: self, id }
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.0]
    }
}

fn xml_error(reader: &Reader<&[u8]>, e: impl fmt::Display) -> ExtractError {
    ExtractError::Xml(format!("at byte {}: {e}", reader.buffer_position()))
}

struct TreeBuilder {
    nodes: Vec<NodeData>,
    declarations: Vec<NamespaceDecl>,
    entities: HashMap<String, String>,
    open: Vec<NodeId>,
    scopes: Vec<Vec<NamespaceDecl>>,
    options: ParseOptions,
    encoding: &'static Encoding,
    encoding_fixed: bool,
}

impl TreeBuilder {
    fn new(options: ParseOptions) -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
            declarations: Vec::new(),
            entities: HashMap::new(),
            open: Vec::new(),
            scopes: Vec::new(),
            options,
            encoding: UTF_8,
            encoding_fixed: false,
        }
    }

    /// Keep UTF-8 whatever the XML declaration says.
    fn fix_encoding(&mut self) {
        self.encoding = UTF_8;
        self.encoding_fixed = true;
    }

    fn declare_encoding(&mut self, label: &[u8]) -> Result<(), ExtractError> {
        if self.encoding_fixed {
            return Ok(());
        }
        match Encoding::for_label(label) {
            Some(encoding) if encoding.is_ascii_compatible() => {
                self.encoding = encoding;
                Ok(())
            }
            // A 16-bit label without a byte order mark on ASCII-readable input.
            Some(_) => Ok(()),
            None => Err(ExtractError::Xml(format!(
                "unsupported encoding `{}`",
                String::from_utf8_lossy(label)
            ))),
        }
    }

    fn decode<'b>(&self, bytes: &'b [u8]) -> Result<Cow<'b, str>, ExtractError> {
        self.encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .ok_or_else(|| ExtractError::Xml(format!("invalid {} text", self.encoding.name())))
    }

    fn unescape(&self, raw: &str) -> Result<String, EscapeError> {
        escape::unescape_with(raw, |entity| self.entity(entity)).map(Cow::into_owned)
    }

    fn entity(&self, name: &str) -> Option<&str> {
        self.entities
            .get(name)
            .map(String::as_str)
            .or_else(|| escape::resolve_predefined_entity(name))
    }

    fn current(&self) -> NodeId {
        self.open.last().copied().unwrap_or(NodeId(0))
    }

    fn push(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = self.current();
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    fn open(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<(), ExtractError> {
        if self.open.is_empty() && !self.nodes[0].children.is_empty() {
            return Err(ExtractError::Xml(
                "content after the document element".to_string(),
            ));
        }

        let name = self.decode(e.name().as_ref())?.into_owned();
        let mut scope = Vec::new();
        let mut attributes = Vec::new();

        for attr in e.attributes() {
            let attr = attr.map_err(|err| ExtractError::Xml(format!("in <{name}>: {err}")))?;
            let key = self.decode(attr.key.as_ref())?.into_owned();
            let raw = self.decode(&attr.value)?;
            let value = if self.options.resolve_entities {
                self.unescape(&raw)
                    .map_err(|err| ExtractError::Xml(format!("in <{name}>: {err}")))?
            } else {
                raw.into_owned()
            };

            if key == "xmlns" {
                scope.push(NamespaceDecl {
                    prefix: None,
                    urn: value,
                });
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                scope.push(NamespaceDecl {
                    prefix: Some(prefix.to_string()),
                    urn: value,
                });
            } else {
                attributes.push((key, value));
            }
        }

        for decl in &scope {
            if !decl.urn.is_empty() && !self.declarations.contains(decl) {
                self.declarations.push(decl.clone());
            }
        }
        self.scopes.push(scope);

        let (prefix, local) = match name.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local.to_string()),
            None => (None, name.clone()),
        };
        let namespace = self.lookup(prefix);

        let id = self.push(NodeKind::Element(ElementData {
            name,
            local,
            namespace,
            attributes,
        }));

        if empty {
            self.scopes.pop();
        } else {
            self.open.push(id);
        }
        Ok(())
    }

    fn lookup(&self, prefix: Option<&str>) -> Option<String> {
        if prefix == Some("xml") {
            return Some(XML_NAMESPACE.to_string());
        }
        self.scopes
            .iter()
            .rev()
            .flat_map(|scope| scope.iter())
            .find(|decl| decl.prefix.as_deref() == prefix)
            .filter(|decl| !decl.urn.is_empty())
            .map(|decl| decl.urn.clone())
    }

    fn close(&mut self) -> Result<(), ExtractError> {
        self.scopes.pop();
        self.open
            .pop()
            .map(|_| ())
            .ok_or_else(|| ExtractError::Xml("unexpected closing tag".to_string()))
    }

    fn text(&mut self, text: String, strip_blank: bool) -> Result<(), ExtractError> {
        let blank = text.chars().all(char::is_whitespace);
        if self.open.is_empty() {
            return if blank {
                Ok(())
            } else {
                Err(ExtractError::Xml(
                    "text outside the document element".to_string(),
                ))
            };
        }
        if !(blank && strip_blank) {
            self.push(NodeKind::Text(text));
        }
        Ok(())
    }

    /// Collect `<!ENTITY name "value">` declarations from the internal subset.
    ///
    /// Comments and quoted literals are skipped, so declarations mentioned
    /// inside them are not picked up.
    fn declare_entities(&mut self, doctype: &str) {
        let mut rest = doctype;
        while let Some(c) = rest.chars().next() {
            rest = if let Some(tail) = rest.strip_prefix("<!--") {
                tail.find("-->").map_or("", |end| &tail[end + 3..])
            } else if let Some(tail) = rest.strip_prefix("<!ENTITY") {
                self.declare_entity(tail)
            } else if c == '"' || c == '\'' {
                split_literal(rest).map_or("", |(_, after)| after)
            } else {
                &rest[c.len_utf8()..]
            };
        }
    }

    /// Record one entity declaration and return the text after it.
    fn declare_entity<'s>(&mut self, decl: &'s str) -> &'s str {
        let decl = decl.trim_start();
        // Parameter entities only matter to DTD processing.
        let (parameter, decl) = match decl.strip_prefix('%') {
            Some(decl) => (true, decl.trim_start()),
            None => (false, decl),
        };
        let name_end = decl
            .find(|c: char| c.is_whitespace() || c == '>')
            .unwrap_or(decl.len());
        let name = &decl[..name_end];
        let body = decl[name_end..].trim_start();

        // External entities (SYSTEM / PUBLIC) have no literal and are never fetched.
        if let Some((raw, _)) = split_literal(body) {
            if !parameter && !name.is_empty() {
                let expanded = escape::unescape(raw)
                    .map(Cow::into_owned)
                    .unwrap_or_else(|_| raw.to_string());
                self.entities.entry(name.to_string()).or_insert(expanded);
            }
        }
        skip_declaration(body)
    }

    fn finish(self) -> Result<Document, ExtractError> {
        if let Some(id) = self.open.last() {
            let name = match &self.nodes[id.0].kind {
                NodeKind::Element(el) => el.name.as_str(),
                _ => "",
            };
            return Err(ExtractError::Xml(format!("unclosed element <{name}>")));
        }
        if self.nodes[0].children.is_empty() {
            return Err(ExtractError::Xml("no document element".to_string()));
        }
        Ok(Document {
            nodes: self.nodes,
            declarations: self.declarations,
        })
    }
}

/// Split a leading quoted literal into its content and the text after it.
fn split_literal(s: &str) -> Option<(&str, &str)> {
    let quote = s.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let body = &s[1..];
    let end = body.find(quote)?;
    Some((&body[..end], &body[end + 1..]))
}

/// The text after the `>` closing a markup declaration.
fn skip_declaration(mut s: &str) -> &str {
    while let Some(c) = s.chars().next() {
        s = match c {
            '>' => return &s[1..],
            '"' | '\'' => split_literal(s).map_or("", |(_, after)| after),
            _ => &s[c.len_utf8()..],
        };
    }
    s
}

/// A read-only handle to one node of a [`Document`].
#[derive(Clone, Copy)]
pub struct Node<'d> {
    doc: &'d Document,
    id: NodeId,
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.doc, other.doc) && self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.doc.data(self.id).kind {
            NodeKind::Document => write!(f, "Node(#document)"),
            NodeKind::Element(el) => write!(f, "Node(<{}> #{})", el.name, self.id.0),
            NodeKind::Text(text) => write!(f, "Node({text:?} #{})", self.id.0),
        }
    }
}

impl<'d> Node<'d> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn document(&self) -> &'d Document {
        self.doc
    }

    pub fn is_element(&self) -> bool {
        self.element().is_some()
    }

    fn element(&self) -> Option<&'d ElementData> {
        match &self.doc.data(self.id).kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Qualified name as written, e.g. `cbc:IssueDate`. Empty for non-elements.
    pub fn name(&self) -> &'d str {
        self.element().map(|el| el.name.as_str()).unwrap_or("")
    }

    pub fn local_name(&self) -> &'d str {
        self.element().map(|el| el.local.as_str()).unwrap_or("")
    }

    /// Namespace URN of the element, resolved against in-scope declarations.
    pub fn namespace(&self) -> Option<&'d str> {
        self.element().and_then(|el| el.namespace.as_deref())
    }

    pub fn parent(&self) -> Option<Node<'d>> {
        self.doc.data(self.id).parent.map(|id| self.doc.node_at(id))
    }

    /// Element children in document order.
    pub fn children(self) -> impl Iterator<Item = Node<'d>> + 'd {
        let doc = self.doc;
        doc.data(self.id)
            .children
            .iter()
            .map(move |id| doc.node_at(*id))
            .filter(|node| node.is_element())
    }

    /// Element descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'d> {
        let mut stack: Vec<NodeId> = self.doc.data(self.id).children.clone();
        stack.reverse();
        Descendants {
            doc: self.doc,
            stack,
        }
    }

    /// Concatenated text of all descendant text nodes, without mark-up.
    pub fn text(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self.id];
        while let Some(id) = stack.pop() {
            let data = self.doc.data(id);
            if let NodeKind::Text(text) = &data.kind {
                out.push_str(text);
            }
            stack.extend(data.children.iter().rev());
        }
        out
    }

    pub fn attribute(&self, name: &str) -> Option<&'d str> {
        self.element()?
            .attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Attributes in source order, namespace declarations excluded.
    pub fn attributes(self) -> impl Iterator<Item = (&'d str, &'d str)> + 'd {
        self.element()
            .into_iter()
            .flat_map(|el| el.attributes.iter())
            .map(|(key, value)| (key.as_str(), value.as_str()))
    }

    /// Evaluate a path expression with this node as context.
    pub fn select(&self, path: impl Into<PathExpr>) -> Result<Vec<Node<'d>>, PathError> {
        let path = path.into();
        let expr = path.as_str().ok_or(PathError::Unresolved)?;
        let compiled = path::compile(self.doc, expr)?;
        Ok(compiled.evaluate(*self))
    }
}

/// Pre-order iterator over element descendants.
pub struct Descendants<'d> {
    doc: &'d Document,
    stack: Vec<NodeId>,
}

impl<'d> Iterator for Descendants<'d> {
    type Item = Node<'d>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let data = self.doc.data(id);
            if let NodeKind::Element(_) = data.kind {
                self.stack.extend(data.children.iter().rev());
                return Some(self.doc.node_at(id));
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0"?>
<!DOCTYPE a [ <!ENTITY corp "ACME &amp; Sons"> ]>
<a xmlns:x="urn:x" id="root">
  <x:b lang="en">Hello <i>big</i> world</x:b>
  <!-- comment -->
  <c xmlns="urn:default"><d/></c>
  <e>&corp;</e>
  <f><![CDATA[<raw>]]></f>
</a>"#;

    #[test]
    fn builds_tree_without_blank_text() {
        let doc = Document::parse(SAMPLE.as_bytes()).unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(root.name(), "a");
        assert_eq!(root.attribute("id"), Some("root"));
        let names: Vec<_> = root.children().map(|n| n.name()).collect();
        assert_eq!(names, ["x:b", "c", "e", "f"]);
        assert_eq!(root.children().next().unwrap().text(), "Hello big world");
    }

    #[test]
    fn resolves_element_namespaces() {
        let doc = Document::parse(SAMPLE.as_bytes()).unwrap();
        let root = doc.root_element().unwrap();
        let b = root.children().next().unwrap();
        assert_eq!(b.namespace(), Some("urn:x"));
        assert_eq!(b.local_name(), "b");
        let d = root.descendants().find(|n| n.name() == "d").unwrap();
        assert_eq!(d.namespace(), Some("urn:default"));
        assert_eq!(root.namespace(), None);
    }

    #[test]
    fn records_declarations_in_document_order() {
        let doc = Document::parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(
            doc.namespace_declarations(),
            &[
                NamespaceDecl {
                    prefix: Some("x".into()),
                    urn: "urn:x".into()
                },
                NamespaceDecl {
                    prefix: None,
                    urn: "urn:default".into()
                },
            ]
        );
        assert_eq!(doc.prefix_urn("x"), Some("urn:x"));
        assert_eq!(doc.prefix_urn("xmlns"), Some("urn:default"));
        assert_eq!(doc.prefix_urn("nope"), None);
    }

    #[test]
    fn resolves_declared_entities_and_cdata() {
        let doc = Document::parse(SAMPLE.as_bytes()).unwrap();
        let root = doc.root_element().unwrap();
        let texts: Vec<_> = root.children().skip(2).map(|n| n.text()).collect();
        assert_eq!(texts, ["ACME & Sons", "<raw>"]);
    }

    #[test]
    fn keeps_raw_text_when_entities_are_not_resolved() {
        let options = ParseOptions::new().resolve_entities(false);
        let doc = Document::parse_with(b"<a>x &amp; y</a>", &options).unwrap();
        assert_eq!(doc.root_element().unwrap().text(), "x &amp; y");
    }

    #[test]
    fn keeps_blank_text_when_configured() {
        let options = ParseOptions::new().strip_blank_text(false);
        let doc = Document::parse_with(b"<a> <b/> </a>", &options).unwrap();
        assert_eq!(doc.root_element().unwrap().text(), "  ");
        let doc = Document::parse(b"<a> <b/> </a>").unwrap();
        assert_eq!(doc.root_element().unwrap().text(), "");
    }

    #[test]
    fn records_each_urn_of_a_reused_prefix() {
        let doc = Document::parse(
            br#"<a><b xmlns:p="urn:one"><p:x/></b><c xmlns:p="urn:two"><p:x/></c><d xmlns:p="urn:one"/></a>"#,
        )
        .unwrap();
        let urns: Vec<_> = doc
            .namespace_declarations()
            .iter()
            .map(|decl| decl.urn.as_str())
            .collect();
        assert_eq!(urns, ["urn:one", "urn:two"]);
        assert_eq!(doc.prefix_urn("p"), Some("urn:one"));
        let namespaces: Vec<_> = doc
            .root_element()
            .unwrap()
            .descendants()
            .filter(|n| n.local_name() == "x")
            .map(|n| n.namespace())
            .collect();
        assert_eq!(namespaces, [Some("urn:one"), Some("urn:two")]);
    }

    #[test]
    fn decodes_declared_single_byte_encoding() {
        let xml = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><a city=\"K\xF6ln\">M\xFCnchen</a>";
        let doc = Document::parse(xml).unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(root.text(), "M\u{fc}nchen");
        assert_eq!(root.attribute("city"), Some("K\u{f6}ln"));
    }

    #[test]
    fn transcodes_utf16_with_byte_order_mark() {
        let xml = r#"<?xml version="1.0" encoding="UTF-16"?><a b="&#233;t&#233;">Gr&#252;&#223;e &amp; mehr</a>"#;
        let mut bytes = vec![0xFF, 0xFE];
        bytes.extend(xml.encode_utf16().flat_map(u16::to_le_bytes));
        let doc = Document::parse(&bytes).unwrap();
        let root = doc.root_element().unwrap();
        assert_eq!(root.text(), "Gr\u{fc}\u{df}e & mehr");
        assert_eq!(root.attribute("b"), Some("\u{e9}t\u{e9}"));
    }

    #[test]
    fn rejects_unknown_encoding_and_invalid_utf8() {
        let err = Document::parse(b"<?xml version=\"1.0\" encoding=\"x-nope\"?><a/>").unwrap_err();
        assert!(err.to_string().contains("x-nope"), "{err}");
        assert!(Document::parse(b"<a>\xFF</a>").is_err());
    }

    #[test]
    fn entity_scan_skips_comments_and_literals() {
        let mut builder = TreeBuilder::new(ParseOptions::default());
        builder.declare_entities(
            r#"r [
  <!-- <!ENTITY commented "no"> -->
  <!ATTLIST r note CDATA "<!ENTITY quoted 'no'>">
  <!ENTITY % param "no">
  <!ENTITY ext SYSTEM "ext.xml">
  <!ENTITY real 'yes &amp; more'>
]"#,
        );
        assert_eq!(builder.entity("commented"), None);
        assert_eq!(builder.entity("quoted"), None);
        assert_eq!(builder.entity("param"), None);
        assert_eq!(builder.entity("ext"), None);
        assert_eq!(builder.entity("real"), Some("yes & more"));
        assert_eq!(builder.entity("lt"), Some("<"));
    }

    #[test]
    fn rejects_malformed_input() {
        for bad in [
            "<a><b></a>",
            "<a>",
            "",
            "just text",
            "<a/><b/>",
            "<a x='1' x='2'/>",
            "<a>&undeclared;</a>",
        ] {
            let err = Document::parse(bad.as_bytes()).unwrap_err();
            assert!(matches!(err, ExtractError::Xml(_)), "{bad}: {err}");
        }
    }
}
