use quick_xml::events::Event;
use quick_xml::name::QName;
use quick_xml::Reader;
use thiserror::Error;

use crate::node::{NodeKind, TreeNode};

#[derive(Debug, Error)]
pub enum PlistError {
    #[error("malformed XML near byte {position}: {source}")]
    Xml {
        position: usize,
        #[source]
        source: quick_xml::Error,
    },
    #[error("unexpected closing tag </{found}>")]
    UnexpectedClose { found: String },
    #[error("document ended with {open} unclosed element(s)")]
    Unterminated { open: usize },
    #[error("document contains no plist value")]
    Empty,
}

/// Parses a property list document from text.
/// 從文字解析屬性清單文件。
///
/// When the outermost element is `<plist>`, its first child is returned.
pub fn parse_document(xml: &str) -> Result<TreeNode, PlistError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);
    read_tree(&mut reader)
}

/// Parses a property list from raw bytes, honoring the declared encoding.
pub fn parse_bytes(bytes: &[u8]) -> Result<TreeNode, PlistError> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);
    read_tree(&mut reader)
}

fn read_tree(reader: &mut Reader<&[u8]>) -> Result<TreeNode, PlistError> {
    let mut stack: Vec<TreeNode> = Vec::new();
    let mut root: Option<TreeNode> = None;
    let mut buf = Vec::new();

    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|source| xml_error(reader.buffer_position(), source))?;
        match event {
            Event::Start(start) => {
                let tag = tag_name(reader, start.name())?;
                stack.push(TreeNode::new(NodeKind::from_tag(&tag)));
            }
            Event::Empty(empty) => {
                let tag = tag_name(reader, empty.name())?;
                attach(&mut stack, &mut root, TreeNode::new(NodeKind::from_tag(&tag)));
            }
            Event::End(end) => {
                let tag = tag_name(reader, end.name())?;
                let node = match stack.pop() {
                    Some(node) if node.kind().tag() == tag => node,
                    _ => return Err(PlistError::UnexpectedClose { found: tag }),
                };
                attach(&mut stack, &mut root, node);
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|source| xml_error(reader.buffer_position(), source))?;
                if let Some(open) = stack.last_mut() {
                    open.push_text(&text);
                }
            }
            Event::CData(data) => {
                let bytes = data.into_inner();
                let text = reader
                    .decoder()
                    .decode(&bytes)
                    .map_err(|source| xml_error(reader.buffer_position(), source))?;
                if let Some(open) = stack.last_mut() {
                    open.push_text(&text);
                }
            }
            Event::Eof => break,
            // Declarations, DOCTYPE, comments and processing instructions carry no theme data.
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(PlistError::Unterminated { open: stack.len() });
    }

    let root = root.ok_or(PlistError::Empty)?;
    if root.kind() == &NodeKind::Other("plist".into()) {
        return root.into_children().into_iter().next().ok_or(PlistError::Empty);
    }
    Ok(root)
}

fn attach(stack: &mut [TreeNode], root: &mut Option<TreeNode>, node: TreeNode) {
    if let Some(parent) = stack.last_mut() {
        parent.push_child(node);
    } else if root.is_none() {
        *root = Some(node);
    }
}

fn tag_name(reader: &Reader<&[u8]>, name: QName<'_>) -> Result<String, PlistError> {
    reader
        .decoder()
        .decode(name.as_ref())
        .map(|tag| tag.into_owned())
        .map_err(|source| xml_error(reader.buffer_position(), source))
}

fn xml_error(position: usize, source: quick_xml::Error) -> PlistError {
    PlistError::Xml { position, source }
}
