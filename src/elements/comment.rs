//! Comments attached to elements or standing alone.

/// How a comment was written in source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommentType {
    /// `// text` or `' text`
    Line,
    /// `/// text` or `''' text`
    XmlLine,
    /// `/* text */`
    Block,
}

/// A single comment. `text` excludes the comment markers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommentElement {
    pub comment_type: CommentType,
    pub text: String,
}

impl CommentElement {
    pub fn new(comment_type: CommentType, text: impl Into<String>) -> Self {
        Self {
            comment_type,
            text: text.into(),
        }
    }

    pub fn line(text: impl Into<String>) -> Self {
        Self::new(CommentType::Line, text)
    }

    pub fn xml_line(text: impl Into<String>) -> Self {
        Self::new(CommentType::XmlLine, text)
    }

    pub fn block(text: impl Into<String>) -> Self {
        Self::new(CommentType::Block, text)
    }
}
