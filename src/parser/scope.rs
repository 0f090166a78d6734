//! Element list under construction for one declaration scope.
//!
//! A scope is the body of a file, namespace or type. Region and conditional
//! directives inside it push frames onto an explicit stack; each frame saves
//! the elements collected before it opened and records the closer it waits
//! for. Closing a frame turns the elements collected since into the children
//! of a region or the body of a conditional branch.

use std::mem;

use tracing::trace;

use super::errors::{ErrorCode, ParseContext, RelatedInfo, SyntaxError};
use super::{CommentRegionMarkers, RegionMarker};
use crate::base::Position;
use crate::elements::{
    AttributeElement, CodeElement, CommentElement, CommentType, ConditionBranch,
    ConditionDirectiveElement, ElementKind, RegionElement, RegionStyle,
};

/// Closer texts a language uses for its directives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectiveClosers {
    pub region: &'static str,
    pub conditional: &'static str,
}

impl DirectiveClosers {
    pub const CSHARP: Self = Self {
        region: "#endregion",
        conditional: "#endif",
    };

    pub const VISUAL_BASIC: Self = Self {
        region: "#End Region",
        conditional: "#End If",
    };
}

enum FrameKind {
    Region {
        name: String,
        style: RegionStyle,
        header_comments: Vec<CommentElement>,
        closer: String,
    },
    Conditional {
        directive: ConditionDirectiveElement,
        in_else: bool,
    },
}

struct Frame {
    kind: FrameKind,
    opened_at: Position,
    saved: Vec<CodeElement>,
}

pub struct Scope {
    context: ParseContext,
    closers: DirectiveClosers,
    elements: Vec<CodeElement>,
    frames: Vec<Frame>,
    pending_comments: Vec<CommentElement>,
    pending_attributes: Vec<AttributeElement>,
}

impl Scope {
    pub fn new(context: ParseContext, closers: DirectiveClosers) -> Self {
        Self {
            context,
            closers,
            elements: Vec::new(),
            frames: Vec::new(),
            pending_comments: Vec::new(),
            pending_attributes: Vec::new(),
        }
    }

    /// The innermost context: an open directive, or the scope itself.
    pub fn context(&self) -> ParseContext {
        match self.frames.last().map(|frame| &frame.kind) {
            Some(FrameKind::Region { .. }) => ParseContext::Region,
            Some(FrameKind::Conditional { .. }) => ParseContext::ConditionalBlock,
            None => self.context,
        }
    }

    pub fn push_comment(&mut self, comment: CommentElement) {
        self.pending_comments.push(comment);
    }

    /// Take a comment line. With `markers` set, line comments that carry a
    /// region marker open or close a comment-marker region instead.
    pub fn comment(
        &mut self,
        comment: CommentElement,
        markers: Option<&CommentRegionMarkers>,
        line_marker: &str,
        at: Position,
    ) -> Result<(), SyntaxError> {
        let marker = markers
            .filter(|_| comment.comment_type == CommentType::Line)
            .and_then(|markers| Some((markers, markers.classify(&comment.text)?)));
        match marker {
            Some((markers, RegionMarker::Begin(name))) => {
                let closer = format!("{line_marker} {}", markers.end_marker(&name));
                self.open_region(name, RegionStyle::CommentDirective, closer, at);
                Ok(())
            }
            Some((_, RegionMarker::End(name))) => {
                self.close_region(RegionStyle::CommentDirective, Some(&name), at)
            }
            None => {
                self.push_comment(comment);
                Ok(())
            }
        }
    }

    /// A blank line detaches pending comments from whatever follows.
    pub fn blank_line(&mut self) {
        self.flush_comments();
    }

    fn flush_comments(&mut self) {
        for comment in self.pending_comments.drain(..) {
            self.elements.push(CodeElement::comment(comment));
        }
    }

    pub fn has_pending_attributes(&self) -> bool {
        !self.pending_attributes.is_empty()
    }

    /// Attributes cannot carry over a directive that closes their frame.
    fn check_no_pending_attributes(&self, at: Position) -> Result<(), SyntaxError> {
        if !self.has_pending_attributes() {
            return Ok(());
        }
        Err(SyntaxError::builder(ErrorCode::E0303)
            .message("expected declaration after attribute")
            .at(at)
            .context(self.context())
            .build())
    }

    pub fn take_header_comments(&mut self) -> Vec<CommentElement> {
        mem::take(&mut self.pending_comments)
    }

    pub fn push_attribute(&mut self, attribute: AttributeElement) {
        self.pending_attributes.push(attribute);
    }

    pub fn take_attributes(&mut self) -> Vec<AttributeElement> {
        mem::take(&mut self.pending_attributes)
    }

    pub fn push(&mut self, element: CodeElement) {
        self.elements.push(element);
    }

    /// Push an element that takes the pending comments as its header.
    pub fn push_with_comments(&mut self, mut element: CodeElement) {
        element.header_comments = self.take_header_comments();
        self.elements.push(element);
    }

    pub fn open_region(
        &mut self,
        name: impl Into<String>,
        style: RegionStyle,
        closer: impl Into<String>,
        at: Position,
    ) {
        let name = name.into();
        trace!(region = %name, line = at.line, "open region");
        let header_comments = self.take_header_comments();
        self.frames.push(Frame {
            kind: FrameKind::Region {
                name,
                style,
                header_comments,
                closer: closer.into(),
            },
            opened_at: at,
            saved: mem::take(&mut self.elements),
        });
    }

    /// Close the innermost region. `name` is checked for comment-marker
    /// regions, whose end marker repeats the region name.
    pub fn close_region(
        &mut self,
        style: RegionStyle,
        name: Option<&str>,
        at: Position,
    ) -> Result<(), SyntaxError> {
        self.check_no_pending_attributes(at)?;
        self.flush_comments();
        let is_open = matches!(
            self.frames.last(),
            Some(Frame { kind: FrameKind::Region { style: open, .. }, .. }) if *open == style
        );
        if !is_open {
            return Err(SyntaxError::builder(ErrorCode::E0501)
                .message("unmatched end region directive")
                .at(at)
                .text(name.unwrap_or(self.closers.region))
                .context(self.context())
                .build());
        }
        let Some(frame) = self.frames.pop() else {
            return Err(SyntaxError::builder(ErrorCode::E0999).at(at).build());
        };
        let FrameKind::Region {
            name: region_name,
            style,
            header_comments,
            closer,
        } = frame.kind
        else {
            return Err(SyntaxError::builder(ErrorCode::E0999).at(at).build());
        };
        if let Some(name) = name.filter(|name| *name != region_name) {
            return Err(SyntaxError::builder(ErrorCode::E0506)
                .message(format!("expected '{closer}'"))
                .at(at)
                .text(name)
                .context(ParseContext::Region)
                .related("region opened here", frame.opened_at)
                .build());
        }
        trace!(region = %region_name, line = at.line, "close region");
        let children = mem::replace(&mut self.elements, frame.saved);
        let mut region = CodeElement::new(
            region_name,
            ElementKind::Region(RegionElement {
                directives_enabled: true,
                style,
            }),
        );
        region.header_comments = header_comments;
        region.children = children;
        self.elements.push(region);
        Ok(())
    }

    pub fn open_conditional(&mut self, condition: impl Into<String>, at: Position) {
        self.flush_comments();
        self.frames.push(Frame {
            kind: FrameKind::Conditional {
                directive: ConditionDirectiveElement::new(condition),
                in_else: false,
            },
            opened_at: at,
            saved: mem::take(&mut self.elements),
        });
    }

    /// Start the next branch of the innermost conditional: `Some` for an
    /// else-if condition, `None` for the else branch.
    pub fn branch(&mut self, condition: Option<String>, at: Position) -> Result<(), SyntaxError> {
        self.check_no_pending_attributes(at)?;
        self.flush_comments();
        let context = self.context();
        let directive_text = if condition.is_some() { "else-if" } else { "else" };
        let Some(Frame {
            kind: FrameKind::Conditional { directive, in_else },
            ..
        }) = self.frames.last_mut()
        else {
            return Err(SyntaxError::builder(ErrorCode::E0502)
                .message(format!("unmatched {directive_text} conditional directive"))
                .at(at)
                .context(context)
                .build());
        };
        if *in_else {
            return Err(SyntaxError::builder(ErrorCode::E0505)
                .message(format!("expected '{}'", self.closers.conditional))
                .at(at)
                .text(directive_text)
                .context(ParseContext::ConditionalBlock)
                .build());
        }
        let body = mem::take(&mut self.elements);
        if let Some(last) = directive.branches.last_mut() {
            last.children = body;
        }
        match condition {
            Some(condition) => directive.branches.push(ConditionBranch::new(condition)),
            None => *in_else = true,
        }
        Ok(())
    }

    pub fn close_conditional(&mut self, at: Position) -> Result<(), SyntaxError> {
        self.check_no_pending_attributes(at)?;
        self.flush_comments();
        let context = self.context();
        let is_open = context == ParseContext::ConditionalBlock;
        let frame = match self.frames.pop() {
            Some(frame) if is_open => frame,
            _ => {
                return Err(SyntaxError::builder(ErrorCode::E0502)
                    .message("unmatched end conditional directive")
                    .at(at)
                    .text(self.closers.conditional)
                    .context(context)
                    .build());
            }
        };
        let FrameKind::Conditional {
            mut directive,
            in_else,
        } = frame.kind
        else {
            return Err(SyntaxError::builder(ErrorCode::E0999).at(at).build());
        };
        let body = mem::replace(&mut self.elements, frame.saved);
        if in_else {
            directive.else_body = Some(body);
        } else if let Some(last) = directive.branches.last_mut() {
            last.children = body;
        }
        let name = directive.condition_expression().to_string();
        self.elements
            .push(CodeElement::new(name, ElementKind::ConditionDirective(directive)));
        Ok(())
    }

    /// Finish the scope at `at`. Open directives and dangling attributes are
    /// errors; pending comments become standalone comment elements.
    pub fn finish(mut self, at: Position) -> Result<Vec<CodeElement>, SyntaxError> {
        if let Some(frame) = self.frames.last() {
            let (closer, what) = match &frame.kind {
                FrameKind::Region { closer, .. } => (closer.clone(), "region opened here"),
                FrameKind::Conditional { .. } => (
                    self.closers.conditional.to_string(),
                    "conditional block opened here",
                ),
            };
            return Err(SyntaxError::expected_closer(&closer, at, self.context())
                .with_related(RelatedInfo::new(what, frame.opened_at)));
        }
        if self.has_pending_attributes() {
            return Err(SyntaxError::builder(ErrorCode::E0303)
                .message("expected declaration after attribute")
                .at(at)
                .context(self.context)
                .build());
        }
        self.flush_comments();
        Ok(self.elements)
    }
}
