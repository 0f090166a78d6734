//! Attribute annotations (`[Serializable]`, `<Obsolete("x")>`).

/// An attribute applied to an element.
///
/// Attributes written together in one list (`[A, B(1)]`) are chained: the
/// first becomes the owner and the rest are its `children`, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeElement {
    /// Explicit target such as `assembly`, `return` or `field`
    pub target: Option<String>,
    pub name: String,
    /// Raw argument text between the parentheses, if any
    pub body_text: Option<String>,
    pub children: Vec<AttributeElement>,
}

impl AttributeElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            target: None,
            name: name.into(),
            body_text: None,
            children: Vec::new(),
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body_text = Some(body.into());
        self
    }

    /// Names of this attribute and every chained attribute, in order.
    pub fn names(&self) -> Vec<&str> {
        let mut names = vec![self.name.as_str()];
        for child in &self.children {
            names.extend(child.names());
        }
        names
    }

    /// Whether this attribute applies to the whole assembly/module rather
    /// than to the declaration that follows it.
    pub fn is_file_level(&self) -> bool {
        self.target.as_deref().is_some_and(|target| {
            target.eq_ignore_ascii_case("assembly") || target.eq_ignore_ascii_case("module")
        })
    }
}
