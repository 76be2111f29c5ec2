use crate::model::ScalarValue;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Whether the input is a full compilation unit or a single method/member
/// body fragment. A mode switch, not two different algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParseMode {
    #[default]
    CompilationUnit,
    Fragment,
}

/// Normalized parse tree handed over by a language front-end. This is the
/// only structure core ever walks; the front-end's own tree is discarded
/// once this exists.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: String,
    pub value: Option<ScalarValue>,
    pub children: Vec<SyntaxNode>,
}

impl SyntaxNode {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            children: Vec::new(),
        }
    }

    pub fn leaf(kind: impl Into<String>, value: ScalarValue) -> Self {
        Self {
            kind: kind.into(),
            value: Some(value),
            children: Vec::new(),
        }
    }

    pub fn with_children(kind: impl Into<String>, children: Vec<SyntaxNode>) -> Self {
        Self {
            kind: kind.into(),
            value: None,
            children,
        }
    }
}

/// The derived drop glue recurses through `children`, and a pathological
/// input (thousands of nesting levels) would overflow the thread stack on
/// teardown even though flattening itself is iterative. Draining the
/// subtree into a flat worklist keeps drop depth constant.
impl Drop for SyntaxNode {
    fn drop(&mut self) {
        if self.children.is_empty() {
            return;
        }
        let mut worklist = std::mem::take(&mut self.children);
        while let Some(mut node) = worklist.pop() {
            worklist.append(&mut node.children);
        }
    }
}

/// Capability interface for per-language front-ends. Implementations must
/// reject malformed input with a diagnosable error instead of returning a
/// partial tree.
pub trait SourceParser: Send + Sync {
    fn parse(&self, source: &str, mode: ParseMode) -> Result<SyntaxNode, BoxError>;
}
