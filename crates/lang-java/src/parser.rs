type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

use astgen_core::model::ScalarValue;
use astgen_core::parser::{BoxError, ParseMode, SourceParser, SyntaxNode};
use tree_sitter::{Node, Parser, Point, Tree};

/// Java front-end backed by tree-sitter-java.
///
/// tree-sitter is error-tolerant, so a tree containing error or missing
/// nodes is rejected here instead of being exported as a partial AST.
pub struct JavaParser {
    language: tree_sitter::Language,
}

impl JavaParser {
    pub fn new() -> Result<Self> {
        let language: tree_sitter::Language = tree_sitter_java::LANGUAGE.into();
        Ok(Self { language })
    }

    // tree_sitter::Parser is not Sync, so each call builds its own.
    fn parse_tree(&self, source: &str) -> Result<Tree> {
        let mut parser = Parser::new();
        parser
            .set_language(&self.language)
            .map_err(|e| e.to_string())?;
        parser
            .parse(source, None)
            .ok_or_else(|| "failed to parse source".into())
    }

    fn parse_unit(&self, source: &str) -> Result<SyntaxNode> {
        let tree = self.parse_tree(source)?;
        let root = tree.root_node();
        if let Some(point) = first_syntax_error(root) {
            return Err(format!(
                "syntax error at {}:{}",
                point.row + 1,
                point.column + 1
            )
            .into());
        }
        Ok(normalize(root, source))
    }

    /// Parses a single method or member declaration. The grammar has no
    /// body-declaration entry point, so the fragment is wrapped in a
    /// synthetic class and the first member of its body becomes the root.
    fn parse_fragment(&self, source: &str) -> Result<SyntaxNode> {
        let wrapped = format!("class __Fragment {{\n{source}\n}}");
        let tree = self.parse_tree(&wrapped)?;
        let root = tree.root_node();
        if let Some(point) = first_syntax_error(root) {
            return Err(fragment_error(point).into());
        }

        let member = first_body_member(root)
            .ok_or("fragment contains no method or member declaration")?;
        Ok(normalize(member, &wrapped))
    }
}

impl SourceParser for JavaParser {
    fn parse(&self, source: &str, mode: ParseMode) -> std::result::Result<SyntaxNode, BoxError> {
        match mode {
            ParseMode::CompilationUnit => self.parse_unit(source),
            ParseMode::Fragment => self.parse_fragment(source),
        }
    }
}

/// Locates the first error or missing node in pre-order, guided by the
/// subtree error flags so clean subtrees are never descended into.
fn first_syntax_error(root: Node) -> Option<Point> {
    if !root.has_error() {
        return None;
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_error() || node.is_missing() {
            return Some(node.start_position());
        }
        let mut cursor = node.walk();
        let suspect: Vec<Node> = node
            .children(&mut cursor)
            .filter(|child| child.has_error() || child.is_missing())
            .collect();
        for child in suspect.into_iter().rev() {
            stack.push(child);
        }
    }

    // has_error() without a locatable offender; point at the root.
    Some(root.start_position())
}

/// The synthetic wrapper occupies line one of the wrapped source, so a
/// fragment's own lines already read as 1-based rows. An error attributed
/// to the wrapper itself is reported on the first fragment line instead of
/// a line 0 the caller never wrote.
fn fragment_error(point: Point) -> String {
    format!("syntax error at {}:{}", point.row.max(1), point.column + 1)
}

/// program -> class_declaration -> class_body -> first named member.
/// Comments are named extras in the grammar and must not become the root,
/// so a fragment starting with a doc comment still yields its declaration.
fn first_body_member(root: Node) -> Option<Node<'_>> {
    let mut cursor = root.walk();
    let class_decl = root
        .named_children(&mut cursor)
        .find(|node| node.kind() == "class_declaration")?;
    let body = class_decl.child_by_field_name("body")?;
    let mut body_cursor = body.walk();
    body.named_children(&mut body_cursor)
        .find(|node| !node.is_extra())
}

/// Converts the tree-sitter tree into the normalized `SyntaxNode` shape,
/// keeping every node (named and anonymous). Iterative: generated source
/// can nest deeper than the thread stack allows for recursion.
fn normalize(root: Node, source: &str) -> SyntaxNode {
    let mut cursor = root.walk();
    let mut stack = vec![shell(&cursor.node(), source)];

    loop {
        if cursor.goto_first_child() {
            stack.push(shell(&cursor.node(), source));
            continue;
        }
        loop {
            // The cursor node's shell is always on top of the stack.
            let finished = stack.pop().expect("stack tracks cursor");
            let Some(parent) = stack.last_mut() else {
                return finished;
            };
            parent.children.push(finished);
            if cursor.goto_next_sibling() {
                stack.push(shell(&cursor.node(), source));
                break;
            }
            cursor.goto_parent();
        }
    }
}

fn shell(node: &Node, source: &str) -> SyntaxNode {
    SyntaxNode {
        kind: node.kind().to_string(),
        value: if node.child_count() == 0 {
            leaf_value(node, source)
        } else {
            None
        },
        children: Vec::with_capacity(node.child_count()),
    }
}

/// Leaf nodes carry their source text; Java literal kinds are coerced to
/// typed scalars so corpora keep numbers as numbers.
fn leaf_value(node: &Node, source: &str) -> Option<ScalarValue> {
    let text = node.utf8_text(source.as_bytes()).ok()?;
    let value = match node.kind() {
        "true" => ScalarValue::Bool(true),
        "false" => ScalarValue::Bool(false),
        "decimal_integer_literal" | "hex_integer_literal" | "octal_integer_literal"
        | "binary_integer_literal" => {
            parse_java_integer(text).unwrap_or_else(|| ScalarValue::Str(text.to_string()))
        }
        "decimal_floating_point_literal" | "hex_floating_point_literal" => {
            parse_java_float(text).unwrap_or_else(|| ScalarValue::Str(text.to_string()))
        }
        _ => ScalarValue::Str(text.to_string()),
    };
    Some(value)
}

fn parse_java_integer(text: &str) -> Option<ScalarValue> {
    let cleaned: String = text
        .trim_end_matches(['l', 'L'])
        .chars()
        .filter(|c| *c != '_')
        .collect();
    let parsed = if let Some(hex) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        i64::from_str_radix(hex, 16)
    } else if let Some(bin) = cleaned.strip_prefix("0b").or_else(|| cleaned.strip_prefix("0B")) {
        i64::from_str_radix(bin, 2)
    } else if cleaned.len() > 1 && cleaned.starts_with('0') {
        i64::from_str_radix(&cleaned[1..], 8)
    } else {
        cleaned.parse()
    };
    parsed.ok().map(ScalarValue::Int)
}

fn parse_java_float(text: &str) -> Option<ScalarValue> {
    let cleaned: String = text
        .trim_end_matches(['f', 'F', 'd', 'D'])
        .chars()
        .filter(|c| *c != '_')
        .collect();
    cleaned.parse().ok().map(ScalarValue::Float)
}
