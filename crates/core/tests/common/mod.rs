use astgen_core::model::ScalarValue;
use astgen_core::parser::{BoxError, ParseMode, SourceParser, SyntaxNode};

/// Deterministic toy front-end for pipeline tests.
///
/// A source whose first line is `nodes:N` parses into a tree of exactly N
/// nodes (a root with N-1 leaf children); anything else is a syntax error
/// carrying a fixed diagnostic.
pub struct StubParser;

impl SourceParser for StubParser {
    fn parse(&self, source: &str, _mode: ParseMode) -> Result<SyntaxNode, BoxError> {
        let header = source.lines().next().unwrap_or("");
        let Some(count) = header.strip_prefix("nodes:") else {
            return Err(format!("unexpected token: {header}").into());
        };
        let count: usize = count.trim().parse().map_err(|_| "invalid node count")?;
        if count == 0 {
            return Err("empty tree".into());
        }

        let children = (0..count - 1)
            .map(|i| SyntaxNode::leaf("item", ScalarValue::Int(i as i64)))
            .collect();
        Ok(SyntaxNode::with_children("unit", children))
    }
}
