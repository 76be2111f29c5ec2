use std::io::Write;
use std::path::Path;

use crate::error::{AstgenError, Result};
use crate::flatten::flatten;
use crate::parser::{ParseMode, SourceParser};

/// Parses and flattens exactly one file and writes the node records as one
/// JSON array document to `output`, or to stdout when no path is given.
///
/// No admission filter applies here; a single-file invocation is assumed
/// intentional regardless of size. Any failure is fatal to the invocation.
pub fn process_one(
    parser: &dyn SourceParser,
    input: &Path,
    output: Option<&Path>,
    mode: ParseMode,
) -> Result<()> {
    let source = std::fs::read_to_string(input)?;
    let tree = parser
        .parse(&source, mode)
        .map_err(|e| AstgenError::Parsing(e.to_string()))?;
    let records = flatten(&tree);
    let json = serde_json::to_string(&records)?;

    match output {
        Some(path) => std::fs::write(path, json)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }

    Ok(())
}
