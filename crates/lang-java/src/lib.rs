mod parser;

pub use parser::JavaParser;
