pub mod ast;
pub mod dialect;
pub mod lexer;
pub mod parser;
