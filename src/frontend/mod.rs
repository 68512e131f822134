//! Frontend module - Lexer, Parser, AST

pub mod token;
pub mod lexer;
pub mod ast;
pub mod parser;
pub mod intern;
