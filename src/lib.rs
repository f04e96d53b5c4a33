pub mod encoding;
pub mod parser;
