pub mod document;
pub mod package;
pub mod styles;
pub mod xml;
