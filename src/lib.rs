pub mod config;
pub mod docx;
pub mod fetch;
pub mod html;
pub mod ir;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod template;
