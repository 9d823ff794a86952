//! 工具模块

mod comment_template;
pub mod datetime;

pub use comment_template::{CommentTemplate, TemplateContext};
