pub mod template;
pub mod theme;
