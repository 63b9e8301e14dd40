pub mod message;
pub mod project;
pub mod session;
pub mod tool_use;
