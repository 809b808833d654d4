pub mod context;
pub mod list_renderer;
pub mod post_renderer;
