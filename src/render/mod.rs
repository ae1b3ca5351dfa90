pub mod renderer;
pub mod scene;

pub use renderer::{RenderLayout, Renderer};
pub use scene::{Paint, Scene, Shape};
