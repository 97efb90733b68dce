pub mod components;
pub mod keyboard;
pub mod panels;

pub use keyboard::Keyboard;
