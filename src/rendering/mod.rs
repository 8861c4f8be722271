pub mod box_pass;
pub mod imgui_renderer;
pub mod instance;
pub mod lighting;
pub mod mesh;
pub mod renderer;
pub mod texture;
