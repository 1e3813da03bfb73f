pub mod gpu;
pub mod headless;
#[cfg(not(target_arch = "wasm32"))]
pub mod native;
pub mod shared;
#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use gpu::GpuBackdrop;
pub use headless::HeadlessRenderer;
#[cfg(not(target_arch = "wasm32"))]
pub use native::Renderer;
#[cfg(target_arch = "wasm32")]
pub use wasm::Renderer;
