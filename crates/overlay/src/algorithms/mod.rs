pub mod threshold;
pub mod extraction;
pub mod palette;
pub mod blending;
pub mod drawing;
pub mod text;

pub use threshold::*;
pub use extraction::*;
pub use palette::*;
pub use blending::*;
pub use drawing::*;
pub use text::*;
