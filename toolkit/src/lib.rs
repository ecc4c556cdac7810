//! Leaf tools for the toolgraph engine
//!
//! Thin, single-purpose collaborators with no composition logic of
//! their own: position mappers deriving geometry from config, croppers
//! doing coordinate bookkeeping over grid values, and a renderer
//! formatting value trees for the terminal. Each plugs into any
//! combinator through the core `Tool` contract.

pub mod cropper;
pub mod mapper;
pub mod render;

pub use cropper::{Cropper, RegionCropper};
pub use mapper::PositionMapper;
pub use render::TextRenderer;
