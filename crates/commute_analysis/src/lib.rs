pub mod accumulator;
pub mod analysis;
pub mod batch;
pub mod borough;
mod colormap;
pub mod office;
pub mod renderer;
pub mod sampler;
pub mod statistics;
