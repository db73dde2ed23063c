/// Relatedness matrix heatmap
pub mod heatmap;

pub use heatmap::Heatmap;
