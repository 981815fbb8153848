//! 图算法模块
//!
//! 包含遍历、按跳数/带权最短路径和平面坐标权重

mod path_finder;
mod planar;
mod shortest_path;

pub use path_finder::{PathFinder, PathResult};
pub use planar::{euclidean_heuristic, euclidean_resolver, Planar};
