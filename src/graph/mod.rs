//! 图核心模块
//!
//! 定义顶点、边和图容器的核心数据结构

mod edge;
mod graph;
mod vertex;

pub use edge::{Edge, Resolver, Weight};
pub use graph::Graph;
pub use vertex::{EdgeInsertion, Vertex, VertexId};
