//! adjgraph - 面向算法原型的有向图库
//!
//! 提供：
//! - 带任意附加信息的顶点和按插入顺序的邻接表
//! - 固定权重或按端点动态计算的边权重
//! - 遍历、最短路径（BFS/Dijkstra/A*）等图算法
//! - 从 CSV、JSON 导入图

pub mod algorithm;
pub mod error;
pub mod graph;
pub mod import;

// 重导出常用类型
pub use algorithm::{PathFinder, PathResult};
pub use error::{Error, Result};
pub use graph::{Edge, EdgeInsertion, Graph, Resolver, Vertex, VertexId, Weight};
pub use import::{GraphImporter, ImportOptions, ImportStats, JsonGraph};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
