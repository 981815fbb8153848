//! 遍历与路径查找
//!
//! 基于邻接表的 BFS/DFS、可达性、n 跳邻居和按跳数的最短路径

use crate::error::{Error, Result};
use crate::graph::{Graph, VertexId};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::trace;

/// 路径结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathResult {
    /// 路径上的顶点序列
    pub vertices: Vec<VertexId>,
    /// 路径长度（边数）
    pub length: usize,
    /// 路径总权重
    pub total_weight: f64,
}

impl PathResult {
    pub(crate) fn with_start(start: VertexId) -> Self {
        Self {
            vertices: vec![start],
            length: 0,
            total_weight: 0.0,
        }
    }

    /// 由顶点序列构造，沿途解析每条边的权重
    pub(crate) fn from_vertices<V, E>(graph: &Graph<V, E>, vertices: Vec<VertexId>) -> Result<Self> {
        let mut total_weight = 0.0;
        for pair in vertices.windows(2) {
            let edge = graph.edge(pair[0], pair[1]).ok_or(Error::EdgeNotFound {
                source_id: pair[0],
                destination_id: pair[1],
            })?;
            total_weight += graph.edge_weight(edge)?;
        }

        Ok(Self {
            length: vertices.len().saturating_sub(1),
            vertices,
            total_weight,
        })
    }
}

/// 路径查找器
pub struct PathFinder<'g, V, E> {
    pub(crate) graph: &'g Graph<V, E>,
}

impl<'g, V, E> PathFinder<'g, V, E> {
    /// 创建路径查找器
    pub fn new(graph: &'g Graph<V, E>) -> Self {
        Self { graph }
    }

    pub(crate) fn ensure(&self, id: VertexId) -> Result<()> {
        if self.graph.contains_vertex(id) {
            Ok(())
        } else {
            Err(Error::VertexNotFound(id))
        }
    }

    fn neighbors(&self, id: VertexId) -> impl Iterator<Item = VertexId> + 'g {
        let graph: &'g Graph<V, E> = self.graph;
        graph
            .vertex(id)
            .into_iter()
            .flat_map(|v| v.neighborhood())
    }

    /// 广度优先遍历，返回访问顺序
    pub fn breadth_first(&self, start: VertexId) -> Result<Vec<VertexId>> {
        self.ensure(start)?;

        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();

        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            trace!(vertex = %current, "BFS 访问");
            order.push(current);
            for neighbor in self.neighbors(current) {
                if visited.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        Ok(order)
    }

    /// 深度优先遍历（先序），邻居按邻接表顺序展开
    pub fn depth_first(&self, start: VertexId) -> Result<Vec<VertexId>> {
        self.ensure(start)?;

        let mut order = Vec::new();
        let mut visited = HashSet::new();
        let mut stack = vec![start];

        while let Some(current) = stack.pop() {
            if !visited.insert(current) {
                continue;
            }
            trace!(vertex = %current, "DFS 访问");
            order.push(current);

            // 逆序入栈，保证按邻接表顺序出栈
            let mut next: Vec<_> = self
                .neighbors(current)
                .filter(|n| !visited.contains(n))
                .collect();
            next.reverse();
            stack.extend(next);
        }

        Ok(order)
    }

    /// 按跳数的最短路径（BFS）
    pub fn shortest_hops(&self, start: VertexId, end: VertexId) -> Result<Option<PathResult>> {
        self.ensure(start)?;
        self.ensure(end)?;

        if start == end {
            return Ok(Some(PathResult::with_start(start)));
        }

        let mut visited = HashSet::new();
        let mut queue = VecDeque::new();
        let mut parent: HashMap<VertexId, VertexId> = HashMap::new();

        visited.insert(start);
        queue.push_back(start);

        while let Some(current) = queue.pop_front() {
            for neighbor in self.neighbors(current) {
                if visited.insert(neighbor) {
                    parent.insert(neighbor, current);
                    queue.push_back(neighbor);

                    if neighbor == end {
                        let vertices = reconstruct_path(start, end, &parent);
                        return PathResult::from_vertices(self.graph, vertices).map(Some);
                    }
                }
            }
        }

        Ok(None)
    }

    /// 判断两点是否连通
    pub fn is_reachable(&self, start: VertexId, end: VertexId) -> Result<bool> {
        self.ensure(end)?;
        Ok(self.breadth_first(start)?.contains(&end))
    }

    /// 获取恰好 n 跳可达（首次发现）的邻居
    pub fn n_hop_neighbors(&self, start: VertexId, n: usize) -> Result<HashSet<VertexId>> {
        self.ensure(start)?;

        let mut current_level = HashSet::new();
        current_level.insert(start);

        let mut visited = HashSet::new();
        visited.insert(start);

        for _ in 0..n {
            let mut next_level = HashSet::new();
            for &vertex in &current_level {
                for neighbor in self.neighbors(vertex) {
                    if visited.insert(neighbor) {
                        next_level.insert(neighbor);
                    }
                }
            }
            current_level = next_level;
        }

        Ok(current_level)
    }

    /// 查找所有简单路径（限制深度）
    pub fn all_paths(
        &self,
        start: VertexId,
        end: VertexId,
        max_depth: usize,
    ) -> Result<Vec<PathResult>> {
        self.ensure(start)?;
        self.ensure(end)?;

        let mut found = Vec::new();
        let mut path = vec![start];
        let mut visited = HashSet::new();
        visited.insert(start);

        self.dfs_all_paths(start, end, max_depth, &mut visited, &mut path, &mut found);

        found
            .into_iter()
            .map(|vertices| PathResult::from_vertices(self.graph, vertices))
            .collect()
    }

    fn dfs_all_paths(
        &self,
        current: VertexId,
        end: VertexId,
        remaining_depth: usize,
        visited: &mut HashSet<VertexId>,
        path: &mut Vec<VertexId>,
        found: &mut Vec<Vec<VertexId>>,
    ) {
        if current == end {
            found.push(path.clone());
            return;
        }

        if remaining_depth == 0 {
            return;
        }

        for neighbor in self.neighbors(current) {
            if visited.insert(neighbor) {
                path.push(neighbor);
                self.dfs_all_paths(neighbor, end, remaining_depth - 1, visited, path, found);
                path.pop();
                visited.remove(&neighbor);
            }
        }
    }
}

/// 从父指针表重构路径
pub(crate) fn reconstruct_path(
    start: VertexId,
    end: VertexId,
    parent: &HashMap<VertexId, VertexId>,
) -> Vec<VertexId> {
    let mut vertices = vec![end];
    let mut current = end;

    while current != start {
        match parent.get(&current) {
            Some(&prev) => {
                vertices.push(prev);
                current = prev;
            }
            None => break,
        }
    }

    vertices.reverse();
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Weight;

    /// 1 -> 2 -> 3 -> 4
    ///  \-> 5 -> 4
    fn create_test_graph() -> Graph {
        let mut graph = Graph::new();
        let ids: Vec<_> = (0..5).map(|_| graph.add_vertex(None, None).unwrap()).collect();
        let (v1, v2, v3, v4, v5) = (ids[0], ids[1], ids[2], ids[3], ids[4]);

        graph.connect(v1, v2, 1.0).unwrap();
        graph.connect(v2, v3, 1.0).unwrap();
        graph.connect(v3, v4, 1.0).unwrap();
        graph.connect(v1, v5, 4.0).unwrap();
        graph.connect(v5, v4, Weight::Unset).unwrap();

        graph
    }

    fn id(n: u64) -> VertexId {
        VertexId::new(n)
    }

    #[test]
    fn test_breadth_first() {
        let graph = create_test_graph();
        let finder = PathFinder::new(&graph);

        assert_eq!(
            finder.breadth_first(id(1)).unwrap(),
            vec![id(1), id(2), id(5), id(3), id(4)]
        );
    }

    #[test]
    fn test_depth_first() {
        let graph = create_test_graph();
        let finder = PathFinder::new(&graph);

        assert_eq!(
            finder.depth_first(id(1)).unwrap(),
            vec![id(1), id(2), id(3), id(4), id(5)]
        );
    }

    #[test]
    fn test_shortest_hops() {
        let graph = create_test_graph();
        let finder = PathFinder::new(&graph);

        let path = finder.shortest_hops(id(1), id(4)).unwrap().unwrap();
        assert_eq!(path.vertices, vec![id(1), id(5), id(4)]);
        assert_eq!(path.length, 2);
        // 4 + 默认权重 1
        assert_eq!(path.total_weight, 5.0);

        assert!(finder.shortest_hops(id(4), id(1)).unwrap().is_none());
        let trivial = finder.shortest_hops(id(3), id(3)).unwrap().unwrap();
        assert_eq!(trivial.length, 0);
    }

    #[test]
    fn test_unknown_vertex() {
        let graph = create_test_graph();
        let finder = PathFinder::new(&graph);

        assert!(matches!(
            finder.breadth_first(id(99)),
            Err(Error::VertexNotFound(_))
        ));
        assert!(matches!(
            finder.shortest_hops(id(1), id(99)),
            Err(Error::VertexNotFound(_))
        ));
    }

    #[test]
    fn test_all_paths() {
        let graph = create_test_graph();
        let finder = PathFinder::new(&graph);

        let paths = finder.all_paths(id(1), id(4), 5).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].vertices, vec![id(1), id(2), id(3), id(4)]);
        assert_eq!(paths[0].total_weight, 3.0);

        // 深度不足时只剩短路径
        let short = finder.all_paths(id(1), id(4), 2).unwrap();
        assert_eq!(short.len(), 1);
    }

    #[test]
    fn test_is_reachable() {
        let graph = create_test_graph();
        let finder = PathFinder::new(&graph);

        assert!(finder.is_reachable(id(1), id(4)).unwrap());
        assert!(!finder.is_reachable(id(4), id(1)).unwrap());
    }

    #[test]
    fn test_n_hop_neighbors() {
        let graph = create_test_graph();
        let finder = PathFinder::new(&graph);

        let one_hop = finder.n_hop_neighbors(id(1), 1).unwrap();
        assert_eq!(one_hop, HashSet::from([id(2), id(5)]));

        let two_hop = finder.n_hop_neighbors(id(1), 2).unwrap();
        assert_eq!(two_hop, HashSet::from([id(3), id(4)]));
    }
}
