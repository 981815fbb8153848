//! 带权最短路径
//!
//! Dijkstra 与 A*，边权在松弛时按需解析

use super::path_finder::{reconstruct_path, PathFinder, PathResult};
use crate::error::{Error, Result};
use crate::graph::{Vertex, VertexId};
use priority_queue::PriorityQueue;
use std::cmp::{Ordering, Reverse};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

/// 可全序比较的路径代价
#[derive(Debug, Clone, Copy, PartialEq)]
struct Cost(f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl<'g, V, E> PathFinder<'g, V, E> {
    /// Dijkstra 最短路径，负权重边返回错误
    pub fn dijkstra(&self, start: VertexId, end: VertexId) -> Result<Option<PathResult>> {
        self.search("dijkstra", start, end, |_, _| 0.0)
    }

    /// A* 最短路径
    ///
    /// `heuristic(v, goal)` 估计 v 到终点的剩余代价，需满足一致性才能保证最优。
    pub fn a_star<H>(&self, start: VertexId, end: VertexId, heuristic: H) -> Result<Option<PathResult>>
    where
        H: Fn(&Vertex<V, E>, &Vertex<V, E>) -> f64,
    {
        self.search("a_star", start, end, heuristic)
    }

    fn search<H>(
        &self,
        algorithm: &'static str,
        start: VertexId,
        end: VertexId,
        heuristic: H,
    ) -> Result<Option<PathResult>>
    where
        H: Fn(&Vertex<V, E>, &Vertex<V, E>) -> f64,
    {
        debug!(algorithm, start = %start, end = %end, "开始最短路径搜索");
        self.ensure(start)?;
        self.ensure(end)?;

        let goal = self.graph.vertex(end).ok_or(Error::VertexNotFound(end))?;
        let estimate = |id: VertexId| {
            self.graph
                .vertex(id)
                .map_or(0.0, |v| heuristic(v, goal))
        };

        let mut dist: HashMap<VertexId, f64> = HashMap::new();
        let mut parent: HashMap<VertexId, VertexId> = HashMap::new();
        let mut settled = HashSet::new();
        let mut open = PriorityQueue::new();

        dist.insert(start, 0.0);
        open.push(start, Reverse(Cost(estimate(start))));

        while let Some((current, _)) = open.pop() {
            if current == end {
                let vertices = reconstruct_path(start, end, &parent);
                return PathResult::from_vertices(self.graph, vertices).map(Some);
            }
            if !settled.insert(current) {
                continue;
            }

            let g = dist[&current];
            trace!(algorithm, vertex = %current, cost = g, "展开顶点");

            let Some(vertex) = self.graph.vertex(current) else {
                continue;
            };
            for edge in vertex.edges() {
                let next = edge.destination();
                if settled.contains(&next) {
                    continue;
                }

                let w = self.graph.edge_weight(edge)?;
                if w < 0.0 {
                    return Err(Error::NegativeWeight {
                        source_id: current,
                        destination_id: next,
                        weight: w,
                    });
                }

                let candidate = g + w;
                if dist.get(&next).map_or(true, |&d| candidate < d) {
                    trace!(algorithm, from = %current, to = %next, cost = candidate, "松弛");
                    dist.insert(next, candidate);
                    parent.insert(next, current);
                    open.push_increase(next, Reverse(Cost(candidate + estimate(next))));
                }
            }
        }

        Ok(None)
    }
}
