//! 顶点定义
//!
//! 顶点独占自己的出边邻接表，邻接表中同一对 (源, 目标) 最多出现一次。

use crate::error::{Error, Result};
use crate::graph::edge::Edge;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use tracing::debug;

/// 顶点句柄，由图分配，删除后不复用
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VertexId(u64);

impl VertexId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// 下一个可分配的 ID，`u64::MAX` 之后没有可用 ID
    pub(crate) fn successor(self) -> Result<VertexId> {
        self.0
            .checked_add(1)
            .map(VertexId)
            .ok_or(Error::VertexIdExhausted)
    }
}

impl From<u64> for VertexId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<VertexId> for u64 {
    fn from(id: VertexId) -> Self {
        id.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 插入边的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeInsertion {
    /// 追加到邻接表末尾
    Appended,
    /// 替换了权重更大的同端点边
    Replaced,
    /// 已存在同端点的边，邻接表未改变
    Kept,
}

/// 顶点
pub struct Vertex<V, E> {
    /// 顶点 ID
    id: VertexId,
    /// 显示名称
    name: Option<String>,
    /// 附加信息（坐标、状态等），供权重函数或启发函数使用
    metadata: Option<V>,
    /// 出边邻接表，按插入顺序
    edges: Vec<Edge<V, E>>,
}

impl<V, E> Vertex<V, E> {
    /// 创建新顶点
    pub fn new(id: VertexId) -> Self {
        Self {
            id,
            name: None,
            metadata: None,
            edges: Vec::new(),
        }
    }

    /// 设置显示名称
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.set_name(Some(name.into()));
        self
    }

    /// 设置附加信息
    pub fn with_metadata(mut self, metadata: V) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// 获取顶点 ID
    pub fn id(&self) -> VertexId {
        self.id
    }

    /// 显示名称，未设置时为 ID 的字符串形式
    pub fn name(&self) -> Cow<'_, str> {
        match &self.name {
            Some(name) => Cow::Borrowed(name),
            None => Cow::Owned(self.id.to_string()),
        }
    }

    /// 显式设置的名称
    pub fn explicit_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// 设置名称，空字符串视为未设置
    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name.filter(|n| !n.is_empty());
    }

    pub fn metadata(&self) -> Option<&V> {
        self.metadata.as_ref()
    }

    pub fn metadata_mut(&mut self) -> Option<&mut V> {
        self.metadata.as_mut()
    }

    pub fn set_metadata(&mut self, metadata: Option<V>) {
        self.metadata = metadata;
    }

    /// 出边列表
    pub fn edges(&self) -> &[Edge<V, E>] {
        &self.edges
    }

    /// 指向目标顶点的边
    pub fn edge(&self, destination: VertexId) -> Option<&Edge<V, E>> {
        self.edges.iter().find(|e| e.destination() == destination)
    }

    /// 指向目标顶点的边（可变），用于重新绑定权重
    pub fn edge_mut(&mut self, destination: VertexId) -> Option<&mut Edge<V, E>> {
        self.edges.iter_mut().find(|e| e.destination() == destination)
    }

    /// 添加出边
    ///
    /// 若已存在同一对 (源, 目标) 的边：仅当两条边都有固定权重且已有边的权重严格更大时，
    /// 用新边替换；否则保持不变。不存在时追加到末尾。固定权重为 NaN 或无穷大时拒绝。
    pub fn add_edge(&mut self, e: Edge<V, E>) -> Result<EdgeInsertion> {
        if e.source() != self.id {
            return Err(Error::invalid(format!(
                "边的源顶点 {} 不是顶点 {}",
                e.source(),
                self.id
            )));
        }
        e.weight_spec().validate()?;

        if let Some(slot) = self.edges.iter_mut().find(|x| x.same_endpoints(&e)) {
            return Ok(match (slot.fixed_weight(), e.fixed_weight()) {
                (Some(old), Some(new)) if old > new => {
                    debug!(
                        source = %self.id,
                        destination = %e.destination(),
                        old,
                        new,
                        "替换为权重更小的边"
                    );
                    *slot = e;
                    EdgeInsertion::Replaced
                }
                _ => EdgeInsertion::Kept,
            });
        }

        self.edges.push(e);
        Ok(EdgeInsertion::Appended)
    }

    /// 移除指向目标顶点的边
    pub fn remove_edge(&mut self, destination: VertexId) -> Option<Edge<V, E>> {
        let pos = self
            .edges
            .iter()
            .position(|e| e.destination() == destination)?;
        Some(self.edges.remove(pos))
    }

    /// 邻域：按邻接表顺序返回每条边的目标顶点
    pub fn neighborhood(&self) -> impl ExactSizeIterator<Item = VertexId> + '_ {
        self.edges.iter().map(|e| e.destination())
    }

    /// 出度
    pub fn out_degree(&self) -> usize {
        self.edges.len()
    }

    pub fn has_edges(&self) -> bool {
        !self.edges.is_empty()
    }
}

impl<V, E> PartialEq for Vertex<V, E> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<V, E> Eq for Vertex<V, E> {}

impl<V: Clone, E: Clone> Clone for Vertex<V, E> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            name: self.name.clone(),
            metadata: self.metadata.clone(),
            edges: self.edges.clone(),
        }
    }
}

impl<V: fmt::Debug, E: fmt::Debug> fmt::Debug for Vertex<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vertex")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("metadata", &self.metadata)
            .field("edges", &self.edges)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::edge::Weight;

    type V = Vertex<(), ()>;

    fn vertex(id: u64) -> V {
        Vertex::new(VertexId::new(id))
    }

    #[test]
    fn test_vertex_id_successor() {
        assert_eq!(VertexId::new(7).successor().unwrap(), VertexId::new(8));
        assert!(matches!(
            VertexId::new(u64::MAX).successor(),
            Err(Error::VertexIdExhausted)
        ));
        assert_eq!(u64::from(VertexId::from(9)), 9);
        assert_eq!(serde_json::to_string(&VertexId::new(3)).unwrap(), "3");
    }

    #[test]
    fn test_vertex_name_fallback() {
        let mut v = vertex(7);
        assert_eq!(v.name(), "7");

        v.set_name(Some("A".to_string()));
        assert_eq!(v.name(), "A");

        v.set_name(Some(String::new()));
        assert_eq!(v.name(), "7");
        assert_eq!(v.explicit_name(), None);
    }

    #[test]
    fn test_vertex_equality_by_id() {
        let a = vertex(1).with_name("A");
        let b = vertex(1).with_name("B");
        let c = vertex(2).with_name("A");

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_add_edge_cheaper_replaces() {
        let mut a = vertex(1);
        let b = VertexId::new(2);

        assert_eq!(a.add_edge(Edge::new(a.id(), b, 5.0)).unwrap(), EdgeInsertion::Appended);
        assert_eq!(a.add_edge(Edge::new(a.id(), b, 3.0)).unwrap(), EdgeInsertion::Replaced);

        assert_eq!(a.out_degree(), 1);
        assert_eq!(a.edge(b).unwrap().fixed_weight(), Some(3.0));
    }

    #[test]
    fn test_add_edge_costlier_kept_out() {
        let mut a = vertex(1);
        let b = VertexId::new(2);

        a.add_edge(Edge::new(a.id(), b, 3.0)).unwrap();
        assert_eq!(a.add_edge(Edge::new(a.id(), b, 5.0)).unwrap(), EdgeInsertion::Kept);
        // 相同权重也不替换
        assert_eq!(a.add_edge(Edge::new(a.id(), b, 3.0)).unwrap(), EdgeInsertion::Kept);

        assert_eq!(a.out_degree(), 1);
        assert_eq!(a.edge(b).unwrap().fixed_weight(), Some(3.0));
    }

    #[test]
    fn test_add_edge_undefined_weight_never_replaced() {
        let mut a = vertex(1);
        let b = VertexId::new(2);

        a.add_edge(Edge::unweighted(a.id(), b)).unwrap();
        assert_eq!(a.add_edge(Edge::new(a.id(), b, 5.0)).unwrap(), EdgeInsertion::Kept);

        assert_eq!(a.out_degree(), 1);
        assert!(!a.edges()[0].has_weight());
    }

    #[test]
    fn test_add_edge_dynamic_not_compared() {
        let mut a = vertex(1);
        let b = VertexId::new(2);

        a.add_edge(Edge::new(a.id(), b, Weight::dynamic(|_, _| Ok(100.0))))
            .unwrap();
        assert_eq!(a.add_edge(Edge::new(a.id(), b, 1.0)).unwrap(), EdgeInsertion::Kept);
        assert!(a.edges()[0].is_dynamic());
    }

    #[test]
    fn test_add_edge_wrong_source() {
        let mut a = vertex(1);
        let err = a
            .add_edge(Edge::new(VertexId::new(9), VertexId::new(2), 1.0))
            .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        assert!(!a.has_edges());
    }

    #[test]
    fn test_add_edge_rejects_nan_weight() {
        let mut a = vertex(1);
        let b = VertexId::new(2);
        a.add_edge(Edge::new(a.id(), b, 5.0)).unwrap();

        // NaN 与任何权重比较都为假，不能让它进入邻接表
        let err = a.add_edge(Edge::new(a.id(), VertexId::new(3), f64::NAN)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
        let err = a.add_edge(Edge::new(a.id(), b, f64::INFINITY)).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));

        assert_eq!(a.out_degree(), 1);
        assert_eq!(a.edge(b).unwrap().fixed_weight(), Some(5.0));
    }

    #[test]
    fn test_neighborhood_matches_adjacency() {
        let mut a = vertex(1);
        for d in [4, 2, 3] {
            a.add_edge(Edge::unweighted(a.id(), VertexId::new(d))).unwrap();
        }
        // 重复插入不产生新邻居
        a.add_edge(Edge::unweighted(a.id(), VertexId::new(2))).unwrap();

        let hood: Vec<_> = a.neighborhood().collect();
        assert_eq!(hood.len(), a.edges().len());
        for (i, id) in hood.iter().enumerate() {
            assert_eq!(*id, a.edges()[i].destination());
        }
        assert_eq!(hood, vec![VertexId(4), VertexId(2), VertexId(3)]);
    }

    #[test]
    fn test_remove_edge_preserves_order() {
        let mut a = vertex(1);
        for d in [2, 3, 4] {
            a.add_edge(Edge::unweighted(a.id(), VertexId::new(d))).unwrap();
        }

        let removed = a.remove_edge(VertexId::new(3)).unwrap();
        assert_eq!(removed.destination(), VertexId::new(3));
        assert!(a.remove_edge(VertexId::new(3)).is_none());
        assert_eq!(
            a.neighborhood().collect::<Vec<_>>(),
            vec![VertexId(2), VertexId(4)]
        );
    }
}
