//! 图容器
//!
//! 以 `VertexId` 为键持有全部顶点，负责分配 ID、增删顶点和边以及渲染。

use super::edge::{Edge, Weight};
use super::vertex::{EdgeInsertion, Vertex, VertexId};
use crate::error::{Error, Result};
use indexmap::IndexMap;
use std::fmt;
use tracing::debug;

/// 有向图
pub struct Graph<V = (), E = ()> {
    /// 顶点表（按插入顺序）
    vertices: IndexMap<VertexId, Vertex<V, E>>,
    /// 下一个顶点 ID
    next_vertex_id: VertexId,
}

impl<V, E> Graph<V, E> {
    /// 创建空图
    pub fn new() -> Self {
        Self {
            vertices: IndexMap::new(),
            next_vertex_id: VertexId::new(1),
        }
    }

    // ==================== 顶点操作 ====================

    /// 添加顶点，ID 空间耗尽时失败
    pub fn add_vertex(&mut self, name: Option<&str>, metadata: Option<V>) -> Result<VertexId> {
        let id = self.next_vertex_id;
        self.next_vertex_id = id.successor()?;

        let mut vertex = Vertex::new(id);
        vertex.set_name(name.map(str::to_string));
        vertex.set_metadata(metadata);

        debug!(vertex = %id, name = ?name, "添加顶点");
        self.vertices.insert(id, vertex);
        Ok(id)
    }

    /// 添加具名顶点
    pub fn add_named_vertex(&mut self, name: &str) -> Result<VertexId> {
        self.add_vertex(Some(name), None)
    }

    /// 插入调用方构造的顶点，保留其 ID
    pub fn insert_vertex(&mut self, vertex: Vertex<V, E>) -> Result<VertexId> {
        let id = vertex.id();
        if self.vertices.contains_key(&id) {
            return Err(Error::VertexAlreadyExists(id));
        }
        if vertex.has_edges() {
            return Err(Error::invalid(format!("顶点 {} 插入时不能带有边", id)));
        }

        self.next_vertex_id = self.next_vertex_id.max(id.successor()?);
        self.vertices.insert(id, vertex);
        Ok(id)
    }

    /// 删除顶点，同时删除其他顶点指向它的边
    pub fn remove_vertex(&mut self, id: VertexId) -> Result<Vertex<V, E>> {
        let vertex = self
            .vertices
            .shift_remove(&id)
            .ok_or(Error::VertexNotFound(id))?;

        let mut inbound = 0;
        for other in self.vertices.values_mut() {
            if other.remove_edge(id).is_some() {
                inbound += 1;
            }
        }

        debug!(vertex = %id, outbound = vertex.out_degree(), inbound, "删除顶点");
        Ok(vertex)
    }

    /// 获取顶点
    pub fn vertex(&self, id: VertexId) -> Option<&Vertex<V, E>> {
        self.vertices.get(&id)
    }

    /// 获取顶点（可变）
    pub fn vertex_mut(&mut self, id: VertexId) -> Option<&mut Vertex<V, E>> {
        self.vertices.get_mut(&id)
    }

    /// 通过名称查找顶点（第一个匹配）
    pub fn vertex_by_name(&self, name: &str) -> Option<&Vertex<V, E>> {
        self.vertices.values().find(|v| v.name() == name)
    }

    pub fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertices.contains_key(&id)
    }

    /// 按插入顺序遍历顶点
    pub fn vertices(&self) -> impl Iterator<Item = &Vertex<V, E>> + '_ {
        self.vertices.values()
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices.keys().copied()
    }

    /// 获取顶点数量
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn require(&self, id: VertexId) -> Result<&Vertex<V, E>> {
        self.vertices.get(&id).ok_or(Error::VertexNotFound(id))
    }

    // ==================== 边操作 ====================

    /// 添加边，端点必须都在图中
    pub fn add_edge(&mut self, edge: Edge<V, E>) -> Result<EdgeInsertion> {
        let (src, dst) = (edge.source(), edge.destination());
        if !self.vertices.contains_key(&dst) {
            return Err(Error::invalid(format!("目标顶点 {} 不存在", dst)));
        }
        let source = self
            .vertices
            .get_mut(&src)
            .ok_or_else(|| Error::invalid(format!("源顶点 {} 不存在", src)))?;

        let outcome = source.add_edge(edge)?;
        debug!(source = %src, destination = %dst, ?outcome, "添加边");
        Ok(outcome)
    }

    /// 连接两个顶点
    pub fn connect(
        &mut self,
        source: VertexId,
        destination: VertexId,
        weight: impl Into<Weight<V, E>>,
    ) -> Result<EdgeInsertion> {
        self.add_edge(Edge::new(source, destination, weight))
    }

    /// 删除边
    pub fn remove_edge(&mut self, source: VertexId, destination: VertexId) -> Result<Edge<V, E>> {
        let not_found = Error::EdgeNotFound {
            source_id: source,
            destination_id: destination,
        };
        let edge = self
            .vertices
            .get_mut(&source)
            .and_then(|v| v.remove_edge(destination))
            .ok_or(not_found)?;

        debug!(source = %source, destination = %destination, "删除边");
        Ok(edge)
    }

    /// 获取边
    pub fn edge(&self, source: VertexId, destination: VertexId) -> Option<&Edge<V, E>> {
        self.vertices.get(&source)?.edge(destination)
    }

    /// 获取边（可变）
    pub fn edge_mut(&mut self, source: VertexId, destination: VertexId) -> Option<&mut Edge<V, E>> {
        self.vertices.get_mut(&source)?.edge_mut(destination)
    }

    /// 获取边数量
    pub fn edge_count(&self) -> usize {
        self.vertices.values().map(Vertex::out_degree).sum()
    }

    /// 解析边的权重
    pub fn edge_weight(&self, edge: &Edge<V, E>) -> Result<f64> {
        let source = self.require(edge.source())?;
        let destination = self.require(edge.destination())?;
        edge.weight(source, destination)
    }

    // ==================== 邻居查询 ====================

    /// 顶点的邻域（按邻接表顺序的目标顶点）
    pub fn neighborhood(&self, id: VertexId) -> Result<Vec<&Vertex<V, E>>> {
        self.require(id)?
            .neighborhood()
            .map(|n| self.require(n))
            .collect()
    }

    // ==================== 渲染 ====================

    /// 渲染边：`(源, 目标[, 权重])`，仅当可解析出权重时带权重
    pub fn display_edge(&self, edge: &Edge<V, E>) -> Result<String> {
        self.edge_text(edge, false)
    }

    /// `lossy` 时权重解析失败写成 `<error: ..>` 占位而不返回错误
    fn edge_text(&self, edge: &Edge<V, E>, lossy: bool) -> Result<String> {
        let source = self.require(edge.source())?;
        let destination = self.require(edge.destination())?;

        let mut out = format!("({}, {}", source.name(), destination.name());
        if edge.has_weight() {
            match edge.weight(source, destination) {
                Ok(w) => out.push_str(&format!(", {}", w)),
                Err(e) if lossy => out.push_str(&format!(", <error: {}>", e)),
                Err(e) => return Err(e),
            }
        }
        out.push(')');
        Ok(out)
    }

    /// 渲染顶点：名称，若有边则接 `": "` 和逗号分隔的边
    pub fn display_vertex(&self, id: VertexId) -> Result<String> {
        let vertex = self.require(id)?;
        let mut out = vertex.name().into_owned();
        if vertex.has_edges() {
            let edges = vertex
                .edges()
                .iter()
                .map(|e| self.display_edge(e))
                .collect::<Result<Vec<_>>>()?;
            out.push_str(": ");
            out.push_str(&edges.join(", "));
        }
        Ok(out)
    }
}

impl<V, E> Default for Graph<V, E> {
    fn default() -> Self {
        Self::new()
    }
}

/// 逐行渲染每个顶点；权重函数失败时写占位文本，需要错误时用 `display_vertex`
impl<V, E> fmt::Display for Graph<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for vertex in self.vertices() {
            f.write_str(&vertex.name())?;
            for (i, edge) in vertex.edges().iter().enumerate() {
                f.write_str(if i == 0 { ": " } else { ", " })?;
                match self.edge_text(edge, true) {
                    Ok(text) => f.write_str(&text)?,
                    Err(e) => write!(f, "<error: {}>", e)?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
