//! 边定义
//!
//! 边由源顶点的邻接表独占，通过 `VertexId` 句柄引用目标顶点。
//! 权重可以是固定值，也可以是每次读取时根据两个端点重新计算的权重函数。

use crate::error::{Error, Result};
use crate::graph::vertex::{Vertex, VertexId};
use std::fmt;
use std::sync::Arc;

/// 权重函数：根据源顶点和目标顶点计算边的权重
pub type Resolver<V, E> =
    Arc<dyn Fn(&Vertex<V, E>, &Vertex<V, E>) -> anyhow::Result<f64> + Send + Sync>;

/// 边权重，任一时刻只有一种状态生效
pub enum Weight<V, E> {
    /// 未设置，读取时为 1
    Unset,
    /// 固定权重
    Fixed(f64),
    /// 动态权重，每次读取都重新调用
    Dynamic(Resolver<V, E>),
}

impl<V, E> Weight<V, E> {
    /// 由闭包创建动态权重
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(&Vertex<V, E>, &Vertex<V, E>) -> anyhow::Result<f64> + Send + Sync + 'static,
    {
        Weight::Dynamic(Arc::new(f))
    }

    /// 是否定义了权重（固定值或权重函数）
    pub fn is_defined(&self) -> bool {
        !matches!(self, Weight::Unset)
    }

    /// 固定权重值
    pub fn as_fixed(&self) -> Option<f64> {
        match self {
            Weight::Fixed(w) => Some(*w),
            _ => None,
        }
    }

    /// 固定权重必须是有限数
    pub fn validate(&self) -> Result<()> {
        match self {
            Weight::Fixed(w) => finite(*w).map(|_| ()),
            _ => Ok(()),
        }
    }
}

/// 拒绝 NaN 和无穷大
fn finite(w: f64) -> Result<f64> {
    if w.is_finite() {
        Ok(w)
    } else {
        Err(Error::invalid(format!("权重必须是有限数: {}", w)))
    }
}

impl<V, E> Clone for Weight<V, E> {
    fn clone(&self) -> Self {
        match self {
            Weight::Unset => Weight::Unset,
            Weight::Fixed(w) => Weight::Fixed(*w),
            Weight::Dynamic(f) => Weight::Dynamic(Arc::clone(f)),
        }
    }
}

impl<V, E> Default for Weight<V, E> {
    fn default() -> Self {
        Weight::Unset
    }
}

impl<V, E> fmt::Debug for Weight<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Weight::Unset => f.write_str("Unset"),
            Weight::Fixed(w) => f.debug_tuple("Fixed").field(w).finish(),
            Weight::Dynamic(_) => f.write_str("Dynamic(<fn>)"),
        }
    }
}

impl<V, E> From<f64> for Weight<V, E> {
    fn from(w: f64) -> Self {
        Weight::Fixed(w)
    }
}

impl<V, E> From<Option<f64>> for Weight<V, E> {
    fn from(w: Option<f64>) -> Self {
        w.map_or(Weight::Unset, Weight::Fixed)
    }
}

/// 边
pub struct Edge<V, E> {
    /// 源顶点 ID
    source: VertexId,
    /// 目标顶点 ID
    destination: VertexId,
    /// 当前生效的权重
    weight: Weight<V, E>,
    /// 被权重函数遮蔽的固定权重，移除权重函数后恢复
    shadowed: Option<f64>,
    /// 附加信息
    metadata: Option<E>,
}

impl<V, E> Edge<V, E> {
    /// 创建新边
    pub fn new(source: VertexId, destination: VertexId, weight: impl Into<Weight<V, E>>) -> Self {
        Self {
            source,
            destination,
            weight: weight.into(),
            shadowed: None,
            metadata: None,
        }
    }

    /// 创建无权重的边
    pub fn unweighted(source: VertexId, destination: VertexId) -> Self {
        Self::new(source, destination, Weight::Unset)
    }

    /// 附加边信息
    pub fn with_metadata(mut self, metadata: E) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// 获取源顶点 ID
    pub fn source(&self) -> VertexId {
        self.source
    }

    /// 获取目标顶点 ID
    pub fn destination(&self) -> VertexId {
        self.destination
    }

    /// 获取附加信息
    pub fn metadata(&self) -> Option<&E> {
        self.metadata.as_ref()
    }

    /// 当前权重状态
    pub fn weight_spec(&self) -> &Weight<V, E> {
        &self.weight
    }

    /// 是否可以解析出权重（固定值或权重函数）
    pub fn has_weight(&self) -> bool {
        self.weight.is_defined()
    }

    /// 当前生效的固定权重
    pub fn fixed_weight(&self) -> Option<f64> {
        self.weight.as_fixed()
    }

    /// 是否为动态权重
    pub fn is_dynamic(&self) -> bool {
        matches!(self.weight, Weight::Dynamic(_))
    }

    /// 解析边的权重
    ///
    /// 存在权重函数时每次都重新调用，不做缓存；否则返回固定权重；都没有时返回 1。
    /// 传入的顶点必须是这条边的两个端点。
    pub fn weight(&self, source: &Vertex<V, E>, destination: &Vertex<V, E>) -> Result<f64> {
        if source.id() != self.source || destination.id() != self.destination {
            return Err(Error::invalid(format!(
                "边 {} -> {} 的端点与传入顶点 {} -> {} 不符",
                self.source,
                self.destination,
                source.id(),
                destination.id()
            )));
        }

        match &self.weight {
            Weight::Dynamic(f) => {
                let w = f(source, destination).map_err(|e| Error::ResolverFailure {
                    source_id: self.source,
                    destination_id: self.destination,
                    cause: e.into(),
                })?;
                if !w.is_finite() {
                    return Err(Error::ResolverFailure {
                        source_id: self.source,
                        destination_id: self.destination,
                        cause: format!("权重函数返回非有限值 {}", w).into(),
                    });
                }
                Ok(w)
            }
            Weight::Fixed(w) => finite(*w),
            Weight::Unset => Ok(1.0),
        }
    }

    /// 设置固定权重，覆盖当前的权重函数；NaN 和无穷大被拒绝且边保持不变
    pub fn set_weight(&mut self, w: f64) -> Result<()> {
        self.weight = Weight::Fixed(finite(w)?);
        self.shadowed = None;
        Ok(())
    }

    /// 设置权重函数，当前的固定权重被遮蔽
    pub fn set_weight_function<F>(&mut self, f: F)
    where
        F: Fn(&Vertex<V, E>, &Vertex<V, E>) -> anyhow::Result<f64> + Send + Sync + 'static,
    {
        self.set_resolver(Arc::new(f));
    }

    /// 设置共享的权重函数
    pub fn set_resolver(&mut self, resolver: Resolver<V, E>) {
        if let Weight::Fixed(w) = self.weight {
            self.shadowed = Some(w);
        }
        self.weight = Weight::Dynamic(resolver);
    }

    /// 移除权重函数，恢复被遮蔽的固定权重（若有）
    pub fn remove_weight_function(&mut self) {
        if let Weight::Dynamic(_) = self.weight {
            self.weight = self.shadowed.take().into();
        }
    }

    /// 清除权重
    pub fn clear_weight(&mut self) {
        self.weight = Weight::Unset;
        self.shadowed = None;
    }

    /// 是否连接相同的一对顶点
    pub fn same_endpoints(&self, other: &Edge<V, E>) -> bool {
        self.source == other.source && self.destination == other.destination
    }
}

impl<V, E: Clone> Clone for Edge<V, E> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            destination: self.destination,
            weight: self.weight.clone(),
            shadowed: self.shadowed,
            metadata: self.metadata.clone(),
        }
    }
}

impl<V, E: fmt::Debug> fmt::Debug for Edge<V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Edge")
            .field("source", &self.source)
            .field("destination", &self.destination)
            .field("weight", &self.weight)
            .field("metadata", &self.metadata)
            .finish()
    }
}
