//! 平面坐标权重
//!
//! 从顶点附加信息中读取二维坐标，构造欧氏距离权重函数和 A* 启发函数

use crate::graph::{Resolver, Vertex};
use serde_json::Value;
use std::sync::Arc;

/// 可提供平面坐标的顶点附加信息
pub trait Planar {
    fn position(&self) -> Option<[f64; 2]>;
}

impl Planar for [f64; 2] {
    fn position(&self) -> Option<[f64; 2]> {
        Some(*self)
    }
}

impl Planar for (f64, f64) {
    fn position(&self) -> Option<[f64; 2]> {
        Some([self.0, self.1])
    }
}

/// JSON 对象 `{"x": .., "y": ..}` 或数组 `[x, y]`
impl Planar for Value {
    fn position(&self) -> Option<[f64; 2]> {
        match self {
            Value::Object(map) => Some([map.get("x")?.as_f64()?, map.get("y")?.as_f64()?]),
            Value::Array(items) if items.len() == 2 => {
                Some([items[0].as_f64()?, items[1].as_f64()?])
            }
            _ => None,
        }
    }
}

fn position_of<V: Planar, E>(v: &Vertex<V, E>) -> Option<[f64; 2]> {
    v.metadata().and_then(Planar::position)
}

fn distance(p: [f64; 2], q: [f64; 2]) -> f64 {
    (p[0] - q[0]).hypot(p[1] - q[1])
}

/// 欧氏距离权重函数，任一端点缺少坐标时失败
pub fn euclidean_resolver<V, E>() -> Resolver<V, E>
where
    V: Planar + 'static,
    E: 'static,
{
    Arc::new(|source: &Vertex<V, E>, destination: &Vertex<V, E>| -> anyhow::Result<f64> {
        let p = position_of(source)
            .ok_or_else(|| anyhow::anyhow!("顶点 {} 缺少坐标", source.name()))?;
        let q = position_of(destination)
            .ok_or_else(|| anyhow::anyhow!("顶点 {} 缺少坐标", destination.name()))?;
        Ok(distance(p, q))
    })
}

/// 欧氏距离启发函数，坐标未知时退化为 0
pub fn euclidean_heuristic<V: Planar, E>(vertex: &Vertex<V, E>, goal: &Vertex<V, E>) -> f64 {
    match (position_of(vertex), position_of(goal)) {
        (Some(p), Some(q)) => distance(p, q),
        _ => 0.0,
    }
}
