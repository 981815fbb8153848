//! 错误类型定义

use crate::graph::VertexId;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("无效参数: {0}")]
    InvalidArgument(String),

    #[error("权重函数失败 ({source_id} -> {destination_id}): {cause}")]
    ResolverFailure {
        source_id: VertexId,
        destination_id: VertexId,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("顶点不存在: {0}")]
    VertexNotFound(VertexId),

    #[error("顶点已存在: {0}")]
    VertexAlreadyExists(VertexId),

    #[error("顶点 ID 已耗尽")]
    VertexIdExhausted,

    #[error("边不存在: {source_id} -> {destination_id}")]
    EdgeNotFound {
        source_id: VertexId,
        destination_id: VertexId,
    },

    #[error("负权重边 {source_id} -> {destination_id}: {weight}")]
    NegativeWeight {
        source_id: VertexId,
        destination_id: VertexId,
        weight: f64,
    },

    #[error("导入错误: {0}")]
    ImportError(String),

    #[error("序列化错误: {0}")]
    SerializationError(String),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}

impl From<csv::Error> for Error {
    fn from(e: csv::Error) -> Self {
        Error::ImportError(format!("CSV 解析错误: {}", e))
    }
}
