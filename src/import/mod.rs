//! 数据导入模块
//!
//! 支持从 CSV 边列表或 JSON 文档构建图，顶点按名称去重，附加信息保留为 JSON

use crate::error::Result;
use crate::graph::{Edge, EdgeInsertion, Graph, VertexId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// 附加信息为 JSON 的图
pub type JsonGraph = Graph<Value, Value>;

/// 导入选项
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// CSV 分隔符
    pub delimiter: u8,
    /// CSV 是否带表头
    pub has_headers: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            has_headers: true,
        }
    }
}

/// 导入统计
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ImportStats {
    pub vertices_imported: usize,
    pub edges_appended: usize,
    pub edges_replaced: usize,
    pub edges_kept: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

impl ImportStats {
    fn record(&mut self, outcome: EdgeInsertion) {
        match outcome {
            EdgeInsertion::Appended => self.edges_appended += 1,
            EdgeInsertion::Replaced => self.edges_replaced += 1,
            EdgeInsertion::Kept => self.edges_kept += 1,
        }
    }
}

/// CSV 边记录：`source,destination[,weight]`
#[derive(Debug, Deserialize)]
struct EdgeRecord {
    source: String,
    destination: String,
    #[serde(default)]
    weight: Option<f64>,
}

/// JSON 图文档
#[derive(Debug, Deserialize)]
struct GraphDocument {
    #[serde(default)]
    vertices: Vec<VertexDocument>,
    #[serde(default)]
    edges: Vec<EdgeDocument>,
}

#[derive(Debug, Deserialize)]
struct VertexDocument {
    name: String,
    #[serde(default)]
    metadata: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct EdgeDocument {
    source: String,
    destination: String,
    #[serde(default)]
    weight: Option<f64>,
    #[serde(default)]
    metadata: Option<Value>,
}

/// 图导入器
pub struct GraphImporter<'g> {
    graph: &'g mut JsonGraph,
    options: ImportOptions,
}

impl<'g> GraphImporter<'g> {
    /// 创建导入器，导入到已有的图中
    pub fn new(graph: &'g mut JsonGraph) -> Self {
        Self {
            graph,
            options: ImportOptions::default(),
        }
    }

    /// 设置导入选项
    pub fn with_options(mut self, options: ImportOptions) -> Self {
        self.options = options;
        self
    }

    /// 按显式名称查找顶点，不存在则创建；未命名顶点不会因 ID 与名称相同而匹配
    fn ensure_vertex(&mut self, name: &str, stats: &mut ImportStats) -> Result<VertexId> {
        let existing = self
            .graph
            .vertices()
            .find(|v| v.explicit_name() == Some(name))
            .map(|v| v.id());
        if let Some(id) = existing {
            return Ok(id);
        }
        let id = self.graph.add_named_vertex(name)?;
        stats.vertices_imported += 1;
        Ok(id)
    }

    /// 检查边记录，返回拒绝原因
    fn reject_reason(source: &str, destination: &str, weight: Option<f64>) -> Option<String> {
        if source.is_empty() || destination.is_empty() {
            return Some("源或目标顶点名称为空".to_string());
        }
        match weight {
            Some(w) if !w.is_finite() => Some(format!("权重不是有限数: {}", w)),
            _ => None,
        }
    }

    fn import_edge(
        &mut self,
        source: &str,
        destination: &str,
        weight: Option<f64>,
        metadata: Option<Value>,
        stats: &mut ImportStats,
    ) -> Result<()> {
        let src = self.ensure_vertex(source, stats)?;
        let dst = self.ensure_vertex(destination, stats)?;

        let mut edge = Edge::new(src, dst, weight);
        if let Some(metadata) = metadata {
            edge = edge.with_metadata(metadata);
        }
        let outcome = self.graph.add_edge(edge)?;
        stats.record(outcome);
        Ok(())
    }

    /// 从 CSV 文件导入边列表
    pub fn import_csv<P: AsRef<Path>>(&mut self, path: P) -> Result<ImportStats> {
        let file = File::open(path)?;
        self.read_csv(BufReader::new(file))
    }

    /// 从任意读取器导入 CSV 边列表，格式错误的记录计入 errors 并跳过
    pub fn read_csv<R: Read>(&mut self, reader: R) -> Result<ImportStats> {
        let start = Instant::now();
        let mut stats = ImportStats::default();

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(self.options.delimiter)
            .has_headers(self.options.has_headers)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        for (line, record) in csv_reader.deserialize::<EdgeRecord>().enumerate() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!(record = line + 1, error = %e, "跳过无法解析的 CSV 记录");
                    stats.errors += 1;
                    continue;
                }
            };
            if let Some(reason) =
                Self::reject_reason(&record.source, &record.destination, record.weight)
            {
                warn!(record = line + 1, %reason, "跳过无效的 CSV 记录");
                stats.errors += 1;
                continue;
            }
            self.import_edge(&record.source, &record.destination, record.weight, None, &mut stats)?;
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            vertices = stats.vertices_imported,
            edges = stats.edges_appended,
            errors = stats.errors,
            "CSV 导入完成"
        );
        Ok(stats)
    }

    /// 从 JSON 文件导入图文档
    pub fn import_json<P: AsRef<Path>>(&mut self, path: P) -> Result<ImportStats> {
        let file = File::open(path)?;
        self.read_json(BufReader::new(file))
    }

    /// 从任意读取器导入 JSON 图文档
    pub fn read_json<R: Read>(&mut self, reader: R) -> Result<ImportStats> {
        let start = Instant::now();
        let mut stats = ImportStats::default();

        let document: GraphDocument = serde_json::from_reader(reader)?;

        for vertex in document.vertices {
            if vertex.name.is_empty() {
                warn!("跳过名称为空的顶点");
                stats.errors += 1;
                continue;
            }
            let id = self.ensure_vertex(&vertex.name, &mut stats)?;
            if let (Some(metadata), Some(v)) = (vertex.metadata, self.graph.vertex_mut(id)) {
                v.set_metadata(Some(metadata));
            }
        }

        for (index, edge) in document.edges.into_iter().enumerate() {
            if let Some(reason) = Self::reject_reason(&edge.source, &edge.destination, edge.weight)
            {
                warn!(edge = index, %reason, "跳过无效的边");
                stats.errors += 1;
                continue;
            }
            self.import_edge(
                &edge.source,
                &edge.destination,
                edge.weight,
                edge.metadata,
                &mut stats,
            )?;
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;
        info!(
            vertices = stats.vertices_imported,
            edges = stats.edges_appended,
            errors = stats.errors,
            "JSON 导入完成"
        );
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_import_csv() {
        let mut graph = JsonGraph::new();

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "source,destination,weight").unwrap();
        writeln!(file, "A,B,5").unwrap();
        writeln!(file, "A,B,3").unwrap();
        writeln!(file, "B,C,").unwrap();
        writeln!(file, "A,B,4").unwrap();
        writeln!(file, "C,A,not-a-number").unwrap();

        let stats = GraphImporter::new(&mut graph).import_csv(file.path()).unwrap();

        assert_eq!(stats.vertices_imported, 3);
        assert_eq!(stats.edges_appended, 2);
        assert_eq!(stats.edges_replaced, 1);
        assert_eq!(stats.edges_kept, 1);
        assert_eq!(stats.errors, 1);

        assert_eq!(graph.to_string(), "A: (A, B, 3)\nB: (B, C)\nC\n");
    }

    #[test]
    fn test_import_csv_without_headers() {
        let mut graph = JsonGraph::new();
        let input = "x;y;1.5\ny;x\n";

        let stats = GraphImporter::new(&mut graph)
            .with_options(ImportOptions {
                delimiter: b';',
                has_headers: false,
            })
            .read_csv(input.as_bytes())
            .unwrap();

        assert_eq!(stats.edges_appended, 2);
        assert_eq!(graph.to_string(), "x: (x, y, 1.5)\ny: (y, x)\n");
    }

    #[test]
    fn test_import_json() {
        let mut graph = JsonGraph::new();
        let doc = json!({
            "vertices": [
                {"name": "home", "metadata": {"x": 0, "y": 0}},
                {"name": "work", "metadata": {"x": 3, "y": 4}}
            ],
            "edges": [
                {"source": "home", "destination": "work", "weight": 7, "metadata": {"road": "A1"}},
                {"source": "work", "destination": "gym"}
            ]
        });

        let stats = GraphImporter::new(&mut graph)
            .read_json(doc.to_string().as_bytes())
            .unwrap();

        assert_eq!(stats.vertices_imported, 3);
        assert_eq!(stats.edges_appended, 2);

        let home = graph.vertex_by_name("home").unwrap();
        assert_eq!(home.metadata(), Some(&json!({"x": 0, "y": 0})));
        assert_eq!(home.edges()[0].metadata(), Some(&json!({"road": "A1"})));
        assert_eq!(graph.to_string(), "home: (home, work, 7)\nwork: (work, gym)\ngym\n");
    }

    #[test]
    fn test_import_json_malformed() {
        let mut graph = JsonGraph::new();
        let err = GraphImporter::new(&mut graph)
            .read_json("{\"edges\": 3}".as_bytes())
            .unwrap_err();

        assert!(matches!(err, Error::SerializationError(_)));
        assert_eq!(graph.vertex_count(), 0);
    }

    #[test]
    fn test_import_into_existing_graph() {
        let mut graph = JsonGraph::new();
        let a = graph.add_named_vertex("A").unwrap();

        let stats = GraphImporter::new(&mut graph)
            .read_csv("source,destination\nA,B\n".as_bytes())
            .unwrap();

        assert_eq!(stats.vertices_imported, 1);
        assert_eq!(graph.vertex(a).unwrap().out_degree(), 1);
    }

    #[test]
    fn test_import_csv_rejects_non_finite_weights() {
        let mut graph = JsonGraph::new();
        let input = "source,destination,weight\nA,B,NaN\nA,C,inf\nA,D,-inf\nA,B,2\n";

        let stats = GraphImporter::new(&mut graph).read_csv(input.as_bytes()).unwrap();

        assert_eq!(stats.errors, 3);
        assert_eq!(stats.edges_appended, 1);
        assert_eq!(stats.vertices_imported, 2);
        assert_eq!(graph.to_string(), "A: (A, B, 2)\nB\n");
    }

    #[test]
    fn test_import_csv_rejects_empty_names() {
        let mut graph = JsonGraph::new();
        let input = "A,\n,B\nA,B\n";

        let stats = GraphImporter::new(&mut graph)
            .with_options(ImportOptions {
                delimiter: b',',
                has_headers: false,
            })
            .read_csv(input.as_bytes())
            .unwrap();

        assert_eq!(stats.errors, 2);
        assert_eq!(stats.vertices_imported, 2);
        assert_eq!(graph.vertex_count(), 2);
        assert!(graph.vertices().all(|v| v.explicit_name().is_some()));
    }

    #[test]
    fn test_import_numeric_name_ignores_unnamed_vertex() {
        let mut graph = JsonGraph::new();
        let anonymous = graph.add_vertex(None, None).unwrap();
        assert_eq!(anonymous, VertexId::new(1));

        let stats = GraphImporter::new(&mut graph)
            .read_csv("source,destination\n1,B\n".as_bytes())
            .unwrap();

        assert_eq!(stats.vertices_imported, 2);
        assert_eq!(graph.vertex_count(), 3);
        assert!(!graph.vertex(anonymous).unwrap().has_edges());

        let named = graph
            .vertices()
            .find(|v| v.explicit_name() == Some("1"))
            .unwrap();
        assert_ne!(named.id(), anonymous);
        assert_eq!(named.out_degree(), 1);
    }

    #[test]
    fn test_import_json_skips_invalid_entries() {
        let mut graph = JsonGraph::new();
        let doc = json!({
            "vertices": [{"name": ""}, {"name": "A"}],
            "edges": [
                {"source": "A", "destination": ""},
                {"source": "A", "destination": "B", "weight": 1.5}
            ]
        });

        let stats = GraphImporter::new(&mut graph)
            .read_json(doc.to_string().as_bytes())
            .unwrap();

        assert_eq!(stats.errors, 2);
        assert_eq!(graph.to_string(), "A: (A, B, 1.5)\nB\n");
    }
}
