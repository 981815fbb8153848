//! adjgraph 命令行工具
//!
//! 从 CSV 或 JSON 加载图，打印邻接表并运行遍历/最短路径算法

use adjgraph::algorithm::{euclidean_heuristic, PathFinder};
use adjgraph::{GraphImporter, ImportOptions, JsonGraph, PathResult, VertexId};
use anyhow::{anyhow, bail, Context};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Csv,
    Json,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// 广度优先遍历
    Bfs,
    /// 深度优先遍历
    Dfs,
    /// 按跳数的最短路径
    Hops,
    /// Dijkstra 最短路径
    Dijkstra,
    /// A* 最短路径（使用顶点坐标 x/y 作为启发）
    Astar,
}

#[derive(Parser, Debug)]
#[command(name = "adjgraph-cli")]
#[command(about = "adjgraph 图算法命令行工具")]
struct Args {
    /// 输入文件路径
    #[arg(short, long)]
    input: PathBuf,

    /// 输入格式，缺省时按扩展名判断
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// CSV 分隔符
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// CSV 没有表头
    #[arg(long)]
    no_headers: bool,

    /// 要运行的算法
    #[arg(short, long, value_enum)]
    algorithm: Option<Algorithm>,

    /// 起点名称
    #[arg(long)]
    from: Option<String>,

    /// 终点名称（最短路径算法需要）
    #[arg(long)]
    to: Option<String>,

    /// 打印邻接表
    #[arg(short, long)]
    print: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let args = Args::parse();

    let format = match args.format {
        Some(f) => f,
        None => match args.input.extension().and_then(|e| e.to_str()) {
            Some("json") => Format::Json,
            _ => Format::Csv,
        },
    };
    if !args.delimiter.is_ascii() {
        bail!("分隔符必须是 ASCII 字符: {:?}", args.delimiter);
    }

    let mut graph = JsonGraph::new();
    let mut importer = GraphImporter::new(&mut graph).with_options(ImportOptions {
        delimiter: args.delimiter as u8,
        has_headers: !args.no_headers,
    });
    let stats = match format {
        Format::Csv => importer.import_csv(&args.input),
        Format::Json => importer.import_json(&args.input),
    }
    .with_context(|| format!("导入 {:?} 失败", args.input))?;

    println!("已加载: {} 顶点, {} 边", graph.vertex_count(), graph.edge_count());
    if stats.errors > 0 {
        println!("  跳过错误记录: {}", stats.errors);
    }

    if args.print {
        print!("{}", render(&graph)?);
    }

    if let Some(algorithm) = args.algorithm {
        run(&graph, algorithm, args.from.as_deref(), args.to.as_deref())?;
    }

    Ok(())
}

fn render(graph: &JsonGraph) -> anyhow::Result<String> {
    let mut out = String::new();
    for id in graph.vertex_ids() {
        out.push_str(&graph.display_vertex(id)?);
        out.push('\n');
    }
    Ok(out)
}

fn lookup(graph: &JsonGraph, name: Option<&str>, flag: &str) -> anyhow::Result<VertexId> {
    let name = name.ok_or_else(|| anyhow!("需要 --{}", flag))?;
    graph
        .vertex_by_name(name)
        .map(|v| v.id())
        .ok_or_else(|| anyhow!("未找到顶点: {}", name))
}

fn run(
    graph: &JsonGraph,
    algorithm: Algorithm,
    from: Option<&str>,
    to: Option<&str>,
) -> anyhow::Result<()> {
    let finder = PathFinder::new(graph);
    let start = lookup(graph, from, "from")?;

    let path = match algorithm {
        Algorithm::Bfs | Algorithm::Dfs => {
            let order = match algorithm {
                Algorithm::Bfs => finder.breadth_first(start)?,
                _ => finder.depth_first(start)?,
            };
            println!("访问顺序: {}", names(graph, &order));
            return Ok(());
        }
        Algorithm::Hops => finder.shortest_hops(start, lookup(graph, to, "to")?)?,
        Algorithm::Dijkstra => finder.dijkstra(start, lookup(graph, to, "to")?)?,
        Algorithm::Astar => finder.a_star(start, lookup(graph, to, "to")?, euclidean_heuristic)?,
    };

    print_path(graph, path);
    Ok(())
}

fn names(graph: &JsonGraph, ids: &[VertexId]) -> String {
    ids.iter()
        .map(|id| {
            graph
                .vertex(*id)
                .map(|v| v.name().into_owned())
                .unwrap_or_else(|| id.to_string())
        })
        .collect::<Vec<_>>()
        .join(" -> ")
}

fn print_path(graph: &JsonGraph, path: Option<PathResult>) {
    match path {
        Some(path) => {
            println!("路径: {}", names(graph, &path.vertices));
            println!("长度: {}", path.length);
            println!("总权重: {}", path.total_weight);
        }
        None => println!("未找到路径"),
    }
}
