//! envfile - .env 文件解析与环境注入
//!
//! 两个核心组件：
//! - [`parser::EnvFileParser`]：解析 KEY=VALUE 文本，产出有序条目和诊断列表
//! - [`env::EnvMaterializer`]：按覆盖策略把解析结果写入环境

// 数据结构
pub mod types;

// 错误处理
pub mod error;

// 解析引擎
pub mod parser;

// 环境句柄与物化
pub mod env;

// 文件加载入口
pub mod loader;

// 子进程执行
pub mod executor;

// CLI 定义
pub mod cli;

// 重新导出常用类型
pub use env::{EnvMaterializer, EnvironmentHandle, MemoryEnv, ProcessEnv};
pub use error::{EnvError, Result};
pub use loader::EnvFileLoader;
pub use parser::EnvFileParser;
pub use types::{Diagnostic, DiagnosticKind, Entry, ParseResult};
