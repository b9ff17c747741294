//! 错误处理模块 (修复原则：明确抛出异常)
//!
//! 两级错误模型：
//! - 致命错误（本模块的 `EnvError`）：文件不存在、不可读、非 UTF-8 字节、
//!   命令执行失败。没有可恢复的余地，直接中止操作。
//! - 建议性问题（`types::Diagnostic`）：格式错误的行、未解析的引用。
//!   随 `ParseResult` 一起返回，由调用方决定严格或宽松策略。

use std::error::Error;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnvError {
    #[error("配置源不可用: {}: {reason}", path.display())]
    SourceUnavailable { path: PathBuf, reason: String },

    #[error("严格模式: 发现 {0} 条诊断信息")]
    StrictViolation(usize),

    #[error("命令未找到: {0}")]
    CommandNotFound(String),

    #[error("命令执行失败: {0}")]
    CommandExecutionFailed(String),

    #[error("JSON序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}

/// 详细的错误报告函数 (透明原则)
impl EnvError {
    /// 报告错误，支持详细/安静模式
    /// verbose = true: 详细错误链
    /// verbose = false: 关键信息，安静模式
    pub fn report(&self, verbose: bool) {
        if verbose {
            // 详细模式：打印完整错误链
            eprintln!("❌ 错误: {}", self);

            // 如果有源错误，打印级联信息
            // (thiserror 支持自动的 source() 链)
            if let Some(source) = self.source() {
                eprintln!("  └─ 原因: {}", source);
                let mut current = source.source();
                while let Some(next) = current {
                    eprintln!("     └─ {}", next);
                    current = next.source();
                }
            }
        } else {
            // 安静模式：只打印关键信息
            match self {
                EnvError::SourceUnavailable { path, .. } => {
                    eprintln!("配置源不可用: {}", path.display());
                }
                EnvError::StrictViolation(count) => {
                    eprintln!("严格模式失败: {} 条诊断", count);
                }
                EnvError::CommandNotFound(cmd) => eprintln!("命令未找到: {}", cmd),
                _ => eprintln!("错误: {}", self),
            }
        }
    }
}

/// 简化 Result 类型别名
pub type Result<T> = std::result::Result<T, EnvError>;
