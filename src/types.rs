//! 核心数据结构定义 (表达原则：用数据结构表达逻辑)

use serde::{Deserialize, Serialize};
use std::fmt;

/// 已解析的环境变量条目
///
/// `origin_line` 是该赋值在源文件中的行号（1 起始）。
/// 同一 key 重复赋值时保留最后一次的值和行号。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub key: String,
    pub value: String,
    pub origin_line: usize,
}

impl Entry {
    pub fn new(key: String, value: String, origin_line: usize) -> Self {
        Self {
            key,
            value,
            origin_line,
        }
    }
}

/// 诊断信息类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// 不是 KEY=VALUE 格式，或 key 不是合法标识符
    MalformedLine,
    /// `${NAME}` 引用无法解析，已替换为空字符串
    UnresolvedReference,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticKind::MalformedLine => write!(f, "malformed-line"),
            DiagnosticKind::UnresolvedReference => write!(f, "unresolved-reference"),
        }
    }
}

/// 单条诊断信息（非致命，解析继续进行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// 源文件行号（1 起始）
    pub line: usize,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, line: usize, message: String) -> Self {
        Self {
            kind,
            line,
            message,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}: {}", self.line, self.kind, self.message)
    }
}

/// 解析结果：按插入顺序排列的条目 + 诊断列表
///
/// 对同一输入文本和同一环境快照，结果是确定性的。
/// 空输入产生空的有效结果。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    pub entries: Vec<Entry>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseResult {
    /// 按 key 查找已解析的值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == key)
            .map(|e| e.value.as_str())
    }

    /// 是否没有任何诊断信息
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// 配置选项 (支持详细/安静模式切换)
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub verbose: bool, // 是否详细输出
}

/// 输出格式类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Env,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" | "j" => OutputFormat::Json,
            _ => OutputFormat::Env,
        }
    }
}
