//! .env 格式解析器 (简单原则：透明的文本解析)
//!
//! 逐行解析 KEY=VALUE 文本，支持注释、引号和 `${NAME}` 插值。
//! 解析永不失败：格式问题降级为诊断信息，而不是错误。

use crate::types::{Diagnostic, DiagnosticKind, Entry, ParseResult};
use regex::Regex;
use std::sync::OnceLock;

/// key 必须是合法标识符
fn key_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap())
}

/// 匹配 ${NAME} 插值标记；名称不合法的 `${...}` 不是标记，原样保留
fn interp_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap())
}

/// 值的引号处理结果
enum Unquoted<'a> {
    /// 无引号或双引号：插值生效
    Interpolated(&'a str),
    /// 单引号：字面量，禁用插值
    Literal(&'a str),
}

/// .env 格式解析器
pub struct EnvFileParser;

impl EnvFileParser {
    /// 解析 .env 文件内容
    ///
    /// 规则：
    /// - 忽略空行和首个非空白字符为 # 的注释行（行内 # 属于值的一部分）
    /// - 格式：KEY=VALUE，以第一个 = 分割，值本身可以包含 =
    /// - key 必须匹配 `[A-Za-z_][A-Za-z0-9_]*`，否则产生 MalformedLine 诊断并跳过该行
    /// - 匹配的单/双引号会被剥除；单引号内禁用插值
    /// - `${NAME}` 先查本文件中更早的条目，再查 `ambient`；
    ///   无法解析时替换为空字符串并产生 UnresolvedReference 诊断
    /// - 重复的 key 以最后一次赋值为准（就地替换值和行号）
    ///
    /// 对同一输入和同一环境快照，结果是确定性的。
    pub fn parse<F>(content: &str, ambient: F) -> ParseResult
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut result = ParseResult::default();

        for (idx, raw_line) in content.lines().enumerate() {
            let line_num = idx + 1;
            // 只修剪行尾空白；行首空白保留给引号内的缩进
            let line = raw_line.trim_end();

            // 跳过空行和整行注释
            let stripped = line.trim_start();
            if stripped.is_empty() || stripped.starts_with('#') {
                continue;
            }

            // 以第一个 = 分割 KEY=VALUE
            let Some((key_part, value_part)) = line.split_once('=') else {
                result.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MalformedLine,
                    line_num,
                    format!("缺少 '='，不是 KEY=VALUE 格式: '{}'", stripped),
                ));
                continue;
            };

            let key = key_part.trim();
            if !key_pattern().is_match(key) {
                result.diagnostics.push(Diagnostic::new(
                    DiagnosticKind::MalformedLine,
                    line_num,
                    format!("无效的键名: '{}'", key),
                ));
                continue;
            }

            let value = match Self::unquote(value_part.trim_start()) {
                Unquoted::Literal(inner) => inner.to_string(),
                Unquoted::Interpolated(inner) => {
                    Self::interpolate(inner, line_num, &result.entries, &ambient, &mut result.diagnostics)
                }
            };

            // 重复的 key：就地替换，保持插入顺序
            match result.entries.iter_mut().find(|e| e.key == key) {
                Some(existing) => {
                    existing.value = value;
                    existing.origin_line = line_num;
                }
                None => result.entries.push(Entry::new(key.to_string(), value, line_num)),
            }
        }

        result
    }

    /// 剥除成对的引号
    ///
    /// 只处理完整包裹整个值的引号；不成对或只出现在中间的引号原样保留。
    fn unquote(value: &str) -> Unquoted<'_> {
        let bytes = value.as_bytes();
        if bytes.len() >= 2 {
            if bytes[0] == b'"' && bytes[bytes.len() - 1] == b'"' {
                return Unquoted::Interpolated(&value[1..value.len() - 1]);
            }
            if bytes[0] == b'\'' && bytes[bytes.len() - 1] == b'\'' {
                return Unquoted::Literal(&value[1..value.len() - 1]);
            }
        }
        Unquoted::Interpolated(value)
    }

    /// 解析 `${NAME}` 插值
    ///
    /// 解析顺序：
    /// 1. 本次解析中更早定义的条目（前向引用不支持，会落到第 2 步或失败）
    /// 2. `ambient` 环境查找
    fn interpolate<F>(
        value: &str,
        line_num: usize,
        entries: &[Entry],
        ambient: &F,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> String
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut output = String::with_capacity(value.len());
        let mut last_end = 0;

        for cap in interp_pattern().captures_iter(value) {
            let token = cap.get(0).unwrap();
            let name = cap.get(1).unwrap().as_str();

            output.push_str(&value[last_end..token.start()]);
            last_end = token.end();

            let resolved = entries
                .iter()
                .find(|e| e.key == name)
                .map(|e| e.value.clone())
                .or_else(|| ambient(name));

            match resolved {
                Some(v) => output.push_str(&v),
                None => {
                    // 无法解析：替换为空字符串，记录诊断，继续解析
                    diagnostics.push(Diagnostic::new(
                        DiagnosticKind::UnresolvedReference,
                        line_num,
                        format!("无法解析的引用: ${{{}}}", name),
                    ));
                }
            }
        }

        output.push_str(&value[last_end..]);
        output
    }
}
