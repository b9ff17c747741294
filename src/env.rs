//! 环境句柄与物化引擎
//!
//! 进程环境是全局可变状态，通过显式的 `EnvironmentHandle` 能力传入
//! `apply`，从不隐式触碰。这让变更点可审计，测试中可以用内存映射
//! 替换真实的进程环境。

use crate::types::ParseResult;
use std::collections::HashMap;

/// 环境的窄读写能力：只有 get/set
///
/// 环境表由宿主进程拥有，本组件只通过这个接口读写。
pub trait EnvironmentHandle {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// 真实的进程环境
///
/// # 并发
/// 进程环境是进程级共享的，宿主运行时通常不对其做同步。
/// 多线程并发调用 `apply` 时需要调用方自行串行化，本组件不提供锁。
#[derive(Debug, Default)]
pub struct ProcessEnv;

impl EnvironmentHandle for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }

    fn set(&mut self, key: &str, value: &str) {
        // SAFETY: 调用方负责串行化，见类型文档
        unsafe { std::env::set_var(key, value) };
    }
}

/// 内存环境（测试替身，也用于构造子进程环境）
#[derive(Debug, Clone, Default)]
pub struct MemoryEnv {
    vars: HashMap<String, String>,
}

impl MemoryEnv {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以当前进程环境为起点创建快照
    pub fn snapshot_process() -> Self {
        Self {
            vars: std::env::vars().collect(),
        }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl EnvironmentHandle for MemoryEnv {
    fn get(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.vars.insert(key.to_string(), value.to_string());
    }
}

/// 环境物化引擎
///
/// 把 `ParseResult` 按优先级策略写入环境：
/// - override = true：文件值无条件覆盖
/// - override = false：只填补空缺，已有的进程级设置优先
pub struct EnvMaterializer;

impl EnvMaterializer {
    /// 按解析顺序应用条目，返回实际写入的 key 数量
    ///
    /// 返回值区分"已存在未改动"和"实际写入"，调用方可以据此报告变更。
    /// 变更同步生效，无缓冲。
    pub fn apply(result: &ParseResult, env: &mut dyn EnvironmentHandle, override_existing: bool) -> usize {
        let mut applied = 0;

        for entry in &result.entries {
            if override_existing || env.get(&entry.key).is_none() {
                env.set(&entry.key, &entry.value);
                applied += 1;
            }
        }

        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::EnvFileParser;
    use serial_test::serial;

    fn parsed(content: &str) -> ParseResult {
        EnvFileParser::parse(content, |_| None)
    }

    #[test]
    fn test_apply_override_true_replaces_existing() {
        let mut env = MemoryEnv::from_pairs([("DEBUG", "false")]);
        let result = parsed("DEBUG=true");

        let applied = EnvMaterializer::apply(&result, &mut env, true);

        assert_eq!(applied, 1);
        assert_eq!(env.get("DEBUG").as_deref(), Some("true"));
    }

    #[test]
    fn test_apply_override_false_preserves_existing() {
        // 已存在的进程级设置优先，只填补空缺
        let mut env = MemoryEnv::from_pairs([("DEBUG", "false")]);
        let result = parsed("DEBUG=true\nNEW_KEY=1");

        let applied = EnvMaterializer::apply(&result, &mut env, false);

        assert_eq!(applied, 1);
        assert_eq!(env.get("DEBUG").as_deref(), Some("false"));
        assert_eq!(env.get("NEW_KEY").as_deref(), Some("1"));
    }

    #[test]
    fn test_apply_returns_written_count() {
        let mut env = MemoryEnv::from_pairs([("A", "old"), ("B", "old")]);
        let result = parsed("A=1\nB=2\nC=3");

        assert_eq!(EnvMaterializer::apply(&result, &mut env.clone(), true), 3);
        assert_eq!(EnvMaterializer::apply(&result, &mut env, false), 1);
    }

    #[test]
    fn test_apply_idempotent_with_override() {
        let result = parsed("A=1\nB=2");

        let mut once = MemoryEnv::new();
        EnvMaterializer::apply(&result, &mut once, true);

        let mut twice = MemoryEnv::new();
        EnvMaterializer::apply(&result, &mut twice, true);
        EnvMaterializer::apply(&result, &mut twice, true);

        let mut a: Vec<_> = once.iter().collect();
        let mut b: Vec<_> = twice.iter().collect();
        a.sort();
        b.sort();
        assert_eq!(a, b);
    }

    #[test]
    fn test_apply_follows_parse_order() {
        // 同一 key 在解析阶段已经合并，apply 阶段每个 key 只写一次
        let mut env = MemoryEnv::new();
        let result = parsed("A=1\nA=2");

        let applied = EnvMaterializer::apply(&result, &mut env, true);

        assert_eq!(applied, 1);
        assert_eq!(env.get("A").as_deref(), Some("2"));
    }

    #[test]
    #[serial]
    fn test_process_env_roundtrip() {
        // 触碰真实进程环境的测试串行执行
        let mut env = ProcessEnv;
        let result = parsed("ENVFILE_TEST_ROUNDTRIP=42");

        let applied = EnvMaterializer::apply(&result, &mut env, true);

        assert_eq!(applied, 1);
        assert_eq!(
            std::env::var("ENVFILE_TEST_ROUNDTRIP").as_deref(),
            Ok("42")
        );
        unsafe { std::env::remove_var("ENVFILE_TEST_ROUNDTRIP") };
    }
}
