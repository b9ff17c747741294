//! 加载入口 (模块原则：读文件与解析分离)
//!
//! 文件层面的失败（不存在、不可读、非 UTF-8）是致命的
//! `SourceUnavailable` 错误；文本层面的问题都降级为诊断。

use crate::env::{EnvMaterializer, EnvironmentHandle, ProcessEnv};
use crate::error::{EnvError, Result};
use crate::parser::EnvFileParser;
use crate::types::ParseResult;
use std::path::Path;

/// .env 文件加载器
pub struct EnvFileLoader;

impl EnvFileLoader {
    /// 读取并解析文件，插值回退到当前进程环境
    ///
    /// # Errors
    ///
    /// 文件不存在、不可读或包含非 UTF-8 字节时返回 `SourceUnavailable`。
    pub fn load(path: &Path) -> Result<ParseResult> {
        // read_to_string 对非 UTF-8 字节返回 InvalidData
        let content =
            std::fs::read_to_string(path).map_err(|e| EnvError::SourceUnavailable {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        Ok(EnvFileParser::parse(&content, |key| {
            std::env::var(key).ok()
        }))
    }

    /// 解析原始文本（无文件涉及时的入口）
    pub fn load_str<F>(content: &str, ambient: F) -> ParseResult
    where
        F: Fn(&str) -> Option<String>,
    {
        EnvFileParser::parse(content, ambient)
    }

    /// 一步到位：加载文件并物化到给定环境
    ///
    /// 返回实际写入的 key 数量。
    ///
    /// # Errors
    ///
    /// 同 [`EnvFileLoader::load`]。
    pub fn apply(
        path: &Path,
        env: &mut dyn EnvironmentHandle,
        override_existing: bool,
    ) -> Result<usize> {
        let result = Self::load(path)?;
        Ok(EnvMaterializer::apply(&result, env, override_existing))
    }

    /// 加载文件并物化到当前进程环境
    ///
    /// # Errors
    ///
    /// 同 [`EnvFileLoader::load`]。
    pub fn apply_to_process(path: &Path, override_existing: bool) -> Result<usize> {
        Self::apply(path, &mut ProcessEnv, override_existing)
    }

    /// 严格模式策略：有任何诊断即视为失败
    ///
    /// 宽松/严格是调用方的选择，引擎本身永远尽力而为。
    ///
    /// # Errors
    ///
    /// 诊断列表非空时返回 `StrictViolation`。
    pub fn require_clean(result: ParseResult) -> Result<ParseResult> {
        if result.is_clean() {
            Ok(result)
        } else {
            Err(EnvError::StrictViolation(result.diagnostics.len()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MemoryEnv;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_env_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does_not_exist.env");

        let err = EnvFileLoader::load(&path).unwrap_err();
        assert!(matches!(err, EnvError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_load_non_utf8_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.env");
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(&[b'A', b'=', 0xff, 0xfe]).unwrap();

        let err = EnvFileLoader::load(&path).unwrap_err();
        assert!(matches!(err, EnvError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_load_and_apply_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_env_file(&dir, ".env", "DB_HOST=localhost\nDB_PORT=5432\n");

        let mut env = MemoryEnv::new();
        let applied = EnvFileLoader::apply(&path, &mut env, true).unwrap();

        assert_eq!(applied, 2);
        assert_eq!(env.get("DB_HOST").as_deref(), Some("localhost"));
        assert_eq!(env.get("DB_PORT").as_deref(), Some("5432"));
    }

    #[test]
    #[serial_test::serial]
    fn test_apply_to_process_mutates_live_environment() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_env_file(&dir, ".env", "ENVFILE_TEST_LOADER=on\n");

        let applied = EnvFileLoader::apply_to_process(&path, true).unwrap();

        assert_eq!(applied, 1);
        assert_eq!(std::env::var("ENVFILE_TEST_LOADER").as_deref(), Ok("on"));
        unsafe { std::env::remove_var("ENVFILE_TEST_LOADER") };
    }

    #[test]
    fn test_require_clean_passes_clean_result() {
        let result = EnvFileLoader::load_str("A=1", |_| None);
        assert!(EnvFileLoader::require_clean(result).is_ok());
    }

    #[test]
    fn test_require_clean_rejects_diagnostics() {
        let result = EnvFileLoader::load_str("not a pair", |_| None);
        let err = EnvFileLoader::require_clean(result).unwrap_err();
        assert!(matches!(err, EnvError::StrictViolation(1)));
    }
}
