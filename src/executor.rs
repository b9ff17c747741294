//! 子进程执行器
//!
//! `run` 命令的落点：用物化后的环境启动子进程，
//! 继承父进程的 stdin/stdout/stderr，透传退出码。

use crate::env::MemoryEnv;
use crate::error::{EnvError, Result};
use std::process::{Command, Stdio};

/// 命令执行器
pub struct CommandExecutor;

impl CommandExecutor {
    /// 以给定环境执行命令
    ///
    /// # 参数
    /// - `command`: 命令和参数，如 `["python", "app.py"]`
    /// - `env`: 子进程的完整环境（不继承父进程环境，由调用方构造快照）
    ///
    /// # 返回
    /// 子进程的退出码
    ///
    /// # Errors
    ///
    /// 命令为空或启动失败时返回错误。
    pub fn exec_with_env(command: &[String], env: &MemoryEnv) -> Result<i32> {
        let Some((program, args)) = command.split_first() else {
            return Err(EnvError::CommandExecutionFailed("命令不能为空".to_string()));
        };

        let mut cmd = Command::new(program);
        cmd.args(args);

        // 环境已由调用方合并完毕，整体替换而不是叠加
        cmd.env_clear();
        for (key, value) in env.iter() {
            cmd.env(key, value);
        }

        // 继承标准流
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // 执行并等待
        let status = cmd.status().map_err(|e| {
            EnvError::CommandNotFound(format!(
                "{}: {} (请确保命令在 PATH 中或使用完整路径)",
                program, e
            ))
        })?;

        Ok(status.code().unwrap_or(1))
    }
}
