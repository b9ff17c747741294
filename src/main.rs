//! envfile 主程序入口
//!
//! 设计原则：
//! - 模块化：入口代码简洁，逻辑委托给各模块
//! - 安静模式：默认无输出，成功静默
//! - 错误处理：详细/安静错误模式，通过 --verbose 切换

use clap::Parser;
use envfile::cli::{Cli, Commands};
use envfile::env::{EnvMaterializer, MemoryEnv};
use envfile::error::Result;
use envfile::executor::CommandExecutor;
use envfile::loader::EnvFileLoader;
use envfile::types::{Config, OutputFormat};

fn main() {
    // 解析 CLI 参数
    let cli = Cli::parse();

    let config = Config {
        verbose: cli.verbose,
    };

    // 执行命令，统一错误处理
    match run_command(cli.command, &config) {
        Ok(code) => {
            // 静默成功 - 符合安静原则
            // run 命令透传子进程退出码
            std::process::exit(code);
        }
        Err(e) => {
            e.report(config.verbose);
            std::process::exit(1);
        }
    }
}

/// 运行具体命令，返回进程退出码
fn run_command(command: Commands, config: &Config) -> Result<i32> {
    match command {
        Commands::Check { file, strict } => {
            let result = EnvFileLoader::load(&file)?;

            for diag in &result.diagnostics {
                eprintln!("{}", diag);
            }
            if config.verbose {
                println!(
                    "✓ 解析了 {} 个变量，{} 条诊断",
                    result.entries.len(),
                    result.diagnostics.len()
                );
            }

            if strict {
                EnvFileLoader::require_clean(result)?;
            }
            Ok(0)
        }

        Commands::Print { file, format } => {
            let result = EnvFileLoader::load(&file)?;

            match OutputFormat::from(format.as_str()) {
                OutputFormat::Env => {
                    for entry in &result.entries {
                        println!("{}={}", entry.key, entry.value);
                    }
                }
                OutputFormat::Json => {
                    let json = serde_json::to_string_pretty(&result)?;
                    println!("{}", json);
                }
            }
            Ok(0)
        }

        Commands::Run {
            file,
            no_override,
            command,
        } => {
            let result = EnvFileLoader::load(&file)?;

            // 在进程环境的快照上物化，再整体注入子进程
            let mut env = MemoryEnv::snapshot_process();
            let applied = EnvMaterializer::apply(&result, &mut env, !no_override);

            if config.verbose {
                println!("✓ 注入 {} 个变量", applied);
            }

            CommandExecutor::exec_with_env(&command, &env)
        }
    }
}
