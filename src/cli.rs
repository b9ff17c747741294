//! CLI 参数定义

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// envfile - .env 文件解析与环境注入工具
#[derive(Parser)]
#[command(
    name = "envfile",
    version,
    about = ".env 文件解析与环境注入工具",
    long_about = "解析 KEY=VALUE 配置文件，支持注释、引号与 ${NAME} 插值，\
                  并按覆盖策略注入环境变量"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 详细输出模式
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 解析文件并报告诊断信息
    Check {
        /// 文件路径
        file: PathBuf,
        /// 严格模式：有任何诊断即失败
        #[arg(short, long)]
        strict: bool,
    },

    /// 打印解析后的条目
    Print {
        /// 文件路径
        file: PathBuf,
        /// 输出格式 (env/json)
        #[arg(short, long, default_value = "env")]
        format: String,
    },

    /// 运行命令并注入文件中的环境变量
    Run {
        /// 文件路径
        file: PathBuf,
        /// 不覆盖已存在的进程环境变量（默认覆盖）
        #[arg(long)]
        no_override: bool,
        /// 要执行的命令
        #[arg(required = true, last = true)]
        command: Vec<String>,
    },
}
