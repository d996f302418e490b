//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::error::ErrorKind;
use clap::{ArgAction, Parser, Subcommand};
use std::ffi::OsString;
use std::path::PathBuf;

/// 一款把一张图像藏入另一张无损图像 (如 PNG, BMP) 低 4 位中的命令行工具。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    arg_required_else_help = true,
    long_about = "一款把一张图像藏入另一张无损图像 (如 PNG, BMP) 低 4 位中的命令行工具。\n载体像素 (0,0) 记录隐藏图像的宽高，其余像素每个承载 12 位数据。"
)]
pub struct Cli {
    /// 输出更详细的日志 (-v 为 debug，-vv 为 trace)。
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：encode (隐藏)、decode (恢复) 和 inspect (查看容量)。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 把隐藏图像写入载体图像，结果总是保存为 PNG。
    Encode(EncodeArgs),

    /// 从经过隐写的图像中恢复隐藏图像，结果总是保存为 PNG。
    Decode(DecodeArgs),

    /// 查看载体容量以及头部像素声明的隐藏图像尺寸。
    Inspect(InspectArgs),
}

/// 解析命令行参数。
///
/// 参数缺失或格式不对时打印用法并返回 `None`，调用方应直接正常退出；
/// `--help` 与 `--version` 保持 clap 的默认行为。
pub fn parse_args<I, T>(args: I) -> Option<Cli>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    match Cli::try_parse_from(args) {
        Ok(cli) => Some(cli),
        Err(err) => match err.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
            _ => {
                err.print().ok();
                None
            }
        },
    }
}

/// 'encode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct EncodeArgs {
    /// 用于承载数据的载体图像路径。
    #[arg(short, long)]
    pub carrier: PathBuf,

    /// 要隐藏的图像路径。
    #[arg(short, long)]
    pub payload: PathBuf,

    /// 输出路径，扩展名会被替换为 .png。默认为 Encoded_image.png。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'decode' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct DecodeArgs {
    /// 已隐藏图像数据的载体图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 输出路径，扩展名会被替换为 .png。默认为 Decoded_image.png。
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 输出文件已存在时强制覆盖。
    #[arg(short, long)]
    pub force: bool,
}

/// 'inspect' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// 要查看的图像路径。
    #[arg(short, long)]
    pub image: PathBuf,
}
