use pixel_hide::{
    cli::{Commands, parse_args},
    handler::{handle_decode, handle_encode, handle_inspect},
    logger,
};

/// 程序的主入口点
///
/// 负责解析命令行参数，并根据指定的子命令（`encode`、`decode` 或 `inspect`）
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 参数数量或格式不对时只打印用法，不视为失败
    let Some(cli) = parse_args(std::env::args_os()) else {
        return Ok(());
    };

    logger::init(cli.verbose);

    // 根据子命令调用相应的处理函数
    match cli.command {
        Commands::Encode(args) => handle_encode(args).map(|_| ()),
        Commands::Decode(args) => handle_decode(args).map(|_| ()),
        Commands::Inspect(args) => handle_inspect(args).map(|_| ()),
    }
}
