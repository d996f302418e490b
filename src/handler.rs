//! # 命令处理逻辑模块
//!
//! 包含处理 `encode`、`decode` 和 `inspect` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用核心隐写算法以及向用户报告结果。

use crate::cli::{DecodeArgs, EncodeArgs, InspectArgs};
use crate::constants::{DEFAULT_DECODED_OUTPUT, DEFAULT_ENCODED_OUTPUT, OUTPUT_EXTENSION};
use crate::header::Header;
use crate::pixels::PixelBuffer;
use crate::steganography::{
    decode, encode, max_square_payload, read_header, required_bits, usable_capacity_bits,
};
use anyhow::{Context, Result};
use colored::Colorize;
use image::ImageFormat;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 确定最终的输出路径：未指定时使用默认文件名，并把扩展名强制替换为 `.png`。
pub fn resolve_output_path(output: Option<PathBuf>, default: &str) -> PathBuf {
    output
        .unwrap_or_else(|| PathBuf::from(default))
        .with_extension(OUTPUT_EXTENSION)
}

/// 除非指定了 `--force`，否则拒绝覆盖已存在的文件。
fn ensure_can_write(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 读取并解码图像文件，规整为 RGB 像素缓冲。
fn load_pixels(path: &Path) -> Result<PixelBuffer> {
    let image = image::open(path).with_context(|| {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    })?;

    let pixels = PixelBuffer::from_dynamic(&image).with_context(|| {
        format!(
            "Image {} cannot be used as 8-bit RGB data.",
            path.to_string_lossy().red().bold()
        )
    })?;

    debug!(path = %path.display(), width = pixels.width(), height = pixels.height(), "image loaded");
    Ok(pixels)
}

/// 以 PNG 格式写出像素缓冲。
fn save_png(pixels: PixelBuffer, path: &Path) -> Result<()> {
    pixels
        .into_rgb_image()
        .save_with_format(path, ImageFormat::Png)
        .with_context(|| {
            format!(
                "Unable to write to target image file: {}",
                path.to_string_lossy().red().bold()
            )
        })
}

/// 处理 'Encode' 命令的执行逻辑。
///
/// 负责读取载体和隐藏图像、调用隐写核心函数写入头部与数据，
/// 最后将结果以 PNG 格式写入目标路径。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `EncodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入图像，或图像不是 8 位 RGB 可表示的格式。
/// * 隐藏图像的宽或高超过 4095，或载体没有足够的空间。
/// * 无法写入到目标图像文件。
///
/// 任何错误发生时都不会写出输出文件。
pub fn handle_encode(args: EncodeArgs) -> Result<PathBuf> {
    let dest = resolve_output_path(args.output, DEFAULT_ENCODED_OUTPUT);
    ensure_can_write(&dest, args.force)?;

    let carrier = load_pixels(&args.carrier)?;
    let payload = load_pixels(&args.payload)?;

    let (carrier_width, carrier_height) = carrier.size();
    let (payload_width, payload_height) = payload.size();
    info!(
        carrier_width,
        carrier_height,
        payload_width,
        payload_height,
        "encoding"
    );

    let encoded = encode(carrier, &payload).with_context(|| {
        format!(
            "Failed to hide {} in {}. \nRequired: {} bits, Available: {} bits",
            args.payload.to_string_lossy().red().bold(),
            args.carrier.to_string_lossy().red().bold(),
            required_bits(payload_width, payload_height).to_string().red().bold(),
            usable_capacity_bits(carrier_width, carrier_height)
                .to_string()
                .green()
                .bold()
        )
    })?;

    save_png(encoded, &dest)?;

    println!(
        "The image has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(dest)
}

/// 处理 'Decode' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像、根据头部像素恢复隐藏图像，
/// 最后将其以 PNG 格式写入目标路径。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径的 `DecodeArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 目标文件已存在且未指定 `--force`。
/// * 无法读取输入图像。
/// * 载体小于头部声明所需的容量 (图像损坏或并非隐写载体)。
/// * 头部声明的宽或高为 0，没有可恢复的图像。
/// * 无法写入到目标图像文件。
pub fn handle_decode(args: DecodeArgs) -> Result<PathBuf> {
    let dest = resolve_output_path(args.output, DEFAULT_DECODED_OUTPUT);
    ensure_can_write(&dest, args.force)?;

    let carrier = load_pixels(&args.image)?;

    let decoded = decode(&carrier).with_context(|| {
        format!(
            "Failed to recover a hidden image from '{}'. \nThe image may not contain a hidden image or is corrupted.",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    info!(width = decoded.width(), height = decoded.height(), "decoded");

    anyhow::ensure!(
        decoded.pixel_count() > 0,
        "Header of {} claims an empty {}x{} payload; nothing to recover.",
        args.image.to_string_lossy().red().bold(),
        decoded.width(),
        decoded.height()
    );

    save_png(decoded, &dest)?;

    println!(
        "The image has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(dest)
}

/// 一张图像作为载体时的容量信息。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierReport {
    pub width: u32,
    pub height: u32,
    pub capacity_bits: u64,
    pub max_square_side: u32,
    /// 头部像素声明的尺寸；任何非空图像都会给出一个值。
    pub claimed: Option<Header>,
    /// 声明的尺寸能否从该载体中完整取出。
    pub claim_fits: bool,
}

impl CarrierReport {
    pub fn from_pixels(pixels: &PixelBuffer) -> Self {
        let (width, height) = pixels.size();
        let capacity_bits = usable_capacity_bits(width, height);
        let claimed = read_header(pixels).ok();
        let claim_fits = claimed
            .is_some_and(|header| required_bits(header.width(), header.height()) <= capacity_bits);

        Self {
            width,
            height,
            capacity_bits,
            max_square_side: max_square_payload(width, height),
            claimed,
            claim_fits,
        }
    }
}

/// 处理 'Inspect' 命令的执行逻辑。
///
/// # Errors
///
/// 无法读取输入图像时返回错误。
pub fn handle_inspect(args: InspectArgs) -> Result<CarrierReport> {
    let pixels = load_pixels(&args.image)?;
    let report = CarrierReport::from_pixels(&pixels);

    println!(
        "Carrier: {} ({}x{})",
        args.image.to_string_lossy().bold(),
        report.width,
        report.height
    );
    println!(
        "Usable capacity: {} bits, largest square payload: {}x{}",
        report.capacity_bits.to_string().green().bold(),
        report.max_square_side,
        report.max_square_side
    );
    match report.claimed {
        Some(header) if report.claim_fits => println!(
            "Header claims a {} payload (fits; any image yields a header, so this is not proof of hidden data)",
            header.to_string().green().bold()
        ),
        Some(header) => println!(
            "Header claims a {} payload, which does not fit in this carrier",
            header.to_string().red().bold()
        ),
        None => println!("{}", "Image is empty, no header pixel".red().bold()),
    }

    Ok(report)
}
