//! # 错误类型模块
//!
//! 编解码核心返回的结构化错误。命令处理层会把它们包装进 `anyhow` 并附加上下文。

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum StegoError {
    /// 隐藏图像序列化后的位数超过了载体的可用容量。
    #[error("payload too large for carrier: requires {required_bits} bits, carrier holds {available_bits} bits")]
    PayloadTooLarge {
        required_bits: u64,
        available_bits: u64,
    },

    /// 宽或高无法用 12 位头部字段表示。
    #[error("payload dimensions {width}x{height} exceed the 12-bit header limit of 4095")]
    HeaderOverflow { width: u32, height: u32 },

    /// 载体太小，无法提供头部声明的位数。
    #[error("corrupt or undersized carrier: header requires {required_bits} bits, carrier holds {available_bits} bits")]
    TruncatedCarrier {
        required_bits: u64,
        available_bits: u64,
    },

    #[error("unsupported pixel format: {0}")]
    UnsupportedFormat(String),

    #[error("pixel ({x}, {y}) is outside a {width}x{height} image")]
    PixelOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },

    #[error("invalid bit string: {0:?}")]
    InvalidBitString(String),

    #[error("pixel data of length {len} does not match {width}x{height}")]
    DimensionMismatch { width: u32, height: u32, len: usize },
}

pub type Result<T> = std::result::Result<T, StegoError>;
