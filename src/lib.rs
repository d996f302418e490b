//! # pixel_hide 库
//!
//! 本库包含把一张 RGB 图像藏入另一张无损图像低半字节的核心逻辑。

// 声明库包含的所有模块。

pub mod bits;
pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod header;
pub mod logger;
pub mod pixels;
pub mod steganography;
pub mod traversal;
