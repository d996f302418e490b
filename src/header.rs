//! # 头部编解码模块
//!
//! 载体像素 (0,0) 的 24 位 RGB 值被整体改写为隐藏图像的尺寸:
//! 前 12 位为宽度，后 12 位为高度，均为大端无符号整数。

use crate::bits::{from_binary, to_binary8, to_binary_n};
use crate::constants::{HEADER_FIELD_BITS, MAX_PAYLOAD_SIDE};
use crate::error::{Result, StegoError};

/// 隐藏图像的尺寸，保证两个字段都能放进 12 位。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    width: u32,
    height: u32,
}

impl Header {
    /// 构造头部，宽或高超过 4095 时拒绝。
    ///
    /// # Errors
    ///
    /// 返回 [`StegoError::HeaderOverflow`]。
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width > MAX_PAYLOAD_SIDE || height > MAX_PAYLOAD_SIDE {
            return Err(StegoError::HeaderOverflow { width, height });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// 头部对应的三个通道值，写入载体像素 (0,0)。
    pub fn to_rgb(self) -> [u8; 3] {
        encode_header(self.width, self.height)
    }

    pub fn from_rgb(rgb: [u8; 3]) -> Self {
        let (width, height) = decode_header(rgb);
        Self { width, height }
    }
}

impl std::fmt::Display for Header {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// 将宽高各取模 4096 后打包进三个字节。
///
/// 超出 12 位的值会被静默截断 (4096 变为 0)；需要拒绝越界值时请使用 [`Header::new`]。
pub fn encode_header(width: u32, height: u32) -> [u8; 3] {
    let modulus = 1u32 << HEADER_FIELD_BITS;
    let packed = ((width % modulus) << HEADER_FIELD_BITS) | (height % modulus);
    let [_, r, g, b] = packed.to_be_bytes();
    [r, g, b]
}

/// [`encode_header`] 的逆运算，返回 `(width, height)`。
pub fn decode_header([r, g, b]: [u8; 3]) -> (u32, u32) {
    let packed = u32::from_be_bytes([0, r, g, b]);
    (packed >> HEADER_FIELD_BITS, packed & MAX_PAYLOAD_SIDE)
}

/// 头部像素的 24 位串形式，宽度在前。仅用于诊断输出。
pub fn header_bits(rgb: [u8; 3]) -> String {
    rgb.iter().map(|&channel| to_binary8(channel)).collect()
}

/// 从 24 位串中按字段解析宽高。与 [`decode_header`] 等价，用于校验位串视图。
///
/// # Errors
///
/// 位串长度不是 24 或含非法字符时返回 [`StegoError::InvalidBitString`]。
pub fn parse_header_bits(bits: &str) -> Result<(u32, u32)> {
    let field = HEADER_FIELD_BITS as usize;
    if bits.len() != field * 2 {
        return Err(StegoError::InvalidBitString(bits.to_owned()));
    }
    let (width, height) = bits.split_at(field);
    Ok((from_binary(width)?, from_binary(height)?))
}

/// 单个字段的 12 位串形式。
pub fn field_bits(value: u32) -> String {
    to_binary_n(value % (1 << HEADER_FIELD_BITS), HEADER_FIELD_BITS as usize)
}
