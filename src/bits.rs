//! # 位打包模块
//!
//! 提供整数与定长大端位串之间的转换，以及编解码时使用的紧凑位流 [`BitStream`]。
//! 位串函数主要用于日志与调试输出；实际的数据搬运全部走 [`BitStream`]，
//! 每一位只占用一个比特，而不是一个字符。

use crate::error::{Result, StegoError};

/// 将一个字节转换为 8 个字符的大端位串，左侧补零。
///
/// # Examples
///
/// ```
/// assert_eq!(pixel_hide::bits::to_binary8(200), "11001000");
/// ```
pub fn to_binary8(value: u8) -> String {
    to_binary_n(u32::from(value), 8)
}

/// 将 `value` 转换为至少 `width` 个字符的大端位串，左侧补零。
///
/// 与固定宽度的字段配合使用时，调用方需保证 `value` 已经落在 `width` 位以内。
pub fn to_binary_n(value: u32, width: usize) -> String {
    format!("{value:0width$b}")
}

/// 将仅由 `'0'` 和 `'1'` 组成的位串按二进制解析为整数。
///
/// # Errors
///
/// 位串为空、包含其他字符或超过 32 位时返回 [`StegoError::InvalidBitString`]。
pub fn from_binary(bits: &str) -> Result<u32> {
    if bits.is_empty() || bits.len() > 32 || !bits.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(StegoError::InvalidBitString(bits.to_owned()));
    }

    u32::from_str_radix(bits, 2).map_err(|_| StegoError::InvalidBitString(bits.to_owned()))
}

/// 按大端顺序 (每个字节先高位后低位) 存放的紧凑位序列。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitStream {
    bytes: Vec<u8>,
    len: u64,
}

impl BitStream {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预先分配能容纳 `bits` 位的空间。
    pub fn with_capacity(bits: u64) -> Self {
        Self {
            bytes: Vec::with_capacity(bits.div_ceil(8) as usize),
            len: 0,
        }
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn push_bit(&mut self, bit: bool) {
        let offset = (self.len % 8) as u32;
        if offset == 0 {
            self.bytes.push(0);
        }
        if bit {
            if let Some(last) = self.bytes.last_mut() {
                *last |= 0x80 >> offset;
            }
        }
        self.len += 1;
    }

    /// 追加 `value` 的低 `count` 位，高位在前。
    pub fn push_bits(&mut self, value: u32, count: u32) {
        debug_assert!(count <= 32);
        for shift in (0..count).rev() {
            self.push_bit((value >> shift) & 1 == 1);
        }
    }

    pub fn get(&self, index: u64) -> Option<bool> {
        if index >= self.len {
            return None;
        }
        let byte = self.bytes[(index / 8) as usize];
        Some(byte & (0x80 >> (index % 8)) != 0)
    }

    /// 从 `start` 开始读取 `count` 位并按大端拼成整数。
    ///
    /// 请求的区间越过流的末尾时返回 `None`。
    pub fn read_bits(&self, start: u64, count: u32) -> Option<u32> {
        debug_assert!(count <= 32);
        if start.checked_add(u64::from(count))? > self.len {
            return None;
        }
        (start..start + u64::from(count)).try_fold(0u32, |acc, index| {
            self.get(index).map(|bit| (acc << 1) | u32::from(bit))
        })
    }

    /// 丢弃 `len` 之后的所有位。
    pub fn truncate(&mut self, len: u64) {
        if len >= self.len {
            return;
        }
        self.len = len;
        self.bytes.truncate(len.div_ceil(8) as usize);
        let tail = (len % 8) as u32;
        if tail != 0 {
            if let Some(last) = self.bytes.last_mut() {
                *last &= !(0xFFu8 >> tail);
            }
        }
    }
}

impl std::fmt::Display for BitStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        (0..self.len).try_for_each(|index| {
            let bit = self.get(index).unwrap_or(false);
            f.write_str(if bit { "1" } else { "0" })
        })
    }
}
