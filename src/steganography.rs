//! # 隐写核心模块
//!
//! 把隐藏图像的像素序列化为位流，再以每 4 位一组写入载体各通道的低半字节。
//!
//! 布局:
//!
//! * 载体像素 (0,0): 24 位头部，存放隐藏图像的宽高 (见 [`crate::header`])。
//! * 其余载体像素按列优先顺序依次承载 12 位数据: R、G、B 的低 4 位。
//! * 位流为隐藏图像按列优先顺序逐像素拼接的 R(8) G(8) B(8)。
//!
//! 所有容量检查都在修改缓冲之前完成，失败时载体保持原样。

use crate::bits::BitStream;
use crate::constants::{
    BITS_PER_CARRIER_PIXEL, BITS_PER_CHANNEL, BITS_PER_PAYLOAD_PIXEL, LOW_NIBBLE_MASK,
    MAX_PAYLOAD_SIDE,
};
use crate::error::{Result, StegoError};
use crate::header::{Header, header_bits};
use crate::pixels::{PixelBuffer, Rgb8};
use crate::traversal::ColumnMajor;
use tracing::{debug, trace};

/// 载体除头部像素外可承载的总位数。
pub fn usable_capacity_bits(width: u32, height: u32) -> u64 {
    (u64::from(width) * u64::from(height))
        .saturating_sub(1)
        .saturating_mul(BITS_PER_CARRIER_PIXEL)
}

/// 隐藏 `width × height` 图像所需的位数。
pub fn required_bits(width: u32, height: u32) -> u64 {
    u64::from(width) * u64::from(height) * BITS_PER_PAYLOAD_PIXEL
}

/// 能放进该载体的最大正方形隐藏图像边长，同时受 12 位头部限制。
pub fn max_square_payload(width: u32, height: u32) -> u32 {
    let capacity = usable_capacity_bits(width, height);
    let (mut low, mut high) = (0u32, MAX_PAYLOAD_SIDE);
    while low < high {
        let mid = low + (high - low).div_ceil(2);
        if required_bits(mid, mid) <= capacity {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    low
}

/// 按列优先顺序序列化隐藏图像的全部像素。
fn payload_bitstream(payload: &PixelBuffer) -> Result<BitStream> {
    let (width, height) = payload.size();
    let mut stream = BitStream::with_capacity(required_bits(width, height));
    for (x, y) in ColumnMajor::new(width, height) {
        for channel in payload.get(x, y)? {
            stream.push_bits(u32::from(channel), 8);
        }
    }
    Ok(stream)
}

/// 保留高半字节，把低半字节替换为 `nibble`。
fn replace_low_nibble(channel: u8, nibble: u32) -> u8 {
    (channel & !LOW_NIBBLE_MASK) | (nibble as u8 & LOW_NIBBLE_MASK)
}

/// 在原地把 `payload` 藏入 `carrier`。
///
/// 头部像素被完整覆盖；承载数据的像素只改写低半字节；位流耗尽后的像素保持不变。
///
/// # Errors
///
/// * [`StegoError::HeaderOverflow`]: 隐藏图像宽或高超过 4095。
/// * [`StegoError::PayloadTooLarge`]: 载体可用容量不足 (包括空载体)。
///
/// 出错时 `carrier` 未被修改。
pub fn embed(carrier: &mut PixelBuffer, payload: &PixelBuffer) -> Result<()> {
    let (carrier_width, carrier_height) = carrier.size();
    let (payload_width, payload_height) = payload.size();

    let header = Header::new(payload_width, payload_height)?;
    let required = required_bits(payload_width, payload_height);
    let available = usable_capacity_bits(carrier_width, carrier_height);

    if carrier.pixel_count() == 0 || required > available {
        return Err(StegoError::PayloadTooLarge {
            required_bits: required,
            available_bits: available,
        });
    }

    let stream = payload_bitstream(payload)?;
    debug!(
        header = %header,
        bits = stream.len(),
        capacity = available,
        "embedding payload"
    );

    let header_rgb = header.to_rgb();
    trace!(bits = %header_bits(header_rgb), "header pixel");
    carrier.set(0, 0, header_rgb)?;

    let slots_needed = stream.len().div_ceil(BITS_PER_CARRIER_PIXEL);
    for (slot, (x, y)) in ColumnMajor::carrier_slots(carrier_width, carrier_height)
        .take(slots_needed as usize)
        .enumerate()
    {
        let cursor = slot as u64 * BITS_PER_CARRIER_PIXEL;
        let original = carrier.get(x, y)?;
        let mut modified: Rgb8 = original;
        for (index, channel) in modified.iter_mut().enumerate() {
            let start = cursor + index as u64 * u64::from(BITS_PER_CHANNEL);
            // 位流长度是 12 的倍数，不会读到末尾之外
            let nibble = stream.read_bits(start, BITS_PER_CHANNEL).unwrap_or(0);
            *channel = replace_low_nibble(*channel, nibble);
        }
        trace!(x, y, ?original, ?modified, "carrier pixel rewritten");
        carrier.set(x, y, modified)?;
    }

    Ok(())
}

/// 将 `payload` 藏入 `carrier` 并返回修改后的载体。
///
/// # Errors
///
/// 见 [`embed`]。
pub fn encode(mut carrier: PixelBuffer, payload: &PixelBuffer) -> Result<PixelBuffer> {
    embed(&mut carrier, payload)?;
    Ok(carrier)
}

/// 读取载体头部像素声明的隐藏图像尺寸。
///
/// 任何非空图像都有一个“头部”，因此这里无法区分真正的隐写载体与普通图像。
///
/// # Errors
///
/// 载体为空时返回 [`StegoError::TruncatedCarrier`]。
pub fn read_header(carrier: &PixelBuffer) -> Result<Header> {
    let rgb = carrier.get(0, 0).map_err(|_| StegoError::TruncatedCarrier {
        required_bits: 24,
        available_bits: 0,
    })?;
    trace!(bits = %header_bits(rgb), "header pixel");
    Ok(Header::from_rgb(rgb))
}

/// 按列优先顺序收集恰好 `required` 位的低半字节数据。
fn extract_bits(carrier: &PixelBuffer, required: u64) -> Result<BitStream> {
    let (width, height) = carrier.size();
    let mut stream = BitStream::with_capacity(required + BITS_PER_CARRIER_PIXEL);

    for (x, y) in ColumnMajor::carrier_slots(width, height) {
        if stream.len() >= required {
            break;
        }
        for channel in carrier.get(x, y)? {
            stream.push_bits(u32::from(channel & LOW_NIBBLE_MASK), BITS_PER_CHANNEL);
        }
    }

    if stream.len() < required {
        return Err(StegoError::TruncatedCarrier {
            required_bits: required,
            available_bits: stream.len(),
        });
    }
    stream.truncate(required);
    Ok(stream)
}

/// 从载体中取出隐藏图像。
///
/// # Errors
///
/// 载体可用位数少于头部声明所需位数时返回 [`StegoError::TruncatedCarrier`]，
/// 不会用残缺的位流重建图像。
pub fn decode(carrier: &PixelBuffer) -> Result<PixelBuffer> {
    let (carrier_width, carrier_height) = carrier.size();
    let header = read_header(carrier)?;
    let required = required_bits(header.width(), header.height());
    let available = usable_capacity_bits(carrier_width, carrier_height);

    debug!(header = %header, bits = required, capacity = available, "extracting payload");

    if required > available {
        return Err(StegoError::TruncatedCarrier {
            required_bits: required,
            available_bits: available,
        });
    }

    let stream = extract_bits(carrier, required)?;

    let mut payload = PixelBuffer::new(header.width(), header.height());
    for (index, (x, y)) in ColumnMajor::new(header.width(), header.height()).enumerate() {
        let cursor = index as u64 * BITS_PER_PAYLOAD_PIXEL;
        let mut rgb: Rgb8 = [0; 3];
        for (channel_index, channel) in rgb.iter_mut().enumerate() {
            let value = stream
                .read_bits(cursor + channel_index as u64 * 8, 8)
                .ok_or(StegoError::TruncatedCarrier {
                    required_bits: required,
                    available_bits: stream.len(),
                })?;
            *channel = value as u8;
        }
        payload.set(x, y, rgb)?;
    }

    Ok(payload)
}
