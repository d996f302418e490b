/// 头部字段 (宽或高) 占用的位数。
/// 载体像素 (0,0) 的三个通道共 24 位，宽高各占一半。
pub const HEADER_FIELD_BITS: u32 = 12;

/// 12 位头部字段能表示的最大边长。
pub const MAX_PAYLOAD_SIDE: u32 = (1 << HEADER_FIELD_BITS) - 1;

/// 每个载体通道中被改写的低位数 (低半字节)。
pub const BITS_PER_CHANNEL: u32 = 4;

/// 低半字节掩码。
pub const LOW_NIBBLE_MASK: u8 = 0x0F;

/// 每个可用载体像素承载的位数: 4 bits × 3 个通道。
pub const BITS_PER_CARRIER_PIXEL: u64 = 12;

/// 每个隐藏图像像素序列化后的位数: R(8) + G(8) + B(8)。
pub const BITS_PER_PAYLOAD_PIXEL: u64 = 24;

/// 未指定输出路径时，`encode` 写出的文件名。
pub const DEFAULT_ENCODED_OUTPUT: &str = "Encoded_image.png";

/// 未指定输出路径时，`decode` 写出的文件名。
pub const DEFAULT_DECODED_OUTPUT: &str = "Decoded_image.png";

/// 输出文件总是以 PNG 格式保存。
pub const OUTPUT_EXTENSION: &str = "png";
