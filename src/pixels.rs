//! # 像素缓冲模块
//!
//! [`PixelBuffer`] 是编解码核心唯一接触的图像表示: 固定尺寸的 RGB 三字节网格，
//! 所有按坐标的访问都带边界检查。与 `image` 库之间的转换也集中在这里。

use crate::error::{Result, StegoError};
use image::{ColorType, DynamicImage, Rgb, RgbImage};

pub type Rgb8 = [u8; 3];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb8>,
}

impl PixelBuffer {
    /// 创建一个全黑的缓冲。
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0])
    }

    pub fn filled(width: u32, height: u32, color: Rgb8) -> Self {
        let len = width as usize * height as usize;
        Self {
            width,
            height,
            pixels: vec![color; len],
        }
    }

    /// 由行优先排列的像素数据构造缓冲。
    ///
    /// # Errors
    ///
    /// 数据长度与 `width × height` 不符时返回 [`StegoError::DimensionMismatch`]。
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgb8>) -> Result<Self> {
        if pixels.len() != width as usize * height as usize {
            return Err(StegoError::DimensionMismatch {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    fn index(&self, x: u32, y: u32) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(StegoError::PixelOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }

    pub fn get(&self, x: u32, y: u32) -> Result<Rgb8> {
        let index = self.index(x, y)?;
        Ok(self.pixels[index])
    }

    pub fn set(&mut self, x: u32, y: u32, rgb: Rgb8) -> Result<()> {
        let index = self.index(x, y)?;
        self.pixels[index] = rgb;
        Ok(())
    }

    /// 将任意受支持的解码结果规整为 RGB。
    ///
    /// 8 位灰度与带 alpha 的图像会被展开或丢弃 alpha；16 位与浮点图像无法无损地
    /// 落入 8 位通道，直接拒绝。
    ///
    /// # Errors
    ///
    /// 返回 [`StegoError::UnsupportedFormat`]。
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self> {
        match image.color() {
            ColorType::L8 | ColorType::La8 | ColorType::Rgb8 | ColorType::Rgba8 => {
                Ok(Self::from(image.to_rgb8()))
            }
            other => Err(StegoError::UnsupportedFormat(format!(
                "{other:?} cannot be represented as 8-bit RGB without loss"
            ))),
        }
    }

    pub fn into_rgb_image(self) -> RgbImage {
        let (width, height) = self.size();
        RgbImage::from_fn(width, height, |x, y| {
            Rgb(self.pixels[y as usize * width as usize + x as usize])
        })
    }
}

impl From<RgbImage> for PixelBuffer {
    fn from(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        let pixels = image.pixels().map(|pixel| pixel.0).collect();
        Self {
            width,
            height,
            pixels,
        }
    }
}
