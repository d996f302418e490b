//! # 遍历顺序模块
//!
//! 编码器与解码器共用的像素访问顺序: 按列优先，外层遍历 x，内层遍历 y。
//! 对载体而言，坐标 (0,0) 存放头部，总是被跳过。

/// 列优先的坐标迭代器。
#[derive(Debug, Clone)]
pub struct ColumnMajor {
    height: u32,
    next: u64,
    end: u64,
}

impl ColumnMajor {
    /// 遍历 `width × height` 网格中的全部坐标。
    pub fn new(width: u32, height: u32) -> Self {
        Self::starting_at(width, height, 0)
    }

    /// 遍历载体中可承载数据的坐标，即跳过头部像素 (0,0)。
    pub fn carrier_slots(width: u32, height: u32) -> Self {
        Self::starting_at(width, height, 1)
    }

    fn starting_at(width: u32, height: u32, start: u64) -> Self {
        let end = u64::from(width) * u64::from(height);
        Self {
            height,
            next: start.min(end),
            end,
        }
    }

    /// 序列中第 `index` 个坐标 (不考虑跳过)。
    ///
    /// 位游标可以直接由坐标在序列中的位置算出，不依赖共享的递增计数器。
    /// 高度为 0 的网格没有任何坐标，返回 `None`。
    pub fn coordinate_at(height: u32, index: u64) -> Option<(u32, u32)> {
        let height = u64::from(height);
        if height == 0 {
            return None;
        }
        Some(((index / height) as u32, (index % height) as u32))
    }
}

impl Iterator for ColumnMajor {
    type Item = (u32, u32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let coordinate = Self::coordinate_at(self.height, self.next)?;
        self.next += 1;
        Some(coordinate)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.end - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ColumnMajor {}
