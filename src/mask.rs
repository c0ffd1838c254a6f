// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/mask.rs - 二值掩码构建与形态学清理
//
// 本文件根据 Apache 许可证第 2.0 版（以下简称“许可证”）授权使用；
// 除非遵守该许可证条款，否则您不得使用本文件。
// 您可通过以下网址获取许可证副本：
// http://www.apache.org/licenses/LICENSE-2.0
// 除非适用法律要求或书面同意，根据本许可协议分发的软件均按“原样”提供，
// 不附带任何形式的明示或暗示的保证或条件。
// 有关许可权限与限制的具体条款，请参阅本许可协议。
//
// Copyright (C) 2026 Johann Li <me@qinka.pro>, Wareless Group

use image::{GrayImage, Luma};
use imageproc::map::{map_pixels, map_pixels2};
use imageproc::morphology::{Mask, grayscale_close, grayscale_open};

use crate::{color::HsvImage, config::HsvRange, model::BoundingBox};

pub const MASK_SET: u8 = 255;
pub const MASK_CLEAR: u8 = 0;

/// 落在区间内的像素置 255，其余置 0
pub fn in_range(hsv: &HsvImage, range: &HsvRange) -> GrayImage {
  let (width, height) = hsv.dimensions();
  GrayImage::from_fn(width, height, |x, y| {
    if range.contains(hsv.get(x, y)) {
      Luma([MASK_SET])
    } else {
      Luma([MASK_CLEAR])
    }
  })
}

/// 逐像素取最大值（OR）
///
/// 两个掩码尺寸必须一致。
pub fn union(a: &GrayImage, b: &GrayImage) -> GrayImage {
  map_pixels2(a, b, |p: Luma<u8>, q: Luma<u8>| Luma([p[0].max(q[0])]))
}

/// 逐像素取反（NOT）
pub fn invert(mask: &GrayImage) -> GrayImage {
  map_pixels(mask, |p: Luma<u8>| Luma([MASK_SET - p[0]]))
}

/// 统计矩形区域内的非零像素，矩形超出图像的部分被裁掉
pub fn count_nonzero_in(mask: &GrayImage, rect: &BoundingBox) -> u32 {
  let x0 = rect.x.min(mask.width());
  let y0 = rect.y.min(mask.height());
  let x1 = rect.x.saturating_add(rect.w).min(mask.width());
  let y1 = rect.y.saturating_add(rect.h).min(mask.height());

  let mut count = 0;
  for y in y0..y1 {
    for x in x0..x1 {
      if mask.get_pixel(x, y)[0] != MASK_CLEAR {
        count += 1;
      }
    }
  }
  count
}

/// 椭圆结构元素的像素图，尺寸为 size x size
///
/// 每行半宽取 `round(c * sqrt(1 - dy²/r²))`，5x5 时为
/// `..#..`、三行 `#####`、`..#..`。
pub fn ellipse_kernel_image(size: u8) -> GrayImage {
  let size = size.max(1) as u32;
  let r = (size / 2) as i32;
  let c = r;
  let inv_r2 = if r > 0 { 1.0 / (r * r) as f64 } else { 0.0 };

  let mut image = GrayImage::new(size, size);
  for i in 0..size as i32 {
    let dy = i - r;
    let dx = if dy.abs() <= r {
      (c as f64 * (((r * r - dy * dy) as f64) * inv_r2).sqrt()).round() as i32
    } else {
      0
    };
    let j1 = (c - dx).max(0);
    let j2 = (c + dx + 1).min(size as i32);
    for j in j1..j2 {
      image.put_pixel(j as u32, i as u32, Luma([MASK_SET]));
    }
  }
  image
}

pub fn ellipse_kernel(size: u8) -> Mask {
  let image = ellipse_kernel_image(size);
  let center = (image.width() / 2) as u8;
  Mask::from_image(&image, center, center)
}

/// 先闭运算填补小孔，再开运算去除孤立噪点
pub fn clean(mask: &GrayImage, kernel: &Mask) -> GrayImage {
  let closed = grayscale_close(mask, kernel);
  grayscale_open(&closed, kernel)
}
