// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/color.rs - RGB 到 HSV 颜色空间转换
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

use std::sync::LazyLock;

use image::{Rgb, RgbImage};
use imageproc::map::map_pixels;

use crate::config::HUE_MAX;

// 8 位定点转换的移位位数
const HSV_SHIFT: i32 = 12;
const HSV_ROUND: i32 = 1 << (HSV_SHIFT - 1);

// 饱和度除法表: round((255 << 12) / v)
static SDIV_TABLE: LazyLock<[i32; 256]> = LazyLock::new(|| {
  let mut table = [0i32; 256];
  for (v, entry) in table.iter_mut().enumerate().skip(1) {
    *entry = ((255 << HSV_SHIFT) as f64 / v as f64).round() as i32;
  }
  table
});

// 色调除法表: round((180 << 12) / (6 * diff))
static HDIV_TABLE: LazyLock<[i32; 256]> = LazyLock::new(|| {
  let mut table = [0i32; 256];
  for (diff, entry) in table.iter_mut().enumerate().skip(1) {
    *entry = (((HUE_MAX as i32) << HSV_SHIFT) as f64 / (6.0 * diff as f64)).round() as i32;
  }
  table
});

/// HSV 图像，三个通道依次为 H (0-179)、S、V
///
/// 复用三通道 8 位缓冲区存储，通道含义与 RGB 无关。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HsvImage {
  inner: RgbImage,
}

impl HsvImage {
  pub fn dimensions(&self) -> (u32, u32) {
    self.inner.dimensions()
  }

  #[inline]
  pub fn get(&self, x: u32, y: u32) -> [u8; 3] {
    self.inner.get_pixel(x, y).0
  }
}

/// 将 RGB 图像转换为 HSV 图像
pub fn rgb_to_hsv(image: &RgbImage) -> HsvImage {
  HsvImage {
    inner: map_pixels(image, |pixel: Rgb<u8>| Rgb(hsv_pixel(pixel.0))),
  }
}

/// 单像素转换，结果与常见视觉库的 8 位定点实现逐位一致
pub fn hsv_pixel([r, g, b]: [u8; 3]) -> [u8; 3] {
  let (r, g, b) = (r as i32, g as i32, b as i32);

  let v = r.max(g).max(b);
  let vmin = r.min(g).min(b);
  let diff = v - vmin;

  let s = (diff * SDIV_TABLE[v as usize] + HSV_ROUND) >> HSV_SHIFT;

  // 最大通道优先级: R > G > B
  let h = if v == r {
    g - b
  } else if v == g {
    b - r + 2 * diff
  } else {
    r - g + 4 * diff
  };
  let mut h = (h * HDIV_TABLE[diff as usize] + HSV_ROUND) >> HSV_SHIFT;
  if h < 0 {
    h += HUE_MAX as i32;
  }

  [h as u8, s as u8, v as u8]
}
