// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/model/metrics.rs - 成熟度与尺寸指标
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

use crate::{
  config::DetectorConfig,
  model::{BoundingBox, Detection},
};

/// 被选中的候选轮廓
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
  pub index: usize,
  pub bounding_box: BoundingBox,
  pub color_ratio: f64,
}

/// 红色像素数 / 果实像素数，果实像素为 0 时取 0
pub fn color_ratio(red_pixels: u32, fruit_pixels: u32) -> f64 {
  if fruit_pixels > 0 {
    red_pixels as f64 / fruit_pixels as f64
  } else {
    0.0
  }
}

pub fn is_ripe(color_ratio: f64, threshold: f64) -> bool {
  color_ratio >= threshold
}

pub fn confidence_color(color_ratio: f64) -> f64 {
  color_ratio.clamp(0.0, 1.0)
}

/// 尺寸置信度
///
/// 分段线性：低于下限按 `w / min`，高于上限按 `1 - min(1, (w - max) / max)`，
/// 区间内按 `(w - min) / (max - min)`，最后截断到 [0, 1]。
/// 超出上限分支在 2 倍上限处才降到 0，不是对称的隶属函数。
pub fn confidence_size(width_mm: f64, expected_min_mm: f64, expected_max_mm: f64) -> f64 {
  let conf = if width_mm < expected_min_mm {
    width_mm / expected_min_mm
  } else if width_mm > expected_max_mm {
    1.0 - f64::min(1.0, (width_mm - expected_max_mm) / expected_max_mm)
  } else {
    (width_mm - expected_min_mm) / (expected_max_mm - expected_min_mm)
  };
  conf.clamp(0.0, 1.0)
}

/// 由候选框和比例尺计算最终检测结果
pub fn derive(candidate: &Candidate, scale_mm_per_px: f64, config: &DetectorConfig) -> Detection {
  let bounding_box = candidate.bounding_box;
  let width_mm = bounding_box.w as f64 * scale_mm_per_px;

  Detection {
    is_ripe: is_ripe(candidate.color_ratio, config.ripeness_threshold),
    width_px: bounding_box.w,
    width_mm,
    confidence_color: confidence_color(candidate.color_ratio),
    confidence_size: confidence_size(width_mm, config.expected_min_mm, config.expected_max_mm),
    bounding_box,
    color_ratio: candidate.color_ratio,
  }
}
