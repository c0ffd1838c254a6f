// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/model.rs - 模型
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

use std::fmt;

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::contour::RedContour;

pub trait Model {
  type Input;
  type Output;
  type Error;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error>;
}

/// 像素坐标下的轴对齐包围框
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BoundingBox {
  pub x: u32,
  pub y: u32,
  pub w: u32,
  pub h: u32,
}

/// 单张图像的检测结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
  pub is_ripe: bool,
  pub width_px: u32,
  pub width_mm: f64,
  pub confidence_color: f64,
  pub confidence_size: f64,
  pub bounding_box: BoundingBox,
  pub color_ratio: f64,
}

impl Detection {
  pub fn ripeness_label(&self) -> &'static str {
    if self.is_ripe { "RIPE" } else { "UNRIPE" }
  }
}

impl fmt::Display for Detection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let rule = "=".repeat(50);
    writeln!(f, "{}", rule)?;
    writeln!(
      f,
      "Raspberry detected: {}",
      if self.is_ripe { "RIPE ✓" } else { "UNRIPE ✗" }
    )?;
    writeln!(
      f,
      "Estimated width: {:.2} mm ({} px)",
      self.width_mm, self.width_px
    )?;
    writeln!(f, "Confidence (color): {:.2}", self.confidence_color)?;
    writeln!(f, "Confidence (size): {:.2}", self.confidence_size)?;
    write!(f, "{}", rule)
  }
}

/// 一次检测的完整中间产物，供可视化输出使用
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
  pub red_mask: GrayImage,
  pub fruit_mask: GrayImage,
  pub contours: Vec<RedContour>,
  /// 被选中轮廓在 `contours` 中的下标
  pub selected: Option<usize>,
  pub detection: Option<Detection>,
}

impl Analysis {
  pub fn is_empty(&self) -> bool {
    self.detection.is_none()
  }

  pub fn selected_contour(&self) -> Option<&RedContour> {
    self.selected.and_then(|index| self.contours.get(index))
  }
}

pub mod metrics;
mod ripeness;
pub use self::ripeness::{DetectorError, RipenessDetector, RipenessDetectorBuilder};
