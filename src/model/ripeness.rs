// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/model/ripeness.rs - 覆盆子成熟度检测
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

use std::path::Path;

use image::{GrayImage, RgbImage};
use imageproc::morphology::Mask;
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::{
  color::rgb_to_hsv,
  config::{ConfigError, DetectorConfig, validate_scale},
  contour::{RedContour, external_contours},
  frame::ImageFrame,
  mask::{clean, count_nonzero_in, ellipse_kernel, in_range, invert, union},
  model::{
    Analysis, Model,
    metrics::{self, Candidate},
  },
};

#[derive(Error, Debug)]
pub enum DetectorError {
  #[error("配置错误: {0}")]
  ConfigError(#[from] ConfigError),
  #[error("图像为空: {0}x{1}")]
  EmptyImage(u32, u32),
}

#[derive(Debug, Clone, Default)]
pub struct RipenessDetectorBuilder {
  config: DetectorConfig,
  scale_mm_per_px: Option<f64>,
}

impl RipenessDetectorBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn from_config_file<P: AsRef<Path>>(path: P) -> Result<Self, DetectorError> {
    let config = DetectorConfig::from_json_file(path)?;
    Ok(Self::default().with_config(config))
  }

  pub fn with_config(mut self, config: DetectorConfig) -> Self {
    self.config = config;
    self
  }

  /// 覆盖配置中的默认比例尺
  pub fn scale_mm_per_px(mut self, scale_mm_per_px: f64) -> Self {
    self.scale_mm_per_px = Some(scale_mm_per_px);
    self
  }

  pub fn build(self) -> Result<RipenessDetector, DetectorError> {
    self.config.validate()?;
    let scale_mm_per_px = self
      .scale_mm_per_px
      .unwrap_or(self.config.default_scale_mm_per_px);
    validate_scale(scale_mm_per_px)?;

    let kernel = ellipse_kernel(self.config.kernel_size);
    debug!(
      "检测器构建完成: 比例尺 {} mm/px, 结构元素 {}x{}",
      scale_mm_per_px, self.config.kernel_size, self.config.kernel_size
    );

    Ok(RipenessDetector {
      config: self.config,
      scale_mm_per_px,
      kernel,
    })
  }
}

/// 在图像中寻找最宽的红色区域并估计其成熟度与宽度
pub struct RipenessDetector {
  config: DetectorConfig,
  scale_mm_per_px: f64,
  kernel: Mask,
}

impl RipenessDetector {
  pub fn config(&self) -> &DetectorConfig {
    &self.config
  }

  pub fn scale_mm_per_px(&self) -> f64 {
    self.scale_mm_per_px
  }

  pub fn analyze(&self, image: &RgbImage) -> Result<Analysis, DetectorError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
      return Err(DetectorError::EmptyImage(width, height));
    }

    let hsv = rgb_to_hsv(image);

    let red_mask = union(
      &in_range(&hsv, &self.config.red_low),
      &in_range(&hsv, &self.config.red_high),
    );
    let fruit_mask = invert(&in_range(&hsv, &self.config.green));
    let red_mask = clean(&red_mask, &self.kernel);

    let contours = external_contours(&red_mask);
    if contours.is_empty() {
      info!("未检测到红色轮廓");
      return Ok(Analysis {
        red_mask,
        fruit_mask,
        contours,
        selected: None,
        detection: None,
      });
    }
    info!("检测到 {} 个红色轮廓", contours.len());

    let candidate = select_widest(&contours, &red_mask, &fruit_mask);
    let detection = candidate.map(|c| metrics::derive(&c, self.scale_mm_per_px, &self.config));
    if let Some(detection) = &detection {
      debug!(
        "选中候选框 {:?}, 红色比例 {:.4}",
        detection.bounding_box, detection.color_ratio
      );
    }

    Ok(Analysis {
      red_mask,
      fruit_mask,
      contours,
      selected: candidate.map(|c| c.index),
      detection,
    })
  }
}

/// 选出包围框最宽的轮廓，宽度相同时保留先出现的
fn select_widest(
  contours: &[RedContour],
  red_mask: &GrayImage,
  fruit_mask: &GrayImage,
) -> Option<Candidate> {
  let mut best_width = 0;
  let mut best = None;

  for (index, contour) in contours.iter().enumerate() {
    let bounding_box = contour.bounding_box;
    let red_pixels = count_nonzero_in(red_mask, &bounding_box);
    let fruit_pixels = count_nonzero_in(fruit_mask, &bounding_box);
    let color_ratio = metrics::color_ratio(red_pixels, fruit_pixels);
    trace!(
      "轮廓 {}: {:?}, 红色 {} / 果实 {}",
      index, bounding_box, red_pixels, fruit_pixels
    );

    if bounding_box.w > best_width {
      best_width = bounding_box.w;
      best = Some(Candidate {
        index,
        bounding_box,
        color_ratio,
      });
    }
  }

  best
}

impl Model for RipenessDetector {
  type Input = ImageFrame;
  type Output = Analysis;
  type Error = DetectorError;

  fn infer(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
    self.analyze(&input.image)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::BoundingBox;
  use imageproc::point::Point;

  fn contour(x: u32, w: u32) -> RedContour {
    RedContour {
      points: vec![Point::new(x as i32, 0)],
      bounding_box: BoundingBox { x, y: 0, w, h: 1 },
    }
  }

  #[test]
  fn widest_wins_and_ties_keep_first() {
    let mask = GrayImage::new(100, 1);
    let contours = vec![contour(0, 10), contour(20, 30), contour(60, 30), contour(95, 5)];
    let best = select_widest(&contours, &mask, &mask).unwrap();
    assert_eq!(best.index, 1);
    assert_eq!(best.bounding_box.x, 20);
  }

  #[test]
  fn no_contours_means_no_candidate() {
    let mask = GrayImage::new(4, 4);
    assert!(select_widest(&[], &mask, &mask).is_none());
  }

  #[test]
  fn builder_rejects_bad_scale() {
    let result = RipenessDetectorBuilder::new().scale_mm_per_px(-1.0).build();
    assert!(matches!(result, Err(DetectorError::ConfigError(_))));
  }

  #[test]
  fn scale_defaults_to_config() {
    let detector = RipenessDetectorBuilder::new().build().unwrap();
    assert_eq!(detector.scale_mm_per_px(), 0.5);
  }

  #[test]
  fn empty_image_is_rejected() {
    let detector = RipenessDetectorBuilder::new().build().unwrap();
    let result = detector.analyze(&RgbImage::new(0, 0));
    assert!(matches!(result, Err(DetectorError::EmptyImage(0, 0))));
  }
}
