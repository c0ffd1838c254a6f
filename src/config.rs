// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/config.rs - 检测参数配置
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

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

/// 色调上限（8 位 HSV 编码下色调取值 0-180）
pub const HUE_MAX: u8 = 180;

// 默认阈值
const RED_LOW_LOWER: [u8; 3] = [0, 70, 50];
const RED_LOW_UPPER: [u8; 3] = [10, 255, 255];
const RED_HIGH_LOWER: [u8; 3] = [170, 70, 50];
const RED_HIGH_UPPER: [u8; 3] = [180, 255, 255];
const GREEN_LOWER: [u8; 3] = [35, 40, 40];
const GREEN_UPPER: [u8; 3] = [85, 255, 255];
const RIPENESS_THRESHOLD: f64 = 0.5;
const EXPECTED_MIN_MM: f64 = 10.0;
const EXPECTED_MAX_MM: f64 = 30.0;
const DEFAULT_SCALE_MM_PER_PX: f64 = 0.5;
const KERNEL_SIZE: u8 = 5;

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("配置解析错误: {0}")]
  ParseError(#[from] serde_json::Error),
  #[error("配置无效: {0}")]
  Invalid(String),
}

/// HSV 闭区间，按 H、S、V 顺序逐通道比较
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HsvRange {
  pub lower: [u8; 3],
  pub upper: [u8; 3],
}

impl HsvRange {
  pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
    Self { lower, upper }
  }

  #[inline]
  pub fn contains(&self, hsv: [u8; 3]) -> bool {
    (0..3).all(|c| self.lower[c] <= hsv[c] && hsv[c] <= self.upper[c])
  }

  fn validate(&self, name: &str) -> Result<(), ConfigError> {
    if (0..3).any(|c| self.lower[c] > self.upper[c]) {
      return Err(ConfigError::Invalid(format!(
        "{} 区间下界大于上界: {:?} > {:?}",
        name, self.lower, self.upper
      )));
    }
    if self.upper[0] > HUE_MAX {
      return Err(ConfigError::Invalid(format!(
        "{} 色调上界 {} 超过 {}",
        name, self.upper[0], HUE_MAX
      )));
    }
    Ok(())
  }
}

/// 检测流程使用的全部固定参数
///
/// 默认值即标定时使用的阈值，可通过 JSON 文件逐项覆盖。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
  /// 红色低色调段（色调在 0 附近）
  pub red_low: HsvRange,
  /// 红色高色调段（色调在 180 附近）
  pub red_high: HsvRange,
  /// 绿色背景
  pub green: HsvRange,
  /// 成熟判定阈值，红色/果实像素比 >= 该值即为成熟
  pub ripeness_threshold: f64,
  pub expected_min_mm: f64,
  pub expected_max_mm: f64,
  /// 调用方未指定时使用的比例尺（毫米/像素）
  pub default_scale_mm_per_px: f64,
  /// 椭圆结构元素尺寸，必须为奇数
  pub kernel_size: u8,
}

impl Default for DetectorConfig {
  fn default() -> Self {
    Self {
      red_low: HsvRange::new(RED_LOW_LOWER, RED_LOW_UPPER),
      red_high: HsvRange::new(RED_HIGH_LOWER, RED_HIGH_UPPER),
      green: HsvRange::new(GREEN_LOWER, GREEN_UPPER),
      ripeness_threshold: RIPENESS_THRESHOLD,
      expected_min_mm: EXPECTED_MIN_MM,
      expected_max_mm: EXPECTED_MAX_MM,
      default_scale_mm_per_px: DEFAULT_SCALE_MM_PER_PX,
      kernel_size: KERNEL_SIZE,
    }
  }
}

impl DetectorConfig {
  /// 从 JSON 文件加载配置，缺失的字段保留默认值
  pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let config: DetectorConfig = serde_json::from_str(&text)?;
    debug!("从 {} 加载配置: {:?}", path.display(), config);
    Ok(config)
  }

  pub fn validate(&self) -> Result<(), ConfigError> {
    self.red_low.validate("red_low")?;
    self.red_high.validate("red_high")?;
    self.green.validate("green")?;

    if !self.ripeness_threshold.is_finite() {
      return Err(ConfigError::Invalid("成熟阈值必须为有限数".to_string()));
    }
    if !(self.expected_min_mm.is_finite() && self.expected_max_mm.is_finite())
      || self.expected_min_mm <= 0.0
      || self.expected_min_mm >= self.expected_max_mm
    {
      return Err(ConfigError::Invalid(format!(
        "期望尺寸范围无效: [{}, {}]",
        self.expected_min_mm, self.expected_max_mm
      )));
    }
    validate_scale(self.default_scale_mm_per_px)?;
    if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
      return Err(ConfigError::Invalid(format!(
        "结构元素尺寸必须为正奇数: {}",
        self.kernel_size
      )));
    }
    Ok(())
  }
}

pub fn validate_scale(scale_mm_per_px: f64) -> Result<(), ConfigError> {
  if !scale_mm_per_px.is_finite() || scale_mm_per_px <= 0.0 {
    return Err(ConfigError::Invalid(format!(
      "比例尺必须为正有限数: {}",
      scale_mm_per_px
    )));
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_matches_calibrated_thresholds() {
    let config = DetectorConfig::default();
    assert_eq!(config.red_low, HsvRange::new([0, 70, 50], [10, 255, 255]));
    assert_eq!(config.red_high, HsvRange::new([170, 70, 50], [180, 255, 255]));
    assert_eq!(config.green, HsvRange::new([35, 40, 40], [85, 255, 255]));
    assert_eq!(config.ripeness_threshold, 0.5);
    assert_eq!(config.expected_min_mm, 10.0);
    assert_eq!(config.expected_max_mm, 30.0);
    assert_eq!(config.default_scale_mm_per_px, 0.5);
    assert_eq!(config.kernel_size, 5);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn range_bounds_are_inclusive() {
    let range = HsvRange::new([35, 40, 40], [85, 255, 255]);
    assert!(range.contains([35, 40, 40]));
    assert!(range.contains([85, 255, 255]));
    assert!(!range.contains([34, 255, 255]));
    assert!(!range.contains([60, 39, 255]));
  }

  #[test]
  fn partial_json_keeps_defaults() {
    let config: DetectorConfig =
      serde_json::from_str(r#"{ "ripeness_threshold": 0.7, "expected_max_mm": 40.0 }"#).unwrap();
    assert_eq!(config.ripeness_threshold, 0.7);
    assert_eq!(config.expected_max_mm, 40.0);
    assert_eq!(config.green, DetectorConfig::default().green);
  }

  #[test]
  fn rejects_inverted_range() {
    let config = DetectorConfig {
      green: HsvRange::new([85, 40, 40], [35, 255, 255]),
      ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
  }

  #[test]
  fn rejects_even_kernel_and_bad_scale() {
    let config = DetectorConfig {
      kernel_size: 4,
      ..Default::default()
    };
    assert!(config.validate().is_err());
    assert!(validate_scale(0.0).is_err());
    assert!(validate_scale(f64::NAN).is_err());
    assert!(validate_scale(0.25).is_ok());
  }
}
