// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/frame.rs - 图像帧定义
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

use std::path::{Path, PathBuf};

use image::RgbImage;

const UNNAMED_FRAME: &str = "frame";

/// 解码后的 RGB 图像及其来源
#[derive(Debug, Clone)]
pub struct ImageFrame {
  pub image: RgbImage,
  pub source: PathBuf,
}

impl ImageFrame {
  pub fn new<P: Into<PathBuf>>(image: RgbImage, source: P) -> Self {
    Self {
      image,
      source: source.into(),
    }
  }

  pub fn width(&self) -> u32 {
    self.image.width()
  }

  pub fn height(&self) -> u32 {
    self.image.height()
  }

  pub fn source(&self) -> &Path {
    &self.source
  }

  /// 来源文件名（不含扩展名），用于命名输出文件
  pub fn stem(&self) -> String {
    self
      .source
      .file_stem()
      .map(|s| s.to_string_lossy().into_owned())
      .filter(|s| !s.is_empty())
      .unwrap_or_else(|| UNNAMED_FRAME.to_string())
  }
}

impl From<RgbImage> for ImageFrame {
  fn from(image: RgbImage) -> Self {
    Self::new(image, PathBuf::new())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn stem_falls_back_for_unnamed_frames() {
    let frame = ImageFrame::from(RgbImage::new(2, 2));
    assert_eq!(frame.stem(), "frame");

    let frame = ImageFrame::new(RgbImage::new(2, 2), "shots/berry-01.jpg");
    assert_eq!(frame.stem(), "berry-01");
    assert_eq!((frame.width(), frame.height()), (2, 2));
  }
}
