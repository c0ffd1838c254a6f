// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/input/read_image_file.rs - 图像文件输入
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

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use image::ImageReader;
use thiserror::Error;
use tracing::{debug, error};
use url::Url;

use crate::{FromUrl, FromUrlWithScheme, frame::ImageFrame};

#[derive(Error, Debug)]
pub enum ImageFileInputError {
  #[error("URI 方案不匹配: 期望 '{expected}', 实际 '{found}'")]
  SchemeMismatch { expected: String, found: String },
  #[error("无法打开图片文件 {0}: {1}")]
  IoError(String, std::io::Error),
  #[error("无法解码图片文件 {0}: {1}")]
  ImageLoadError(String, image::ImageError),
}

/// 按顺序逐张解码的图像文件输入
///
/// 每次 `next()` 才读取下一张图片，单张失败不影响后续图片。
#[derive(Debug, Clone, Default)]
pub struct ImageFileInput {
  paths: VecDeque<PathBuf>,
}

impl FromUrlWithScheme for ImageFileInput {
  const SCHEME: &'static str = "image";
}

impl FromUrl for ImageFileInput {
  type Error = ImageFileInputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    if url.scheme() != Self::SCHEME {
      error!(
        "URI scheme mismatch: expected '{}', found '{}'",
        Self::SCHEME,
        url.scheme()
      );
      return Err(ImageFileInputError::SchemeMismatch {
        expected: Self::SCHEME.to_string(),
        found: url.scheme().to_string(),
      });
    }

    Ok(Self::open([url.path()]))
  }
}

impl ImageFileInput {
  pub fn open<I, P>(paths: I) -> Self
  where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
  {
    Self {
      paths: paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
    }
  }

  /// 剩余待读取的图片数量
  pub fn len(&self) -> usize {
    self.paths.len()
  }

  pub fn is_empty(&self) -> bool {
    self.paths.is_empty()
  }

  fn load(path: PathBuf) -> Result<ImageFrame, ImageFileInputError> {
    let source = path.display().to_string();
    let image = ImageReader::open(&path)
      .and_then(|reader| reader.with_guessed_format())
      .map_err(|e| ImageFileInputError::IoError(source.clone(), e))?
      .decode()
      .map_err(|e| ImageFileInputError::ImageLoadError(source.clone(), e))?
      .to_rgb8();

    debug!("图像已加载: {} ({}x{})", source, image.width(), image.height());
    Ok(ImageFrame::new(image, path))
  }
}

impl Iterator for ImageFileInput {
  type Item = Result<ImageFrame, ImageFileInputError>;

  fn next(&mut self) -> Option<Self::Item> {
    self.paths.pop_front().map(Self::load)
  }

  fn size_hint(&self) -> (usize, Option<usize>) {
    (self.paths.len(), Some(self.paths.len()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn missing_file_is_an_io_error() {
    let mut input = ImageFileInput::open(["/nonexistent/rubus/berry.png"]);
    assert_eq!(input.len(), 1);
    assert!(matches!(input.next(), Some(Err(ImageFileInputError::IoError(_, _)))));
    assert!(input.next().is_none());
  }

  #[test]
  fn url_scheme_must_match() {
    let url = Url::parse("folder:///tmp/out").unwrap();
    assert!(matches!(
      ImageFileInput::from_url(&url),
      Err(ImageFileInputError::SchemeMismatch { .. })
    ));

    let url = Url::parse("image:///tmp/berry.jpg").unwrap();
    let input = ImageFileInput::from_url(&url).unwrap();
    assert_eq!(input.len(), 1);
  }

  #[test]
  fn corrupt_file_is_a_decode_error() {
    let path = std::env::temp_dir().join(format!("rubus-corrupt-{}.png", std::process::id()));
    std::fs::write(&path, b"definitely not a png").unwrap();
    let mut input = ImageFileInput::open([&path]);
    let result = input.next().unwrap();
    std::fs::remove_file(&path).ok();
    assert!(matches!(result, Err(ImageFileInputError::ImageLoadError(_, _))));
  }

  #[test]
  fn loads_grayscale_png_as_rgb() {
    let path = std::env::temp_dir().join(format!("rubus-gray-{}.png", std::process::id()));
    image::GrayImage::from_pixel(6, 4, image::Luma([90])).save(&path).unwrap();
    let mut input = ImageFileInput::open([&path]);
    let frame = input.next().unwrap();
    std::fs::remove_file(&path).ok();

    let frame = frame.unwrap();
    assert_eq!(frame.image.dimensions(), (6, 4));
    assert_eq!(frame.image.get_pixel(5, 3).0, [90, 90, 90]);
    assert_eq!(frame.source(), path.as_path());
  }
}
