// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/output.rs - 输出定义
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

use crate::FromUrl;
#[cfg(any(feature = "save_image_file", feature = "directory_record"))]
use crate::FromUrlWithScheme;
use crate::frame::ImageFrame;
use crate::model::Analysis;
#[cfg(any(feature = "save_image_file", feature = "directory_record"))]
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

pub trait Render<Frame, Output>: Sized {
  type Error;
  fn render_result(&self, frame: &Frame, result: &Output) -> Result<(), Self::Error>;
}

/// 未配置输出时什么也不做
impl<Frame, Output, R: Render<Frame, Output>> Render<Frame, Output> for Option<R> {
  type Error = R::Error;

  fn render_result(&self, frame: &Frame, result: &Output) -> Result<(), Self::Error> {
    match self {
      Some(render) => render.render_result(frame, result),
      None => Ok(()),
    }
  }
}

pub mod report;

#[cfg(any(feature = "save_image_file", feature = "directory_record"))]
pub mod draw;
#[cfg(any(feature = "save_image_file", feature = "directory_record"))]
use self::draw::Draw;

#[cfg(any(feature = "save_image_file", feature = "directory_record"))]
pub(crate) const RED_MASK_SUFFIX: &str = "red-mask";
#[cfg(any(feature = "save_image_file", feature = "directory_record"))]
pub(crate) const FRUIT_MASK_SUFFIX: &str = "fruit-mask";

/// 同目录下的 `<stem>-<suffix>.png`
#[cfg(any(feature = "save_image_file", feature = "directory_record"))]
pub(crate) fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
  let stem = path
    .file_stem()
    .map(|s| s.to_string_lossy().into_owned())
    .unwrap_or_default();
  path.with_file_name(format!("{}-{}.png", stem, suffix))
}

#[cfg(any(feature = "save_image_file", feature = "directory_record"))]
pub(crate) fn ensure_parent(path: &Path) -> std::io::Result<()> {
  if let Some(parent) = path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)?;
  }
  Ok(())
}

#[cfg(feature = "save_image_file")]
mod save_image_file;
#[cfg(feature = "save_image_file")]
pub use self::save_image_file::{SaveImageFileError, SaveImageFileOutput};

#[cfg(feature = "directory_record")]
mod directory_record;
#[cfg(feature = "directory_record")]
pub use self::directory_record::{DirectoryRecordOutput, DirectoryRecordOutputError};

#[derive(Error, Debug)]
pub enum OutputError {
  #[cfg(feature = "save_image_file")]
  #[error("保存图像文件错误: {0}")]
  SaveImageFileError(#[from] SaveImageFileError),
  #[cfg(feature = "directory_record")]
  #[error("目录记录输出错误: {0}")]
  DirectoryRecordOutputError(#[from] DirectoryRecordOutputError),
  #[error("URI 方案不匹配: {0}")]
  SchemeMismatch(String),
}

pub enum OutputWrapper {
  #[cfg(feature = "save_image_file")]
  SaveImageFileOutput(SaveImageFileOutput),
  #[cfg(feature = "directory_record")]
  DirectoryRecordOutput(DirectoryRecordOutput),
}

impl FromUrl for OutputWrapper {
  type Error = OutputError;

  fn from_url(url: &Url) -> Result<Self, Self::Error> {
    match url.scheme() {
      #[cfg(feature = "save_image_file")]
      SaveImageFileOutput::SCHEME => {
        let output = SaveImageFileOutput::from_url(url)?;
        Ok(OutputWrapper::SaveImageFileOutput(output))
      }
      #[cfg(feature = "directory_record")]
      DirectoryRecordOutput::SCHEME => {
        let output = DirectoryRecordOutput::from_url(url)?;
        Ok(OutputWrapper::DirectoryRecordOutput(output))
      }
      scheme => Err(OutputError::SchemeMismatch(scheme.to_string())),
    }
  }
}

#[cfg(any(feature = "save_image_file", feature = "directory_record"))]
impl OutputWrapper {
  /// 单文件输出的路径与图像无关，多张图像会互相覆盖
  pub fn accepts_multiple_frames(&self) -> bool {
    match self {
      #[cfg(feature = "save_image_file")]
      OutputWrapper::SaveImageFileOutput(_) => false,
      #[cfg(feature = "directory_record")]
      OutputWrapper::DirectoryRecordOutput(_) => true,
    }
  }

  /// 替换绘制工具（例如加载了标签字体的 `Draw`）
  pub fn with_draw(self, draw: Draw) -> Self {
    match self {
      #[cfg(feature = "save_image_file")]
      OutputWrapper::SaveImageFileOutput(output) => {
        OutputWrapper::SaveImageFileOutput(output.with_draw(draw))
      }
      #[cfg(feature = "directory_record")]
      OutputWrapper::DirectoryRecordOutput(output) => {
        OutputWrapper::DirectoryRecordOutput(output.with_draw(draw))
      }
    }
  }
}

impl Render<ImageFrame, Analysis> for OutputWrapper {
  type Error = OutputError;

  fn render_result(&self, frame: &ImageFrame, result: &Analysis) -> Result<(), Self::Error> {
    match self {
      #[cfg(feature = "save_image_file")]
      OutputWrapper::SaveImageFileOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
      #[cfg(feature = "directory_record")]
      OutputWrapper::DirectoryRecordOutput(output) => output
        .render_result(frame, result)
        .map_err(OutputError::from),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn unknown_scheme_is_rejected() {
    let url = Url::parse("rtsp://camera.local/stream").unwrap();
    assert!(matches!(
      OutputWrapper::from_url(&url),
      Err(OutputError::SchemeMismatch(s)) if s == "rtsp"
    ));
  }

  #[cfg(all(feature = "save_image_file", feature = "directory_record"))]
  #[test]
  fn only_folder_output_takes_several_frames() {
    let single = OutputWrapper::from_url(&Url::parse("image:///tmp/result.png").unwrap()).unwrap();
    assert!(!single.accepts_multiple_frames());

    let folder = OutputWrapper::from_url(&Url::parse("folder:rubus-output?always").unwrap()).unwrap();
    assert!(folder.accepts_multiple_frames());
  }

  #[test]
  fn none_renders_nothing() {
    struct Fails;
    impl Render<u8, u8> for Fails {
      type Error = ();
      fn render_result(&self, _: &u8, _: &u8) -> Result<(), ()> {
        Err(())
      }
    }

    let output: Option<Fails> = None;
    assert!(output.render_result(&0, &0).is_ok());
    assert!(Some(Fails).render_result(&0, &0).is_err());
  }
}
