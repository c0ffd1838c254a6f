// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/output/directory_record.rs - 目录记录输出
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
use std::sync::atomic::{AtomicU16, Ordering};

use chrono::{DateTime, Datelike, Utc};
use thiserror::Error;
use tracing::{debug, info};

use crate::{
  FromUrl, FromUrlWithScheme,
  frame::ImageFrame,
  model::Analysis,
  output::{FRUIT_MASK_SUFFIX, RED_MASK_SUFFIX, Render, draw::Draw, ensure_parent, sibling_path},
};

#[derive(Error, Debug)]
pub enum DirectoryRecordOutputError {
  #[error("URI 方案不匹配")]
  SchemeMismatch,
  #[error("图像错误: {0}")]
  ImageError(#[from] image::ImageError),
  #[error("I/O 错误: {0}")]
  IoError(#[from] std::io::Error),
  #[error("记录序列化错误: {0}")]
  JsonError(#[from] serde_json::Error),
}

/// 按日期分目录保存标注图像、掩码和 JSON 记录
///
/// 路径形如 `<dir>/YYYY/MM/DD/<stem>-HH-MM-SS-NNNN.png`。
pub struct DirectoryRecordOutput {
  directory: PathBuf,
  draw: Draw,
  frame_counter: AtomicU16,
  always: bool,
}

impl FromUrlWithScheme for DirectoryRecordOutput {
  const SCHEME: &'static str = "folder";
}

impl FromUrl for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn from_url(uri: &url::Url) -> Result<Self, Self::Error> {
    if uri.scheme() != Self::SCHEME {
      return Err(DirectoryRecordOutputError::SchemeMismatch);
    }

    let always = uri.query_pairs().any(|(k, _)| k == "always");

    Ok(Self::new(uri.path()).with_always(always))
  }
}

impl DirectoryRecordOutput {
  pub fn new<P: Into<PathBuf>>(directory: P) -> Self {
    Self {
      directory: directory.into(),
      draw: Draw::default(),
      frame_counter: AtomicU16::new(0),
      always: false,
    }
  }

  pub fn with_draw(mut self, draw: Draw) -> Self {
    self.draw = draw;
    self
  }

  /// 未检测到目标的图像是否也要记录
  pub fn with_always(mut self, always: bool) -> Self {
    self.always = always;
    self
  }

  pub fn directory(&self) -> &Path {
    &self.directory
  }

  fn frame_id(&self) -> u16 {
    self.frame_counter.fetch_add(1, Ordering::Relaxed).wrapping_add(1)
  }

  fn frame_path(&self, frame: &ImageFrame, now: DateTime<Utc>) -> PathBuf {
    self
      .directory
      .join(now.year().to_string())
      .join(format!("{:02}", now.month()))
      .join(format!("{:02}", now.day()))
      .join(format!(
        "{}-{}-{:04X}.png",
        frame.stem(),
        now.format("%H-%M-%S"),
        self.frame_id()
      ))
  }
}

impl Render<ImageFrame, Analysis> for DirectoryRecordOutput {
  type Error = DirectoryRecordOutputError;

  fn render_result(&self, frame: &ImageFrame, result: &Analysis) -> Result<(), Self::Error> {
    if !self.always && result.is_empty() {
      debug!("未检测到目标，跳过记录: {}", frame.source().display());
      return Ok(());
    }

    let path = self.frame_path(frame, Utc::now());
    ensure_parent(&path)?;

    if result.detection.is_some() {
      self.draw.draw_analysis(frame, result).save(&path)?;
      result.fruit_mask.save(sibling_path(&path, FRUIT_MASK_SUFFIX))?;
    } else {
      frame.image.save(&path)?;
    }
    result.red_mask.save(sibling_path(&path, RED_MASK_SUFFIX))?;

    let record = serde_json::to_string_pretty(&result.detection)?;
    std::fs::write(path.with_extension("json"), record)?;

    info!("检测记录已保存: {}", path.display());
    Ok(())
  }
}
