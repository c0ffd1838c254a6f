// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/output/report.rs - 控制台报告
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

use serde::Serialize;

use crate::{frame::ImageFrame, model::Detection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
  /// 人类可读的摘要块
  #[default]
  Text,
  /// 每张图像一行 JSON
  Json,
}

#[derive(Debug, Serialize)]
struct ReportLine<'a> {
  source: String,
  width: u32,
  height: u32,
  detection: Option<&'a Detection>,
}

/// 单张图像的 JSON 报告行，未检测到目标时 `detection` 为 `null`
pub fn json_line(frame: &ImageFrame, detection: Option<&Detection>) -> serde_json::Result<String> {
  serde_json::to_string(&ReportLine {
    source: frame.source().display().to_string(),
    width: frame.width(),
    height: frame.height(),
    detection,
  })
}

/// 按格式生成报告文本
pub fn render(
  format: ReportFormat,
  frame: &ImageFrame,
  detection: Option<&Detection>,
) -> serde_json::Result<String> {
  match format {
    ReportFormat::Json => json_line(frame, detection),
    ReportFormat::Text => Ok(match detection {
      Some(detection) => format!("\n{}\n", detection),
      None => "❌ 未检测到红色轮廓".to_string(),
    }),
  }
}
