// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/main.rs - 项目主程序
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

mod args;

use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use rubus::{
  FromUrl,
  input::ImageFileInput,
  model::RipenessDetectorBuilder,
  output::{OutputWrapper, draw::Draw, report::ReportFormat},
  task::{BatchTask, OneShotTask, Task, TaskSummary},
};

fn main() -> Result<ExitCode> {
  // 标准输出只留给检测报告
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
    .with_writer(std::io::stderr)
    .init();

  let args = args::Args::parse();

  info!("输入图片: {:?}", args.images);
  info!("输出位置: {}", args.output);

  let mut builder = match &args.config {
    Some(path) => RipenessDetectorBuilder::from_config_file(path)
      .with_context(|| format!("无法加载配置文件: {}", path.display()))?,
    None => RipenessDetectorBuilder::new(),
  };
  if let Some(scale) = args.scale {
    builder = builder.scale_mm_per_px(scale);
  }
  let detector = builder.build()?;
  info!(
    "比例尺: {} mm/px, 成熟阈值: {}",
    detector.scale_mm_per_px(),
    detector.config().ripeness_threshold
  );

  let output = if args.no_display {
    None
  } else {
    let output = OutputWrapper::from_url(&args.output)?;
    if args.images.len() > 1 && !output.accepts_multiple_frames() {
      bail!("输出 {} 只能保存一张图像，多张图像请使用 folder: 输出", args.output);
    }
    let draw = match &args.font {
      Some(path) => Draw::with_font_file(path)
        .with_context(|| format!("无法加载字体: {}", path.display()))?,
      None => Draw::default(),
    };
    if !draw.has_font() {
      info!("未指定字体，标签使用内置点阵字形");
    }
    Some(output.with_draw(draw))
  };

  let format = if args.json {
    ReportFormat::Json
  } else {
    ReportFormat::Text
  };

  let input = ImageFileInput::open(&args.images);
  let summary: TaskSummary = if input.len() == 1 {
    OneShotTask::default()
      .with_format(format)
      .run_task(input, detector, output)?
  } else {
    BatchTask::default()
      .with_format(format)
      .run_task(input, detector, output)?
  };

  Ok(if summary.all_detected() {
    ExitCode::SUCCESS
  } else {
    ExitCode::FAILURE
  })
}
