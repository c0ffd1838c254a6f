// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/task.rs - 检测任务
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

use std::io::Write;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::{
  frame::ImageFrame,
  model::{Analysis, Model},
  output::{
    Render,
    report::{self, ReportFormat},
  },
};

pub trait Task<I, M, O>: Sized {
  type Output;
  type Error;
  fn run_task(self, input: I, model: M, output: O) -> Result<Self::Output, Self::Error>;
}

/// 任务统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskSummary {
  pub processed: usize,
  pub detected: usize,
  pub failed: usize,
}

impl TaskSummary {
  /// 每张图像都成功加载并检测到目标
  pub fn all_detected(&self) -> bool {
    self.processed > 0 && self.failed == 0 && self.detected == self.processed
  }
}

/// 处理单张图像，报告写入 `report`，日志不进入该输出
pub fn process_frame<IE, ME, RE, M, O, W>(
  frame: Result<ImageFrame, IE>,
  model: &M,
  output: &O,
  format: ReportFormat,
  report: &mut W,
  summary: &mut TaskSummary,
) -> anyhow::Result<()>
where
  IE: std::error::Error + Sync + Send + 'static,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  M: Model<Input = ImageFrame, Output = Analysis, Error = ME>,
  O: Render<ImageFrame, Analysis, Error = RE>,
  W: Write,
{
  summary.processed += 1;

  let frame = match frame {
    Ok(frame) => frame,
    Err(e) => {
      error!("图像加载失败: {}", e);
      summary.failed += 1;
      return Ok(());
    }
  };
  info!(
    "图像已加载: {} ({}x{})",
    frame.source().display(),
    frame.width(),
    frame.height()
  );

  let now = std::time::Instant::now();
  let analysis = match model.infer(&frame) {
    Ok(analysis) => analysis,
    Err(e) => {
      error!("检测失败 {}: {}", frame.source().display(), e);
      summary.failed += 1;
      return Ok(());
    }
  };
  info!("检测完成，耗时: {:.2?}", now.elapsed());

  if analysis.detection.is_some() {
    summary.detected += 1;
  } else {
    warn!("未检测到红色轮廓: {}", frame.source().display());
  }

  writeln!(
    report,
    "{}",
    report::render(format, &frame, analysis.detection.as_ref())?
  )?;

  output.render_result(&frame, &analysis)?;
  Ok(())
}

/// 只处理第一张图像
#[derive(Debug, Default)]
pub struct OneShotTask {
  format: ReportFormat,
}

impl OneShotTask {
  pub fn with_format(mut self, format: ReportFormat) -> Self {
    self.format = format;
    self
  }
}

impl<IE, ME, RE, I, M, O> Task<I, M, O> for OneShotTask
where
  IE: std::error::Error + Sync + Send + 'static,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = Result<ImageFrame, IE>>,
  M: Model<Input = ImageFrame, Output = Analysis, Error = ME>,
  O: Render<ImageFrame, Analysis, Error = RE>,
{
  type Output = TaskSummary;
  type Error = anyhow::Error;

  fn run_task(self, mut input: I, model: M, output: O) -> Result<Self::Output, Self::Error> {
    info!("开始任务...");
    let frame = input.next().ok_or_else(|| anyhow::anyhow!("没有输入图像"))?;

    let mut summary = TaskSummary::default();
    let mut stdout = std::io::stdout().lock();
    process_frame(frame, &model, &output, self.format, &mut stdout, &mut summary)?;

    info!("任务完成");
    Ok(summary)
  }
}

/// 依次处理全部图像，单张失败不中断任务
#[derive(Debug, Default)]
pub struct BatchTask {
  format: ReportFormat,
}

impl BatchTask {
  pub fn with_format(mut self, format: ReportFormat) -> Self {
    self.format = format;
    self
  }
}

impl<IE, ME, RE, I, M, O> Task<I, M, O> for BatchTask
where
  IE: std::error::Error + Sync + Send + 'static,
  ME: std::error::Error + Sync + Send + 'static,
  RE: std::error::Error + Sync + Send + 'static,
  I: Iterator<Item = Result<ImageFrame, IE>>,
  M: Model<Input = ImageFrame, Output = Analysis, Error = ME>,
  O: Render<ImageFrame, Analysis, Error = RE>,
{
  type Output = TaskSummary;
  type Error = anyhow::Error;

  fn run_task(self, input: I, model: M, output: O) -> Result<Self::Output, Self::Error> {
    info!("开始批量任务...");
    let mut summary = TaskSummary::default();
    let mut stdout = std::io::stdout().lock();

    for frame in input {
      process_frame(frame, &model, &output, self.format, &mut stdout, &mut summary)?;
    }

    info!(
      "任务完成: 处理 {} 张, 检测到 {} 张, 失败 {} 张",
      summary.processed, summary.detected, summary.failed
    );
    Ok(summary)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::RipenessDetectorBuilder;
  use image::{Rgb, RgbImage};
  use std::cell::Cell;

  struct CountingOutput {
    rendered: Cell<usize>,
  }

  impl Render<ImageFrame, Analysis> for &CountingOutput {
    type Error = std::io::Error;

    fn render_result(&self, _: &ImageFrame, _: &Analysis) -> Result<(), Self::Error> {
      self.rendered.set(self.rendered.get() + 1);
      Ok(())
    }
  }

  fn berry_frame() -> ImageFrame {
    let mut image = RgbImage::from_pixel(60, 60, Rgb([0, 160, 0]));
    for y in 20..40 {
      for x in 15..45 {
        image.put_pixel(x, y, Rgb([255, 0, 0]));
      }
    }
    ImageFrame::new(image, "berry.png")
  }

  fn green_frame() -> ImageFrame {
    ImageFrame::new(RgbImage::from_pixel(60, 60, Rgb([0, 160, 0])), "leaf.png")
  }

  #[test]
  fn batch_counts_failures_and_misses() {
    let detector = RipenessDetectorBuilder::new().build().unwrap();
    let output = CountingOutput {
      rendered: Cell::new(0),
    };
    let input: Vec<Result<ImageFrame, std::io::Error>> = vec![
      Ok(berry_frame()),
      Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing")),
      Ok(green_frame()),
    ];

    let summary = BatchTask::default()
      .run_task(input.into_iter(), detector, &output)
      .unwrap();

    assert_eq!(
      summary,
      TaskSummary {
        processed: 3,
        detected: 1,
        failed: 1,
      }
    );
    assert!(!summary.all_detected());
    // 未检测到目标的图像同样交给输出，由输出决定如何展示
    assert_eq!(output.rendered.get(), 2);
  }

  #[test]
  fn json_report_is_one_parsable_line_per_image() {
    let detector = RipenessDetectorBuilder::new().build().unwrap();
    let frames: Vec<Result<ImageFrame, std::io::Error>> = vec![
      Ok(berry_frame()),
      Ok(green_frame()),
      Err(std::io::Error::new(std::io::ErrorKind::NotFound, "missing")),
    ];

    let mut report = Vec::new();
    let mut summary = TaskSummary::default();
    for frame in frames {
      process_frame(
        frame,
        &detector,
        &None::<&CountingOutput>,
        ReportFormat::Json,
        &mut report,
        &mut summary,
      )
      .unwrap();
    }

    let report = String::from_utf8(report).unwrap();
    let lines: Vec<serde_json::Value> = report
      .lines()
      .map(|line| serde_json::from_str(line).unwrap())
      .collect();
    // 加载失败的图像不产生报告行
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["source"], "berry.png");
    assert_eq!(lines[0]["detection"]["is_ripe"], true);
    assert_eq!(lines[1]["source"], "leaf.png");
    assert!(lines[1]["detection"].is_null());
    assert_eq!(summary.failed, 1);
  }

  #[test]
  fn one_shot_needs_an_input() {
    let detector = RipenessDetectorBuilder::new().build().unwrap();
    let input: Vec<Result<ImageFrame, std::io::Error>> = Vec::new();
    let result = OneShotTask::default().run_task(input.into_iter(), detector, None::<&CountingOutput>);
    assert!(result.is_err());
  }

  #[test]
  fn one_shot_processes_first_frame_only() {
    let detector = RipenessDetectorBuilder::new().build().unwrap();
    let input: Vec<Result<ImageFrame, std::io::Error>> = vec![Ok(green_frame()), Ok(berry_frame())];
    let summary = OneShotTask::default()
      .with_format(ReportFormat::Json)
      .run_task(input.into_iter(), detector, None::<&CountingOutput>)
      .unwrap();
    assert_eq!(summary.processed, 1);
    assert_eq!(summary.detected, 0);
  }
}
