// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/output/draw.rs - 检测结果可视化
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

use ab_glyph::{FontVec, PxScale};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut, draw_text_mut};
use imageproc::rect::Rect;
use thiserror::Error;
use tracing::debug;

mod glyph;

use crate::{
  contour::RedContour,
  frame::ImageFrame,
  model::{Analysis, BoundingBox, Detection},
};

// 绘制常量
const CONTOUR_COLOR: [u8; 3] = [255, 255, 0]; // 黄色
const CONTOUR_THICKNESS: i32 = 2;
const BOX_COLOR: [u8; 3] = [255, 0, 0]; // 红色
const BOX_THICKNESS: i32 = 3;
const LABEL_FONT_SIZE: f32 = 20.0;
const LABEL_GLYPH_SCALE: u32 = 2; // 内置字形放大倍数
const LABEL_OFFSET: i32 = 10; // 标签底边距离包围框上沿

#[derive(Error, Debug)]
pub enum DrawError {
  #[error("无法读取字体文件: {0}")]
  IoError(#[from] std::io::Error),
  #[error("字体无效: {0}")]
  InvalidFont(#[from] ab_glyph::InvalidFont),
}

pub struct Draw {
  font: Option<FontVec>,
  font_size: f32,
  contour_color: [u8; 3],
  box_color: [u8; 3],
}

impl Default for Draw {
  fn default() -> Self {
    Self {
      font: None,
      font_size: LABEL_FONT_SIZE,
      contour_color: CONTOUR_COLOR,
      box_color: BOX_COLOR,
    }
  }
}

impl Draw {
  /// 加载 TTF/OTF 字体用于绘制标签
  pub fn with_font_file<P: AsRef<Path>>(path: P) -> Result<Self, DrawError> {
    let data = std::fs::read(path)?;
    let font = FontVec::try_from_vec(data)?;
    Ok(Self {
      font: Some(font),
      ..Self::default()
    })
  }

  pub fn has_font(&self) -> bool {
    self.font.is_some()
  }

  /// 在源图像副本上绘制所有轮廓、选中的包围框和标签
  pub fn draw_analysis(&self, frame: &ImageFrame, analysis: &Analysis) -> RgbImage {
    let mut image = frame.image.clone();

    for contour in &analysis.contours {
      self.draw_contour(&mut image, contour);
    }

    if let Some(detection) = &analysis.detection {
      self.draw_bbox(&mut image, &detection.bounding_box);
      self.draw_label(&mut image, detection);
    }

    image
  }

  fn draw_contour(&self, image: &mut RgbImage, contour: &RedContour) {
    let color = Rgb(self.contour_color);
    let points = &contour.points;

    if let [point] = points.as_slice() {
      if point.x >= 0
        && point.y >= 0
        && (point.x as u32) < image.width()
        && (point.y as u32) < image.height()
      {
        image.put_pixel(point.x as u32, point.y as u32, color);
      }
      return;
    }

    // 闭合折线，按偏移重复绘制以加粗，偏移落在边界两侧
    let low = -(CONTOUR_THICKNESS / 2);
    let high = low + CONTOUR_THICKNESS - 1;
    for (i, start) in points.iter().enumerate() {
      let end = points[(i + 1) % points.len()];
      for dy in low..=high {
        for dx in low..=high {
          draw_line_segment_mut(
            image,
            ((start.x + dx) as f32, (start.y + dy) as f32),
            ((end.x + dx) as f32, (end.y + dy) as f32),
            color,
          );
        }
      }
    }
  }

  // 边框从 (x, y) 画到 (x + w, y + h)，向内外各加粗一像素
  fn draw_bbox(&self, image: &mut RgbImage, bbox: &BoundingBox) {
    let color = Rgb(self.box_color);
    let half = BOX_THICKNESS / 2;

    for t in -half..=half {
      let width = bbox.w as i32 + 1 + 2 * t;
      let height = bbox.h as i32 + 1 + 2 * t;
      if width <= 0 || height <= 0 {
        continue;
      }
      let rect =
        Rect::at(bbox.x as i32 - t, bbox.y as i32 - t).of_size(width as u32, height as u32);
      draw_hollow_rect_mut(image, rect, color);
    }
  }

  // 标签底边位于包围框上方 LABEL_OFFSET 像素，超出图像的部分被裁掉
  fn draw_label(&self, image: &mut RgbImage, detection: &Detection) {
    let label = label_text(detection);
    let color = Rgb(self.box_color);
    let x = detection.bounding_box.x as i32;
    let bottom = detection.bounding_box.y as i32 - LABEL_OFFSET;

    match &self.font {
      Some(font) => {
        let y = bottom - self.font_size as i32;
        draw_text_mut(image, color, x, y, PxScale::from(self.font_size), font, &label);
      }
      None => {
        debug!("未加载字体，使用内置字形绘制标签");
        let y = bottom - glyph::text_height(LABEL_GLYPH_SCALE) as i32;
        glyph::draw_text(image, color, x, y, LABEL_GLYPH_SCALE, &label);
      }
    }
  }
}

/// 标签文本，例如 `RIPE (20.5mm)`
pub fn label_text(detection: &Detection) -> String {
  format!(
    "{} ({:.1}mm)",
    detection.ripeness_label(),
    detection.width_mm
  )
}
