// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/contour.rs - 外轮廓提取
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

use image::GrayImage;
use imageproc::contours::{BorderType, find_contours};
use imageproc::point::Point;

use crate::model::BoundingBox;

/// 红色掩码中一个连通区域的外边界
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedContour {
  /// 压缩后的边界点，只保留方向变化处
  pub points: Vec<Point<i32>>,
  pub bounding_box: BoundingBox,
}

/// 提取所有最外层轮廓
///
/// 孔洞边界与嵌套在孔洞内的区域都被忽略。结果按每条边界首个像素的
/// 行优先扫描顺序排列。
pub fn external_contours(mask: &GrayImage) -> Vec<RedContour> {
  find_contours::<i32>(mask)
    .into_iter()
    .filter(|contour| matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none())
    .filter_map(|contour| {
      let bounding_box = bounding_box(&contour.points)?;
      Some(RedContour {
        points: compress_chain(&contour.points),
        bounding_box,
      })
    })
    .collect()
}

/// 闭合链压缩：去掉前后步进方向相同的中间点
pub fn compress_chain(points: &[Point<i32>]) -> Vec<Point<i32>> {
  let n = points.len();
  if n < 3 {
    return points.to_vec();
  }

  (0..n)
    .filter(|&i| {
      let prev = points[(i + n - 1) % n];
      let cur = points[i];
      let next = points[(i + 1) % n];
      (cur.x - prev.x, cur.y - prev.y) != (next.x - cur.x, next.y - cur.y)
    })
    .map(|i| points[i])
    .collect()
}

/// 点集的轴对齐包围框，宽高包含两端像素
pub fn bounding_box(points: &[Point<i32>]) -> Option<BoundingBox> {
  let first = points.first()?;
  let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
  for p in points.iter().skip(1) {
    min_x = min_x.min(p.x);
    min_y = min_y.min(p.y);
    max_x = max_x.max(p.x);
    max_y = max_y.max(p.y);
  }

  Some(BoundingBox {
    x: min_x.max(0) as u32,
    y: min_y.max(0) as u32,
    w: (max_x - min_x + 1) as u32,
    h: (max_y - min_y + 1) as u32,
  })
}
