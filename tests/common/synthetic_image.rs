use image::{Rgb, RgbImage};

/// 背景绿色，HSV 为 (60, 255, 160)
pub const LEAF_GREEN: Rgb<u8> = Rgb([0, 160, 0]);
/// 纯红，HSV 为 (0, 255, 255)
pub const PURE_RED: Rgb<u8> = Rgb([255, 0, 0]);
/// 偏紫的红色，色调绕回 179
pub const DEEP_RED: Rgb<u8> = Rgb([220, 20, 30]);
/// 既不是红色也不是绿色，计入果实掩码
pub const BLUE: Rgb<u8> = Rgb([30, 30, 200]);

/// 纯绿色背景
pub fn green_canvas(width: u32, height: u32) -> RgbImage {
  assert!(width > 0 && height > 0, "图像尺寸必须为正");
  RgbImage::from_pixel(width, height, LEAF_GREEN)
}

/// 填充轴对齐矩形，超出图像的部分被裁掉
pub fn fill_rect(image: &mut RgbImage, x: u32, y: u32, w: u32, h: u32, color: Rgb<u8>) {
  for yy in y..(y + h).min(image.height()) {
    for xx in x..(x + w).min(image.width()) {
      image.put_pixel(xx, yy, color);
    }
  }
}

/// 填充圆盘，光栅宽度为 `2 * radius + 1`
///
/// 判据为 `dx² + dy² <= r² + r`（半径 r + 0.5），最左最右列有若干像素高，
/// 经过 5x5 开运算后宽度不变。
pub fn fill_disk(image: &mut RgbImage, cx: i32, cy: i32, radius: i32, color: Rgb<u8>) {
  let limit = radius * radius + radius;
  for dy in -radius..=radius {
    for dx in -radius..=radius {
      if dx * dx + dy * dy > limit {
        continue;
      }
      let (x, y) = (cx + dx, cy + dy);
      if x >= 0 && y >= 0 && (x as u32) < image.width() && (y as u32) < image.height() {
        image.put_pixel(x as u32, y as u32, color);
      }
    }
  }
}
