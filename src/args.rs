// 该文件是 Rubus （覆盆子） 项目的一部分。
// src/args.rs - 项目参数配置
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

use std::path::PathBuf;

use clap::Parser;
use url::Url;

/// 覆盆子成熟度与尺寸检测
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
  /// 待检测的图片文件（JPEG、PNG、BMP 等）
  #[arg(required = true, value_name = "IMAGE")]
  pub images: Vec<PathBuf>,

  /// 比例尺，毫米/像素（默认取配置值 0.5）
  #[arg(long, value_name = "MM_PER_PX")]
  pub scale: Option<f64>,

  /// 不输出可视化图像（批处理模式）
  #[arg(long)]
  pub no_display: bool,

  /// 可视化输出位置
  /// 支持格式:
  /// - 单个文件: image:///path/to/result.png
  /// - 单个文件只接受一张输入图片
  /// - 按日期分目录: folder:///path/to/dir 或 folder:dir，加 ?always 同时记录未检测到的图像
  #[arg(long, default_value = "folder:rubus-output?always", value_name = "OUTPUT")]
  pub output: Url,

  /// JSON 格式的检测参数配置文件
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// 用于绘制标签的 TTF/OTF 字体
  #[arg(long, value_name = "FILE")]
  pub font: Option<PathBuf>,

  /// 以 JSON 行输出检测结果
  #[arg(long)]
  pub json: bool,
}
