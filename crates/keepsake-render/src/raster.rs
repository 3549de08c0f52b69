use std::io::Cursor;

use image::{ImageFormat, Rgb, RgbImage};

use crate::RenderError;
use crate::font::FontSet;
use crate::primitive::{HAlign, Point, Primitive, Rgba, Scene};

/// Execute every primitive of `scene`, in order, on a fresh RGB canvas.
pub fn rasterize(scene: &Scene, fonts: &FontSet) -> Result<RgbImage, RenderError> {
    if scene.width == 0 || scene.height == 0 {
        return Err(RenderError::InvalidCanvas {
            width: scene.width,
            height: scene.height,
        });
    }

    let mut canvas = RgbImage::new(scene.width, scene.height);
    for primitive in &scene.primitives {
        match primitive {
            Primitive::VerticalGradient { top, bottom } => fill_gradient(&mut canvas, *top, *bottom),
            Primitive::RectOutline { x0, y0, x1, y1, width, color } => {
                stroke_rect(&mut canvas, [*x0, *y0, *x1, *y1], *width, *color)
            }
            Primitive::Ellipse { x0, y0, x1, y1, color } => {
                fill_ellipse(&mut canvas, [*x0, *y0, *x1, *y1], *color)
            }
            Primitive::Polygon { points, color } => fill_polygon(&mut canvas, points, *color),
            Primitive::Text { text, x, y, align, role, size, color } => {
                let face = fonts.get(*role);
                let left = match align {
                    HAlign::Left => *x,
                    HAlign::Center => *x - face.measure(text, *size) / 2.0,
                    HAlign::Right => *x - face.measure(text, *size),
                };
                face.draw(text, *size, left, *y, |px, py, coverage| {
                    blend(&mut canvas, px, py, *color, coverage)
                });
            }
        }
    }
    Ok(canvas)
}

pub fn encode_png(canvas: &RgbImage) -> Result<Vec<u8>, RenderError> {
    let mut bytes = Vec::new();
    canvas.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

/// Alpha-composite `color` over one pixel. Out-of-canvas writes are dropped.
fn blend(canvas: &mut RgbImage, x: i64, y: i64, color: Rgba, coverage: f32) {
    if x < 0 || y < 0 || x >= canvas.width() as i64 || y >= canvas.height() as i64 {
        return;
    }
    let alpha = (color.a as f32 / 255.0) * coverage.clamp(0.0, 1.0);
    if alpha <= 0.0 {
        return;
    }

    let pixel = canvas.get_pixel_mut(x as u32, y as u32);
    if alpha >= 1.0 {
        *pixel = Rgb([color.r, color.g, color.b]);
        return;
    }
    let mix = |dst: u8, src: u8| (dst as f32 * (1.0 - alpha) + src as f32 * alpha).round() as u8;
    let Rgb([r, g, b]) = *pixel;
    *pixel = Rgb([mix(r, color.r), mix(g, color.g), mix(b, color.b)]);
}

fn fill_gradient(canvas: &mut RgbImage, top: Rgba, bottom: Rgba) {
    let height = canvas.height() as f32;
    let lerp = |a: u8, b: u8, t: f32| (a as f32 * (1.0 - t) + b as f32 * t) as u8;

    for y in 0..canvas.height() {
        let t = y as f32 / height;
        let row = Rgb([lerp(top.r, bottom.r, t), lerp(top.g, bottom.g, t), lerp(top.b, bottom.b, t)]);
        for x in 0..canvas.width() {
            canvas.put_pixel(x, y, row);
        }
    }
}

fn hspan(canvas: &mut RgbImage, y: i64, from: i64, to: i64, color: Rgba) {
    for x in from..=to {
        blend(canvas, x, y, color, 1.0);
    }
}

/// Stroke grows inward from the inclusive box edges, like a picture frame.
fn stroke_rect(canvas: &mut RgbImage, [x0, y0, x1, y1]: [f32; 4], width: u32, color: Rgba) {
    let (x0, y0, x1, y1) = (x0.round() as i64, y0.round() as i64, x1.round() as i64, y1.round() as i64);
    let w = width as i64;
    if w == 0 || x1 < x0 || y1 < y0 {
        return;
    }

    for y in y0..=y1 {
        if y - y0 < w || y1 - y < w {
            hspan(canvas, y, x0, x1, color);
        } else {
            hspan(canvas, y, x0, (x0 + w - 1).min(x1), color);
            hspan(canvas, y, (x1 - w + 1).max(x0 + w), x1, color);
        }
    }
}

/// Fills pixels whose centers fall inside the ellipse inscribed in the box.
fn fill_ellipse(canvas: &mut RgbImage, [x0, y0, x1, y1]: [f32; 4], color: Rgba) {
    let (rx, ry) = ((x1 - x0) / 2.0, (y1 - y0) / 2.0);
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let (cx, cy) = (x0 + rx, y0 + ry);

    for py in y0.floor() as i64..=y1.ceil() as i64 {
        let dy = (py as f32 + 0.5 - cy) / ry;
        for px in x0.floor() as i64..=x1.ceil() as i64 {
            let dx = (px as f32 + 0.5 - cx) / rx;
            if dx * dx + dy * dy <= 1.0 {
                blend(canvas, px, py, color, 1.0);
            }
        }
    }
}

/// Even-odd scanline fill sampled at pixel centers.
fn fill_polygon(canvas: &mut RgbImage, points: &[Point], color: Rgba) {
    if points.len() < 3 {
        return;
    }
    let min_y = points.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
    let max_y = points.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);

    let mut crossings: Vec<f32> = Vec::with_capacity(points.len());
    for py in min_y.floor() as i64..=max_y.ceil() as i64 {
        let sample = py as f32 + 0.5;
        crossings.clear();

        for (i, a) in points.iter().enumerate() {
            let b = points[(i + 1) % points.len()];
            if (a.y <= sample && sample < b.y) || (b.y <= sample && sample < a.y) {
                crossings.push(a.x + (sample - a.y) * (b.x - a.x) / (b.y - a.y));
            }
        }
        crossings.sort_by(f32::total_cmp);

        for pair in crossings.chunks_exact(2) {
            let from = (pair[0] - 0.5).ceil() as i64;
            let to = (pair[1] - 0.5).ceil() as i64 - 1;
            if from <= to {
                hspan(canvas, py, from, to, color);
            }
        }
    }
}
