use std::f32::consts::PI;

use crate::font::FontRole;
use crate::primitive::{HAlign, Point, Primitive, Rgba, Scene};
use crate::style::Style;
use crate::wrap::wrap;

const PETALS: usize = 6;
const FLOURISH_SHAPES: usize = 12;

/// Lay out a keepsake for `message`. Pure: no fonts, no randomness.
pub fn compose(style: &Style, message: &str, title: Option<&str>) -> Scene {
    let (w, h) = (style.width as f32, style.height as f32);
    let mut scene = Scene::new(style.width, style.height);

    scene.push(Primitive::VerticalGradient {
        top: style.background_top,
        bottom: style.background_bottom,
    });

    // Frame
    for (inset, width) in [style.outer_frame, style.inner_frame] {
        scene.push(Primitive::RectOutline {
            x0: inset,
            y0: inset,
            x1: w - inset,
            y1: h - inset,
            width,
            color: style.frame_color,
        });
    }

    let size = style.corner_size;
    let near = style.corner_inset;
    let far_x = w - style.corner_inset - size;
    let far_y = h - style.corner_inset - size;
    for (x, y) in [(near, near), (far_x, near), (near, far_y), (far_x, far_y)] {
        scene.extend(floral_corner(x, y, size, style.frame_color, style.petal_alpha));
    }

    // Title
    let title = title
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(style.default_title.as_str());
    scene.push(Primitive::Text {
        text: ellipsize(title, style.title_max_chars),
        x: w / 2.0,
        y: style.title_y,
        align: HAlign::Center,
        role: FontRole::Title,
        size: style.title_size,
        color: style.title_color,
    });

    let flourish_width = w - 2.0 * style.flourish_margin;
    scene.extend(flourish(
        style.flourish_margin,
        style.title_flourish_y,
        flourish_width,
        style.frame_color,
    ));

    // Message
    let lower_flourish_y = h - style.footer_flourish_offset;
    for (i, line) in message_lines(style, message, lower_flourish_y).into_iter().enumerate() {
        scene.push(Primitive::Text {
            text: line,
            x: w / 2.0,
            y: style.message_y + i as f32 * style.line_pitch,
            align: HAlign::Center,
            role: FontRole::Message,
            size: style.message_size,
            color: style.message_color,
        });
    }

    scene.extend(flourish(
        style.flourish_margin,
        lower_flourish_y,
        flourish_width,
        style.frame_color,
    ));

    // Footer: "<left> ♥ <right>" with the heart on the vertical center line
    let footer_y = h - style.footer_offset;
    let heart = style.heart_size;
    scene.push(Primitive::Text {
        text: style.footer_left.clone(),
        x: w / 2.0 - heart - style.footer_gap,
        y: footer_y,
        align: HAlign::Right,
        role: FontRole::Footer,
        size: style.footer_size,
        color: style.title_color,
    });
    scene.extend(heart_glyph(w / 2.0 - heart, footer_y - heart / 2.0, heart, style.title_color));
    scene.push(Primitive::Text {
        text: style.footer_right.clone(),
        x: w / 2.0 + heart + style.footer_gap,
        y: footer_y,
        align: HAlign::Left,
        role: FontRole::Footer,
        size: style.footer_size,
        color: style.title_color,
    });

    scene
}

/// Wrapped message lines that fit above the lower flourish. When the text
/// runs long, the last visible line ends with "...".
fn message_lines(style: &Style, message: &str, limit_y: f32) -> Vec<String> {
    let mut lines = wrap(message, style.wrap_width);
    let room = ((limit_y - style.message_y) / style.line_pitch).floor().max(0.0) as usize;

    if lines.len() > room {
        lines.truncate(room);
        if let Some(last) = lines.last_mut() {
            let keep = style.wrap_width.saturating_sub(3);
            *last = format!("{}...", last.chars().take(keep).collect::<String>());
        }
    }
    lines
}

/// `text` unchanged when it fits in `max` characters, otherwise cut so that
/// the result including "..." is `max` characters long.
fn ellipsize(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}

/// Six translucent petals in a ring around an opaque center disk, all inside
/// the `size` square at (`x`, `y`).
pub fn floral_corner(x: f32, y: f32, size: f32, color: Rgba, petal_alpha: u8) -> Vec<Primitive> {
    let petal = color.with_alpha(petal_alpha);
    let (cx, cy) = (x + size / 2.0, y + size / 2.0);
    let mut shapes = Vec::with_capacity(PETALS + 1);

    for i in 0..PETALS {
        let angle = (i as f32 * 60.0).to_radians();
        let px = cx + angle.cos() * size / 2.0 - size / 4.0;
        let py = cy + angle.sin() * size / 2.0 - size / 4.0;
        shapes.push(Primitive::Ellipse {
            x0: px,
            y0: py,
            x1: px + size / 2.0,
            y1: py + size / 2.0,
            color: petal,
        });
    }

    let r = size * 0.3 / 2.0;
    shapes.push(Primitive::Ellipse {
        x0: cx - r,
        y0: cy - r,
        x1: cx + r,
        y1: cy + r,
        color,
    });
    shapes
}

/// Alternating circles and diamonds along a wavy line of `width` starting
/// at (`x`, `y`).
pub fn flourish(x: f32, y: f32, width: f32, color: Rgba) -> Vec<Primitive> {
    (0..FLOURISH_SHAPES)
        .map(|i| {
            let progress = i as f32 / (FLOURISH_SHAPES - 1) as f32;
            let bx = x + progress * width + (progress * PI * 4.0).cos() * 5.0;
            let by = y + (progress * PI * 2.0).sin() * 8.0;
            let size = 3.0 + (progress * PI * 3.0).sin().abs() * 5.0;

            if i % 2 == 0 {
                Primitive::Ellipse {
                    x0: bx,
                    y0: by - size / 2.0,
                    x1: bx + size,
                    y1: by + size / 2.0,
                    color,
                }
            } else {
                let half = size / 2.0;
                Primitive::Polygon {
                    points: vec![
                        Point::new(bx, by - half),
                        Point::new(bx + half, by),
                        Point::new(bx, by + half),
                        Point::new(bx - half, by),
                    ],
                    color,
                }
            }
        })
        .collect()
}

/// Two circles side by side over a point-down kite. The glyph spans
/// `2 * size` horizontally from `x`.
pub fn heart_glyph(x: f32, y: f32, size: f32, color: Rgba) -> Vec<Primitive> {
    vec![
        Primitive::Ellipse {
            x0: x,
            y0: y,
            x1: x + size,
            y1: y + size,
            color,
        },
        Primitive::Ellipse {
            x0: x + size,
            y0: y,
            x1: x + 2.0 * size,
            y1: y + size,
            color,
        },
        Primitive::Polygon {
            points: vec![
                Point::new(x, y + size / 2.0),
                Point::new(x + size, y + size),
                Point::new(x + 2.0 * size, y + size / 2.0),
                Point::new(x + size, y + size * 1.75),
            ],
            color,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count<F: Fn(&Primitive) -> bool>(scene: &Scene, f: F) -> usize {
        scene.primitives.iter().filter(|p| f(p)).count()
    }

    #[test]
    fn composition_is_deterministic() {
        let style = Style::default();
        assert_eq!(compose(&style, "Hello", None), compose(&style, "Hello", None));
    }

    #[test]
    fn background_is_drawn_first() {
        let scene = compose(&Style::default(), "Hello", None);
        assert!(matches!(scene.primitives[0], Primitive::VerticalGradient { .. }));
        assert_eq!((scene.width, scene.height), (900, 1200));
    }

    #[test]
    fn frame_has_two_rectangles_and_four_corners() {
        let style = Style::default();
        let scene = compose(&style, "", None);

        assert_eq!(count(&scene, |p| matches!(p, Primitive::RectOutline { .. })), 2);

        let translucent = count(&scene, |p| {
            matches!(p, Primitive::Ellipse { color, .. } if color.a == style.petal_alpha)
        });
        assert_eq!(translucent, 4 * PETALS);
    }

    #[test]
    fn title_defaults_and_can_be_overridden() {
        let style = Style::default();
        assert_eq!(compose(&style, "x", None).texts(FontRole::Title), vec!["For You, Always"]);
        assert_eq!(compose(&style, "x", Some("   ")).texts(FontRole::Title), vec!["For You, Always"]);
        assert_eq!(compose(&style, "x", Some("To Robin")).texts(FontRole::Title), vec!["To Robin"]);
    }

    #[test]
    fn long_title_is_cut_with_ellipsis() {
        let style = Style::default();
        let title = "Happy Anniversary To The Love Of My Whole Life";
        let composed = compose(&style, "x", Some(title));
        let texts = composed.texts(FontRole::Title);

        assert_eq!(texts, vec!["Happy Anniversary To..."]);
        assert!(texts[0].chars().count() <= style.title_max_chars);

        let fits = "Happy Anniversary, Robin";
        assert_eq!(fits.chars().count(), 24);
        assert_eq!(compose(&style, "x", Some(fits)).texts(FontRole::Title), vec![fits]);
    }

    #[test]
    fn message_lines_are_wrapped_and_spaced() {
        let style = Style::default();
        let message = "You are the reason I look forward to every single morning of the year";
        let scene = compose(&style, message, None);

        let lines = scene.texts(FontRole::Message);
        assert_eq!(lines, wrap(message, 35));
        assert!(lines.len() > 1);

        let ys: Vec<f32> = scene
            .primitives
            .iter()
            .filter_map(|p| match p {
                Primitive::Text { role: FontRole::Message, y, .. } => Some(*y),
                _ => None,
            })
            .collect();
        assert_eq!(ys[0], 280.0);
        assert_eq!(ys[1] - ys[0], 55.0);
    }

    #[test]
    fn empty_message_has_no_message_lines() {
        let scene = compose(&Style::default(), "", None);
        assert!(scene.texts(FontRole::Message).is_empty());
        assert_eq!(scene.texts(FontRole::Footer), vec!["made with", "Valentine Capsule"]);
    }

    #[test]
    fn overlong_message_stops_above_lower_flourish() {
        let style = Style::default();
        let message = "love ".repeat(400);
        let scene = compose(&style, &message, None);

        let lines = scene.texts(FontRole::Message);
        let last_top = style.message_y + (lines.len() - 1) as f32 * style.line_pitch;
        assert!(last_top + style.line_pitch <= style.height as f32 - style.footer_flourish_offset);
        assert!(lines.last().unwrap().ends_with("..."));
        assert!(lines.iter().all(|l| l.chars().count() <= style.wrap_width));
    }

    #[test]
    fn flourish_alternates_circles_and_diamonds() {
        let shapes = flourish(150.0, 190.0, 600.0, Rgba::rgb(1, 2, 3));
        assert_eq!(shapes.len(), FLOURISH_SHAPES);
        for (i, shape) in shapes.iter().enumerate() {
            if i % 2 == 0 {
                assert!(matches!(shape, Primitive::Ellipse { .. }));
            } else {
                assert!(matches!(shape, Primitive::Polygon { points, .. } if points.len() == 4));
            }
        }

        // first shape sits at the start of the path, last near its end
        let Primitive::Ellipse { x0, .. } = shapes[0] else { unreachable!() };
        assert!((x0 - 155.0).abs() < 1e-3);
    }

    #[test]
    fn heart_is_centered_in_footer() {
        let style = Style::default();
        let scene = compose(&style, "", None);
        let center = style.width as f32 / 2.0;

        let polygon = scene
            .primitives
            .iter()
            .rev()
            .find_map(|p| match p {
                Primitive::Polygon { points, color } if *color == style.title_color => Some(points.clone()),
                _ => None,
            })
            .unwrap();
        // the kite's tip and top point share the center line
        assert_eq!(polygon[1].x, center);
        assert_eq!(polygon[3].x, center);
    }

    #[test]
    fn corner_petals_stay_near_their_square() {
        let size = 35.0;
        for shape in floral_corner(40.0, 40.0, size, Rgba::rgb(230, 176, 170), 180) {
            let Primitive::Ellipse { x0, y0, x1, y1, .. } = shape else { panic!("not an ellipse") };
            assert!(x0 >= 40.0 - size / 4.0 - 1e-3 && x1 <= 40.0 + size * 1.25 + 1e-3);
            assert!(y0 >= 40.0 - size / 4.0 - 1e-3 && y1 <= 40.0 + size * 1.25 + 1e-3);
        }
    }
}
