use crate::primitive::Rgba;

/// Every constant of the keepsake layout. `Style::default()` is the
/// production look; tests shrink or tweak it.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub width: u32,
    pub height: u32,

    pub background_top: Rgba,
    pub background_bottom: Rgba,
    pub frame_color: Rgba,
    pub title_color: Rgba,
    pub message_color: Rgba,

    /// (inset from canvas edge, stroke width) of the two frame rectangles.
    pub outer_frame: (f32, u32),
    pub inner_frame: (f32, u32),

    pub corner_size: f32,
    pub corner_inset: f32,
    pub petal_alpha: u8,

    pub default_title: String,
    pub title_y: f32,
    pub title_size: f32,
    /// Longer titles are cut and end with "...".
    pub title_max_chars: usize,

    pub flourish_margin: f32,
    pub title_flourish_y: f32,
    /// Distance of the lower flourish from the bottom edge.
    pub footer_flourish_offset: f32,

    pub message_y: f32,
    pub message_size: f32,
    pub line_pitch: f32,
    pub wrap_width: usize,

    /// Distance of the footer line from the bottom edge.
    pub footer_offset: f32,
    pub footer_size: f32,
    pub heart_size: f32,
    pub footer_gap: f32,
    pub footer_left: String,
    pub footer_right: String,
}

impl Default for Style {
    fn default() -> Self {
        let frame = Rgba::rgb(230, 176, 170);
        let dark_red = Rgba::rgb(139, 0, 0);
        Self {
            width: 900,
            height: 1200,

            background_top: Rgba::rgb(255, 245, 240),
            background_bottom: Rgba::rgb(255, 230, 230),
            frame_color: frame,
            title_color: dark_red,
            message_color: Rgba::rgb(51, 0, 0),

            outer_frame: (20.0, 8),
            inner_frame: (35.0, 3),

            corner_size: 35.0,
            corner_inset: 40.0,
            petal_alpha: 180,

            default_title: "For You, Always".into(),
            title_y: 120.0,
            title_size: 60.0,
            title_max_chars: 24,

            flourish_margin: 150.0,
            title_flourish_y: 190.0,
            footer_flourish_offset: 150.0,

            message_y: 280.0,
            message_size: 40.0,
            line_pitch: 55.0,
            wrap_width: 35,

            footer_offset: 80.0,
            footer_size: 25.0,
            heart_size: 20.0,
            footer_gap: 10.0,
            footer_left: "made with".into(),
            footer_right: "Valentine Capsule".into(),
        }
    }
}
