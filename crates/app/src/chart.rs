use plotters::{
    chart::ChartBuilder,
    prelude::{Circle, IntoDrawingArea, SVGBackend},
    series::LineSeries,
    style::{Color, IntoFont, RGBColor, TextStyle, WHITE},
};
use replog_domain::{Name, Reps};

use crate::{Theme, color::SeriesColors};

pub const OPACITY_LINE: f64 = 0.9;
pub const WIDTH_LINE: u32 = 2;
pub const DOT_RADIUS: u32 = 4;

pub const FONT: (&str, u32) = ("Roboto", 11);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// Pixel geometry of the plotted chart rectangle.
///
/// The plotted area is bounded by `left_inset` (Y-axis labels) on the left
/// and by `top_margin`/`bottom_margin` (chart chrome) vertically. All
/// hit-testing and the tooltip anchor are derived from this geometry so
/// that rendering and input handling agree on pixel positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub width: f64,
    pub height: f64,
    pub left_inset: f64,
    pub top_margin: f64,
    pub bottom_margin: f64,
}

impl Geometry {
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left_inset
            && point.x <= self.width
            && point.y >= self.top_margin
            && point.y <= self.height - self.bottom_margin
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn point_spacing(&self, len: usize) -> f64 {
        assert!(len > 0);
        (self.width - self.left_inset) / len as f64
    }

    /// The data index nearest to the horizontal pixel position `x`.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    pub fn nearest_index(&self, x: f64, len: usize) -> usize {
        assert!(len > 0);
        let raw = ((x - self.left_inset) / self.point_spacing(len)).round();
        raw.clamp(0.0, (len - 1) as f64) as usize
    }

    /// Fixed pixel anchor for the tooltip at `index`.
    ///
    /// Derived from the index, not from the raw pointer position, so the
    /// tooltip does not jitter while the pointer moves within one column.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn anchor(&self, index: usize, len: usize) -> Point {
        Point {
            x: self.left_inset + index as f64 * self.point_spacing(len),
            y: self.top_margin,
        }
    }
}

/// Radius of the hit-target dot at `index`.
///
/// Exactly one column of dots is visible at a time; all other dots have
/// zero radius but still occupy layout space.
#[must_use]
pub fn dot_radius(index: usize, hovered: Option<usize>) -> u32 {
    if hovered == Some(index) { DOT_RADIUS } else { 0 }
}

/// Plot one line per exercise onto an SVG chart.
///
/// The x axis is the index within each series and carries no labels, the
/// y axis starts at zero. Returns `None` if there is nothing to plot.
#[allow(clippy::missing_errors_doc)]
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn plot(
    series: &[(Name, Vec<Reps>)],
    colors: &SeriesColors,
    hovered: Option<usize>,
    geometry: &Geometry,
    theme: &Theme,
) -> Result<Option<String>, Box<dyn std::error::Error>> {
    if all_zeros(series) {
        return Ok(None);
    }

    let len = series
        .iter()
        .map(|(_, values)| values.len())
        .max()
        .unwrap_or(0);
    let y_max = series
        .iter()
        .flat_map(|(_, values)| values.iter())
        .map(|reps| u32::from(*reps))
        .max()
        .unwrap_or(0);

    let mut result = String::new();

    {
        let root = SVGBackend::with_string(
            &mut result,
            (geometry.width as u32, geometry.height as u32),
        )
        .into_drawing_area();
        let (color, background_color) = colors_for(theme);

        root.fill(&background_color)?;

        let mut chart = ChartBuilder::on(&root)
            .margin_top(geometry.top_margin as f32)
            .x_label_area_size(geometry.bottom_margin as f32)
            .y_label_area_size(geometry.left_inset as f32)
            .build_cartesian_2d(0f64..len as f64, 0f32..max_with_margin(y_max as f32))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .set_all_tick_mark_size(3u32)
            .axis_style(color.mix(0.3))
            .bold_line_style(color.mix(0.05))
            .light_line_style(color.mix(0.0))
            .label_style(TextStyle::from(FONT.into_font()).color(&color))
            .x_labels(0)
            .y_labels(6)
            .draw()?;

        for (name, values) in series {
            let series_color = colors.get(name).unwrap_or(color);
            chart.draw_series(LineSeries::new(
                values
                    .iter()
                    .enumerate()
                    .map(|(i, reps)| (i as f64, u32::from(*reps) as f32)),
                series_color.mix(OPACITY_LINE).stroke_width(WIDTH_LINE),
            ))?;
            chart.draw_series(values.iter().enumerate().map(|(i, reps)| {
                Circle::new(
                    (i as f64, u32::from(*reps) as f32),
                    dot_radius(i, hovered),
                    series_color.filled(),
                )
            }))?;
        }

        root.present()?;
    }

    Ok(Some(result))
}

fn all_zeros(series: &[(Name, Vec<Reps>)]) -> bool {
    series
        .iter()
        .map(|(_, values)| values.iter().all(|reps| u32::from(*reps) == 0))
        .reduce(|l, r| l && r)
        .unwrap_or(true)
}

fn max_with_margin(max: f32) -> f32 {
    if max <= f32::EPSILON {
        return 1.0;
    }
    max * 1.1
}

fn colors_for(theme: &Theme) -> (RGBColor, RGBColor) {
    let dark = RGBColor(20, 22, 26);
    match theme {
        Theme::System | Theme::Light => (dark, WHITE),
        Theme::Dark => (WHITE, dark),
    }
}
