use std::path::Path;

use anyhow::anyhow;
use geo::{BoundingRect, MultiPolygon, Point, Rect};
use plotters::{coord::Shift, prelude::*};
use tracing::info;

use crate::{
    accumulator::CommuteAccumulator,
    colormap::{ValueRange, hot_r},
    statistics::seconds_to_minutes,
};

pub const DEFAULT_SIZE: (u32, u32) = (1600, 900);

const LEGEND_WIDTH: i32 = 90;
const POINT_RADIUS: i32 = 3;
const STAR_OUTER_RADIUS: f64 = 10.0;
const STAR_INNER_RADIUS: f64 = 4.0;
const BOUNDS_PADDING: f64 = 0.005;

pub const AVERAGE_TITLE: &str = "Average Travel Time (mins)";
pub const VARIANCE_TITLE: &str = "Travel Time Variance";

/// Everything drawn on both panels.
pub struct HeatmapScene<'a> {
    pub area: &'a MultiPolygon,
    pub accumulator: &'a CommuteAccumulator,
    /// Geocoded offices, x is the longitude
    pub offices: &'a [Point],
}

impl HeatmapScene<'_> {
    /// Area bounds grown to include every office, offices may sit outside the
    /// borough.
    fn bounds(&self) -> anyhow::Result<Rect> {
        let area_bounds = self
            .area
            .bounding_rect()
            .ok_or_else(|| anyhow!("Cannot render an empty area"))?;

        let (mut min, mut max) = (area_bounds.min(), area_bounds.max());
        for office in self.offices {
            min.x = min.x.min(office.x());
            min.y = min.y.min(office.y());
            max.x = max.x.max(office.x());
            max.y = max.y.max(office.y());
        }

        Ok(Rect::new(
            (min.x - BOUNDS_PADDING, min.y - BOUNDS_PADDING),
            (max.x + BOUNDS_PADDING, max.y + BOUNDS_PADDING),
        ))
    }
}

/// Star polygon around the origin in pixel offsets, pointing up.
fn star_vertices() -> Vec<(i32, i32)> {
    (0..10)
        .map(|i| {
            let radius = if i % 2 == 0 {
                STAR_OUTER_RADIUS
            } else {
                STAR_INNER_RADIUS
            };
            let angle = -std::f64::consts::FRAC_PI_2 + i as f64 * std::f64::consts::PI / 5.0;
            (
                (radius * angle.cos()).round() as i32,
                (radius * angle.sin()).round() as i32,
            )
        })
        .collect()
}

fn draw_color_bar<DB>(area: &DrawingArea<DB, Shift>, range: &ValueRange) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (_, height) = area.dim_in_pixel();
    let (top, bottom) = (60, height as i32 - 60);
    let (left, right) = (10, 30);
    if bottom <= top {
        return Ok(());
    }

    let steps = 100;
    let step_height = (bottom - top) as f64 / steps as f64;

    for step in 0..steps {
        // top is the maximum
        let t = 1.0 - step as f64 / (steps - 1) as f64;
        let y0 = top + (step as f64 * step_height).floor() as i32;
        let y1 = top + ((step + 1) as f64 * step_height).ceil() as i32;
        area.draw(&Rectangle::new([(left, y0), (right, y1)], hot_r(t).filled()))?;
    }

    area.draw(&Rectangle::new([(left, top), (right, bottom)], BLACK))?;

    let font = ("sans-serif", 12).into_font();
    area.draw(&Text::new(
        format!("{:.1}", range.max),
        (right + 4, top),
        font.clone(),
    ))?;
    area.draw(&Text::new(
        format!("{:.1}", range.min),
        (right + 4, bottom - 12),
        font,
    ))?;

    Ok(())
}

fn draw_panel<DB>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    scene: &HeatmapScene,
    values: &[f64],
) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let (width, _) = area.dim_in_pixel();
    let (chart_area, legend_area) = area.split_horizontally((width as i32 - LEGEND_WIDTH).max(0));

    let bounds = scene.bounds()?;
    let mut chart = ChartBuilder::on(&chart_area)
        .caption(title, ("sans-serif", 20).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(bounds.min().x..bounds.max().x, bounds.min().y..bounds.max().y)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Longitude")
        .y_desc("Latitude")
        .draw()?;

    for polygon in &scene.area.0 {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            chart.draw_series(std::iter::once(PathElement::new(
                ring.coords().map(|coord| (coord.x, coord.y)).collect::<Vec<_>>(),
                BLACK.stroke_width(1),
            )))?;
        }
    }

    let range = ValueRange::from_values(values);
    chart.draw_series(
        scene
            .accumulator
            .points()
            .zip(values)
            .filter(|(_, value)| value.is_finite())
            .map(|(point, &value)| {
                Circle::new(
                    (point.x(), point.y()),
                    POINT_RADIUS,
                    hot_r(range.normalize(value)).filled(),
                )
            }),
    )?;

    chart.draw_series(scene.offices.iter().map(|office| {
        EmptyElement::at((office.x(), office.y()))
            + Polygon::new(star_vertices(), BLUE.filled())
    }))?;

    draw_color_bar(&legend_area, &range)?;

    Ok(())
}

/// Mean travel time on the left, variance on the right. Both series are
/// divided by 60 before drawing.
pub fn render_heatmaps<DB>(root: &DrawingArea<DB, Shift>, scene: &HeatmapScene) -> anyhow::Result<()>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)?;

    let panels = root.split_evenly((1, 2));

    let means = scene
        .accumulator
        .means()
        .iter()
        .map(|&mean| seconds_to_minutes(mean))
        .collect::<Vec<_>>();
    let variances = scene
        .accumulator
        .variances()
        .iter()
        .map(|&variance| seconds_to_minutes(variance))
        .collect::<Vec<_>>();

    draw_panel(&panels[0], AVERAGE_TITLE, scene, &means)?;
    draw_panel(&panels[1], VARIANCE_TITLE, scene, &variances)?;

    root.present()?;

    Ok(())
}

pub fn render_svg_file(path: &Path, size: (u32, u32), scene: &HeatmapScene) -> anyhow::Result<()> {
    let root = SVGBackend::new(path, size).into_drawing_area();
    render_heatmaps(&root, scene)?;

    info!("Heat maps written to {}", path.display());

    Ok(())
}

pub fn render_svg_string(size: (u32, u32), scene: &HeatmapScene) -> anyhow::Result<String> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        render_heatmaps(&root, scene)?;
    }

    Ok(svg)
}
