// Map rendering of the selected route and supplier markers

use plotters::prelude::*;
use std::path::Path;

use crate::error::{Result, RouteError};
use crate::models::{GeoPoint, RouteSelection, Supplier};

/// Smallest padding around the plotted points, in degrees
pub const MIN_PADDING_DEG: f64 = 0.05;

/// Output settings for the rendered map
#[derive(Debug, Clone, Copy)]
pub struct MapStyle {
    pub width: u32,
    pub height: u32,

    /// Draw caption, axes, legend and supplier names (needs system fonts)
    pub show_labels: bool,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
            show_labels: true,
        }
    }
}

/// Latitude/longitude window fitted around a set of points
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl MapBounds {
    /// Fits all finite points with a padding of 5% of the span, at least [`MIN_PADDING_DEG`]
    pub fn fit(points: &[GeoPoint]) -> Option<Self> {
        let mut finite = points
            .iter()
            .filter(|p| p.latitude.is_finite() && p.longitude.is_finite());
        let first = finite.next()?;

        let mut bounds = Self {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lon: first.longitude,
            max_lon: first.longitude,
        };
        for p in finite {
            bounds.min_lat = bounds.min_lat.min(p.latitude);
            bounds.max_lat = bounds.max_lat.max(p.latitude);
            bounds.min_lon = bounds.min_lon.min(p.longitude);
            bounds.max_lon = bounds.max_lon.max(p.longitude);
        }

        let lat_pad = ((bounds.max_lat - bounds.min_lat) * 0.05).max(MIN_PADDING_DEG);
        let lon_pad = ((bounds.max_lon - bounds.min_lon) * 0.05).max(MIN_PADDING_DEG);

        Some(Self {
            min_lat: bounds.min_lat - lat_pad,
            max_lat: bounds.max_lat + lat_pad,
            min_lon: bounds.min_lon - lon_pad,
            max_lon: bounds.max_lon + lon_pad,
        })
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> RouteError {
    RouteError::Render(e.to_string())
}

/// One-line description of the selection for captions and logs
pub fn describe_selection(selection: &RouteSelection) -> String {
    match &selection.detail {
        None => "No feasible route".to_string(),
        Some(detail) if detail.is_direct => format!(
            "Estimated route to {} (live route unavailable), cost {:.2}",
            detail.supplier, selection.cost
        ),
        Some(detail) => {
            let mut text = format!("Road route to {}", detail.supplier);
            if let Some(distance_km) = detail.distance_km {
                text.push_str(&format!(", {:.2} km", distance_km));
            }
            if let Some(time_mins) = detail.time_mins {
                text.push_str(&format!(", {:.1} min", time_mins));
            }
            text.push_str(&format!(", cost {:.2}", selection.cost));
            text
        }
    }
}

/// Renders the hospital, supplier markers and the selected route to a PNG.
///
/// Road routes are drawn green, estimated routes red. An infeasible
/// selection draws the markers only.
pub fn render_route_map<P: AsRef<Path>>(
    output: P,
    origin: GeoPoint,
    suppliers: &[Supplier],
    selection: &RouteSelection,
    style: &MapStyle,
) -> Result<()> {
    let mut points: Vec<GeoPoint> = suppliers.iter().map(|s| s.location).collect();
    points.push(origin);
    if selection.is_feasible() {
        points.extend(selection.path.iter().copied());
    }
    let bounds = MapBounds::fit(&points)
        .ok_or_else(|| RouteError::Render("no finite points to draw".to_string()))?;

    let root = BitMapBackend::new(output.as_ref(), (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut builder = ChartBuilder::on(&root);
    builder.margin(10);
    if style.show_labels {
        builder
            .caption(describe_selection(selection), ("sans-serif", 20).into_font())
            .x_label_area_size(30)
            .y_label_area_size(40);
    }

    // Longitude on x, latitude on y
    let mut chart = builder
        .build_cartesian_2d(bounds.min_lon..bounds.max_lon, bounds.min_lat..bounds.max_lat)
        .map_err(render_err)?;

    if style.show_labels {
        chart
            .configure_mesh()
            .x_desc("Longitude")
            .y_desc("Latitude")
            .draw()
            .map_err(render_err)?;
    }

    if selection.is_feasible() {
        let road = selection.follows_roads();
        let line_style = (if road { GREEN } else { RED }).stroke_width(4);
        let path_points: Vec<(f64, f64)> = selection
            .path
            .iter()
            .map(|p| (p.longitude, p.latitude))
            .collect();

        chart
            .draw_series(LineSeries::new(path_points, line_style))
            .map_err(render_err)?
            .label(if road { "Road Route" } else { "Direct Route" })
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line_style));
    }

    let supplier_style = ShapeStyle::from(&BLUE).filled();
    chart
        .draw_series(suppliers.iter().map(|s| {
            Circle::new((s.location.longitude, s.location.latitude), 6, supplier_style)
        }))
        .map_err(render_err)?
        .label("Supplier")
        .legend(move |(x, y)| Circle::new((x, y), 6, supplier_style));

    let hospital_style = ShapeStyle::from(&RED).filled();
    chart
        .draw_series(std::iter::once(Circle::new(
            (origin.longitude, origin.latitude),
            8,
            hospital_style,
        )))
        .map_err(render_err)?
        .label("Hospital")
        .legend(move |(x, y)| Circle::new((x, y), 8, hospital_style));

    if style.show_labels {
        chart
            .draw_series(suppliers.iter().map(|s| {
                Text::new(
                    s.name.clone(),
                    (s.location.longitude, s.location.latitude),
                    ("sans-serif", 14).into_font(),
                )
            }))
            .map_err(render_err)?;

        chart
            .configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(render_err)?;
    }

    root.present().map_err(render_err)?;
    Ok(())
}
