//! Cost-contour and danger-zone meshes built on the surface triangulator.
//!
//! A contour is drawn as a flat plane at height `plot_z`, cut away wherever
//! the cost value is missing, and coloured by the cost itself.

use serde::Serialize;

use crate::surface::{
    Field, Grid, Mesh3d, SurfaceMeshDiagnostics, SurfaceMeshError, SurfaceMeshOptions,
    surface_to_mesh3d,
};

/// Height of the first contour plane when none is given.
pub const DEFAULT_PLOT_Z: f64 = 50.0;

/// Vertical offset between consecutive layers of a contour stack.
pub const LAYER_SPACING: f64 = 0.1;

/// Grid density used for danger-zone surfaces.
pub const DANGER_ZONE_DENSITY: f64 = 4.0;

/// Colour-scale bounds for a trace.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColorRange {
    pub cmin: f64,
    pub cmax: f64,
}

impl ColorRange {
    /// Min and max of the present values, each rounded to two decimals.
    /// `None` when every value is missing.
    #[must_use]
    pub fn from_field(values: &Field) -> Option<Self> {
        Self::from_values(values.values().iter().flatten().map(|&v| round_2(v)))
    }

    /// Unrounded min and max of the present values across several fields.
    #[must_use]
    pub fn spanning<'a>(fields: impl IntoIterator<Item = &'a Field>) -> Option<Self> {
        Self::from_values(
            fields
                .into_iter()
                .flat_map(|field| field.values().iter().flatten().copied()),
        )
    }

    fn from_values(values: impl Iterator<Item = f64>) -> Option<Self> {
        values.fold(None, |range, v| {
            Some(match range {
                None => Self { cmin: v, cmax: v },
                Some(Self { cmin, cmax }) => Self {
                    cmin: cmin.min(v),
                    cmax: cmax.max(v),
                },
            })
        })
    }
}

/// Rounds half to even, like numpy's `round`.
fn round_2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContourOptions {
    /// Height of the first layer.
    pub plot_z: f64,
    /// Give each layer its own colour range instead of one shared range.
    pub separate: bool,
}

impl Default for ContourOptions {
    fn default() -> Self {
        Self {
            plot_z: DEFAULT_PLOT_Z,
            separate: true,
        }
    }
}

impl ContourOptions {
    #[must_use]
    pub fn with_plot_z(mut self, plot_z: f64) -> Self {
        self.plot_z = plot_z;
        self
    }

    #[must_use]
    pub fn shared_range(mut self) -> Self {
        self.separate = false;
        self
    }
}

/// One layer of a contour stack.
#[derive(Debug, Clone, PartialEq)]
pub struct ContourLayer {
    pub name: String,
    pub plot_z: f64,
    pub mesh: Mesh3d,
    pub diagnostics: SurfaceMeshDiagnostics,
    pub color_range: Option<ColorRange>,
}

/// Flat contour plane at `plot_z`, masked and coloured by `values`.
pub fn contour_plane_mesh(
    grid: &Grid,
    values: &Field,
    plot_z: f64,
) -> Result<(Mesh3d, SurfaceMeshDiagnostics), SurfaceMeshError> {
    let plane = values.masked_constant(plot_z);
    surface_to_mesh3d(grid, &plane, Some(values), SurfaceMeshOptions::default())
}

/// Stacks one contour plane per field, `LAYER_SPACING` apart.
///
/// Missing or short `names` are completed with `contour #n` (1-based).
pub fn contour_stack(
    grid: &Grid,
    fields: &[Field],
    names: &[String],
    options: ContourOptions,
) -> Result<Vec<ContourLayer>, SurfaceMeshError> {
    let shared = if options.separate {
        None
    } else {
        ColorRange::spanning(fields)
    };

    let mut layers = Vec::with_capacity(fields.len());
    for (n, values) in fields.iter().enumerate() {
        #[allow(clippy::cast_precision_loss)]
        let plot_z = options.plot_z + n as f64 * LAYER_SPACING;
        let (mesh, diagnostics) = contour_plane_mesh(grid, values, plot_z)?;
        let name = names
            .get(n)
            .cloned()
            .unwrap_or_else(|| format!("contour #{}", n + 1));
        let color_range = if options.separate {
            ColorRange::from_field(values)
        } else {
            shared
        };
        log::debug!("contour layer `{name}` at z={plot_z}: {}", diagnostics.summary());
        layers.push(ContourLayer {
            name,
            plot_z,
            mesh,
            diagnostics,
            color_range,
        });
    }
    Ok(layers)
}

/// Surface mesh of a danger region, densified and coloured by its own height.
pub fn danger_zone_mesh(
    grid: &Grid,
    z: &Field,
) -> Result<(Mesh3d, SurfaceMeshDiagnostics), SurfaceMeshError> {
    surface_to_mesh3d(grid, z, Some(z), SurfaceMeshOptions::dense(DANGER_ZONE_DENSITY))
}
