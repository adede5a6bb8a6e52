//! An explicit accumulator for mesh traces.
//!
//! Plot helpers take a `&mut Figure` and append to it; nothing is kept in
//! ambient state between calls. The figure serializes to a list of
//! plotly-style `Mesh3d` trace records for a renderer to draw.

use std::collections::BTreeSet;

use serde::Serialize;

use super::contour::{
    ColorRange, ContourOptions, DEFAULT_PLOT_Z, contour_plane_mesh, contour_stack,
    danger_zone_mesh,
};
use crate::surface::{Field, Grid, Mesh3d, SurfaceMeshError};

/// A named mesh plus the legend and colour-scale data a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeshTrace {
    pub name: String,
    #[serde(rename = "legendgroup")]
    pub legend_group: String,
    #[serde(flatten)]
    pub mesh: Mesh3d,
    #[serde(flatten, skip_serializing_if = "Option::is_none")]
    pub color_range: Option<ColorRange>,
    /// Fixed trace colour; when set, renderers ignore `intensity`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// Colour of danger-zone traces unless another is given.
pub const DANGER_ZONE_COLOR: &str = "red";

/// Per-trace settings for [`Figure::add_contour`].
#[derive(Debug, Clone, PartialEq)]
pub struct ContourTraceOptions {
    pub name: Option<String>,
    pub legend_group: Option<String>,
    /// Overrides the range derived from the contour values.
    pub color_range: Option<ColorRange>,
    pub plot_z: f64,
}

impl Default for ContourTraceOptions {
    fn default() -> Self {
        Self {
            name: None,
            legend_group: None,
            color_range: None,
            plot_z: DEFAULT_PLOT_Z,
        }
    }
}

impl ContourTraceOptions {
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct Figure {
    traces: Vec<MeshTrace>,
}

impl Figure {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn traces(&self) -> &[MeshTrace] {
        &self.traces
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.traces.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.traces.is_empty()
    }

    /// Number of distinct, non-empty legend groups.
    #[must_use]
    pub fn legend_group_count(&self) -> usize {
        self.traces
            .iter()
            .map(|trace| trace.legend_group.as_str())
            .filter(|group| !group.is_empty())
            .collect::<BTreeSet<_>>()
            .len()
    }

    pub fn push(&mut self, trace: MeshTrace) {
        self.traces.push(trace);
    }

    /// Adds one cost-contour plane.
    ///
    /// An unnamed contour is called `Cost Contour #n`, counting legend groups
    /// already on the figure. The legend group defaults to the name.
    pub fn add_contour(
        &mut self,
        grid: &Grid,
        values: &Field,
        options: ContourTraceOptions,
    ) -> Result<&MeshTrace, SurfaceMeshError> {
        let (mesh, _) = contour_plane_mesh(grid, values, options.plot_z)?;
        let name = options
            .name
            .unwrap_or_else(|| format!("Cost Contour #{}", self.legend_group_count() + 1));
        let legend_group = options.legend_group.unwrap_or_else(|| name.clone());
        let color_range = options.color_range.or_else(|| ColorRange::from_field(values));

        self.traces.push(MeshTrace {
            name,
            legend_group,
            mesh,
            color_range,
            color: None,
        });
        Ok(self.last())
    }

    /// Adds a contour stack, one trace per field.
    pub fn add_contours(
        &mut self,
        grid: &Grid,
        fields: &[Field],
        names: &[String],
        options: ContourOptions,
    ) -> Result<&[MeshTrace], SurfaceMeshError> {
        let layers = contour_stack(grid, fields, names, options)?;
        let start = self.traces.len();
        self.traces.extend(layers.into_iter().map(|layer| MeshTrace {
            legend_group: layer.name.clone(),
            name: layer.name,
            mesh: layer.mesh,
            color_range: layer.color_range,
            color: None,
        }));
        Ok(&self.traces[start..])
    }

    /// Adds a densified danger-zone surface in [`DANGER_ZONE_COLOR`].
    pub fn add_danger_zone(&mut self, grid: &Grid, z: &Field) -> Result<&MeshTrace, SurfaceMeshError> {
        self.add_danger_zone_colored(grid, z, DANGER_ZONE_COLOR)
    }

    pub fn add_danger_zone_colored(
        &mut self,
        grid: &Grid,
        z: &Field,
        color: &str,
    ) -> Result<&MeshTrace, SurfaceMeshError> {
        let (mesh, _) = danger_zone_mesh(grid, z)?;
        self.traces.push(MeshTrace {
            name: "danger zone".to_string(),
            legend_group: String::new(),
            mesh,
            color_range: None,
            color: Some(color.to_string()),
        });
        Ok(self.last())
    }

    fn last(&self) -> &MeshTrace {
        let idx = self.traces.len() - 1;
        &self.traces[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cost() -> (Grid, Field) {
        let grid = Grid::meshgrid(&[0.0, 1.0], &[0.0, 1.0]).unwrap();
        let values = grid.field_from_flat(&[1.0, 2.0, 3.0, f64::NAN]).unwrap();
        (grid, values)
    }

    #[test]
    fn unnamed_contours_count_legend_groups() {
        let (grid, values) = cost();
        let mut fig = Figure::new();

        let first = fig.add_contour(&grid, &values, ContourTraceOptions::default()).unwrap();
        assert_eq!(first.name, "Cost Contour #1");
        assert_eq!(first.legend_group, "Cost Contour #1");

        fig.add_contour(&grid, &values, ContourTraceOptions::named("well B"))
            .unwrap();
        let third = fig.add_contour(&grid, &values, ContourTraceOptions::default()).unwrap();
        assert_eq!(third.name, "Cost Contour #3");
        assert_eq!(fig.len(), 3);
        assert_eq!(fig.legend_group_count(), 3);
    }

    #[test]
    fn shared_legend_group_is_counted_once() {
        let (grid, values) = cost();
        let mut fig = Figure::new();
        for name in ["a", "b"] {
            let options = ContourTraceOptions {
                legend_group: Some("wells".to_string()),
                ..ContourTraceOptions::named(name)
            };
            fig.add_contour(&grid, &values, options).unwrap();
        }
        assert_eq!(fig.legend_group_count(), 1);
        let next = fig.add_contour(&grid, &values, ContourTraceOptions::default()).unwrap();
        assert_eq!(next.name, "Cost Contour #2");
    }

    #[test]
    fn danger_zone_has_no_legend_group() {
        let (grid, values) = cost();
        let mut fig = Figure::new();
        fig.add_danger_zone(&grid, &values).unwrap();
        assert_eq!(fig.traces()[0].name, "danger zone");
        assert_eq!(fig.legend_group_count(), 0);
    }

    #[test]
    fn danger_zone_uses_a_fixed_colour() {
        let (grid, values) = cost();
        let mut fig = Figure::new();
        fig.add_danger_zone(&grid, &values).unwrap();
        fig.add_danger_zone_colored(&grid, &values, "#ff8800").unwrap();
        fig.add_contour(&grid, &values, ContourTraceOptions::default())
            .unwrap();

        let colors: Vec<_> = fig.traces().iter().map(|t| t.color.as_deref()).collect();
        assert_eq!(colors, vec![Some("red"), Some("#ff8800"), None]);

        let json = serde_json::to_value(&fig).unwrap();
        assert_eq!(json["traces"][0]["color"], "red");
        assert!(json["traces"][2].get("color").is_none());
    }

    #[test]
    fn traces_serialize_flat() {
        let (grid, values) = cost();
        let mut fig = Figure::new();
        fig.add_contours(&grid, &[values], &[], ContourOptions::default())
            .unwrap();

        let json = serde_json::to_value(&fig).unwrap();
        let trace = &json["traces"][0];
        assert_eq!(trace["name"], "contour #1");
        assert_eq!(trace["legendgroup"], "contour #1");
        assert_eq!(trace["cmin"], 1.0);
        assert_eq!(trace["cmax"], 3.0);
        assert!(trace["intensity"][3].is_null());
        assert_eq!(trace["z"][0], 50.0);
    }
}
