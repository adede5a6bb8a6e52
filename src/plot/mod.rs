//! Plot-ready meshes for cost contours and danger zones.

mod contour;
mod figure;

pub use contour::{
    ColorRange, ContourLayer, ContourOptions, DANGER_ZONE_DENSITY, DEFAULT_PLOT_Z, LAYER_SPACING,
    contour_plane_mesh, contour_stack, danger_zone_mesh,
};
pub use figure::{ContourTraceOptions, DANGER_ZONE_COLOR, Figure, MeshTrace};
