#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod plot;
pub mod surface;

use std::fmt;

use serde::Serialize;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

use plot::{DEFAULT_PLOT_Z, contour_plane_mesh, danger_zone_mesh};
use surface::{Field, Grid, MissingSampling, SurfaceMeshError, SurfaceMeshOptions};

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
            debug_log!("welltraj-mesh initialized");
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
            debug_log!("welltraj-mesh initialized");
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not start rayon thread pool: {err}")))
}

#[macro_export]
macro_rules! debug_log {
    ($($t:tt)*) => {{
        #[cfg(feature = "debug_logs")]
        {
            #[cfg(target_arch = "wasm32")]
            {
                ::web_sys::console::log_1(&::wasm_bindgen::JsValue::from_str(&format!($($t)*)));
            }
            #[cfg(not(target_arch = "wasm32"))]
            {
                println!("{}", format!($($t)*));
            }
        }
    }};
}

/// Nested row arrays as they arrive from JS. `null` and `NaN` are missing.
type Rows = Vec<Vec<Option<f64>>>;

/// Triangulates a sampled surface.
///
/// `x`, `y`, `z` and the optional colour field `c` are equally shaped 2D
/// arrays. `dense` resamples each axis before meshing; `fill_holes` makes
/// resampling skip missing source nodes. Returns the `Mesh3d` trace data.
#[wasm_bindgen]
pub fn surface_to_mesh3d(
    x: JsValue,
    y: JsValue,
    z: JsValue,
    c: JsValue,
    dense: Option<f64>,
    fill_holes: Option<bool>,
) -> Result<JsValue, JsValue> {
    let x: Vec<Vec<f64>> = from_js(x)?;
    let y: Vec<Vec<f64>> = from_js(y)?;
    let z: Rows = from_js(z)?;
    let c: Option<Rows> = if c.is_null() || c.is_undefined() {
        None
    } else {
        Some(from_js(c)?)
    };

    let options = mesh_options(dense, fill_holes);
    let mesh = surface_rows_to_mesh(&x, &y, &z, c.as_deref(), options).map_err(to_js_error)?;
    to_js(&mesh)
}

/// Flat contour plane at `plot_z` (default 50) coloured by `values`.
#[wasm_bindgen]
pub fn contour_mesh3d(
    x: JsValue,
    y: JsValue,
    values: JsValue,
    plot_z: Option<f64>,
) -> Result<JsValue, JsValue> {
    let x: Vec<Vec<f64>> = from_js(x)?;
    let y: Vec<Vec<f64>> = from_js(y)?;
    let values: Rows = from_js(values)?;

    let mesh = contour_rows_to_mesh(&x, &y, &values, plot_z.unwrap_or(DEFAULT_PLOT_Z))
        .map_err(to_js_error)?;
    to_js(&mesh)
}

/// Densified danger-zone surface coloured by its own height.
#[wasm_bindgen]
pub fn danger_zone_mesh3d(x: JsValue, y: JsValue, z: JsValue) -> Result<JsValue, JsValue> {
    let x: Vec<Vec<f64>> = from_js(x)?;
    let y: Vec<Vec<f64>> = from_js(y)?;
    let z: Rows = from_js(z)?;

    let grid = Grid::new(&x, &y).map_err(to_js_error)?;
    let z = Field::from_option_rows(&z).map_err(to_js_error)?;
    let (mesh, diagnostics) = danger_zone_mesh(&grid, &z).map_err(to_js_error)?;
    log::debug!("danger_zone_mesh3d {diagnostics}");
    to_js(&mesh)
}

fn mesh_options(dense: Option<f64>, fill_holes: Option<bool>) -> SurfaceMeshOptions {
    let missing = if fill_holes.unwrap_or(false) {
        MissingSampling::NearestValid
    } else {
        MissingSampling::Nearest
    };
    SurfaceMeshOptions::dense(dense.unwrap_or(1.0)).with_missing(missing)
}

fn surface_rows_to_mesh(
    x: &[Vec<f64>],
    y: &[Vec<f64>],
    z: &[Vec<Option<f64>>],
    c: Option<&[Vec<Option<f64>>]>,
    options: SurfaceMeshOptions,
) -> Result<surface::Mesh3d, SurfaceMeshError> {
    let grid = Grid::new(x, y)?;
    let z = Field::from_option_rows(z)?;
    let c = c.map(Field::from_option_rows).transpose()?;
    let (mesh, diagnostics) = surface::surface_to_mesh3d(&grid, &z, c.as_ref(), options)?;
    log::debug!("surface_to_mesh3d {diagnostics}");
    Ok(mesh)
}

fn contour_rows_to_mesh(
    x: &[Vec<f64>],
    y: &[Vec<f64>],
    values: &[Vec<Option<f64>>],
    plot_z: f64,
) -> Result<surface::Mesh3d, SurfaceMeshError> {
    let grid = Grid::new(x, y)?;
    let values = Field::from_option_rows(values)?;
    let (mesh, diagnostics) = contour_plane_mesh(&grid, &values, plot_z)?;
    log::debug!("contour_mesh3d {diagnostics}");
    Ok(mesh)
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(to_js_error)
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(to_js_error)
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
