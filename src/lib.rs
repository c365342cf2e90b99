#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod parse;

use std::fmt;

use geom::{BezierSurface, SurfaceOptions};
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            // no-op fallback when panic hook is disabled
            init_logger();
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
fn init_logger() {
    // no-op fallback when debug logs are disabled
}

/// Prints to the browser console (or stdout natively) when built with `debug_logs`.
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

/// JavaScript-facing owner of one Bézier surface.
///
/// Buffers returned by [`Engine::positions`], [`Engine::normals`] and [`Engine::indices`]
/// are copies; fetch them again after every call that rebuilds the surface.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    options: SurfaceOptions,
    surface: Option<BezierSurface>,
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Engine {
        Engine {
            initialized: true,
            options: SurfaceOptions::default(),
            surface: None,
        }
    }

    /// Reports whether the engine completed its minimal initialisation.
    #[wasm_bindgen]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Reports whether a height field has been loaded.
    #[wasm_bindgen]
    #[must_use]
    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    /// Parses a height file and rebuilds the surface with the current options.
    ///
    /// # Errors
    ///
    /// Parse or build failures, converted to a JS error. The previous surface is kept.
    #[wasm_bindgen]
    pub fn load_heights(&mut self, text: &str) -> Result<(), JsValue> {
        let field = parse::heights::parse_str(text).map_err(to_js_error)?;
        match self.surface.as_mut() {
            Some(surface) => surface.rebuild(field, self.options).map_err(to_js_error)?,
            None => {
                self.surface = Some(BezierSurface::new(field, self.options).map_err(to_js_error)?);
            }
        }
        #[cfg(feature = "debug_logs")]
        if let Some(surface) = self.surface.as_ref() {
            debug_log!("load_heights: {}", surface.diagnostics().summary());
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Resolutions below 2, or a rebuild failure.
    #[wasm_bindgen]
    pub fn set_sample_resolution(&mut self, sample_resolution: u32) -> Result<(), JsValue> {
        self.apply_options(SurfaceOptions {
            sample_resolution: sample_resolution as usize,
            ..self.options
        })
    }

    /// # Errors
    ///
    /// Non-finite or non-positive multipliers, or a rebuild failure.
    #[wasm_bindgen]
    pub fn set_spacing_multiplier(&mut self, spacing_multiplier: f64) -> Result<(), JsValue> {
        self.apply_options(SurfaceOptions {
            spacing_multiplier,
            ..self.options
        })
    }

    /// Replaces all options from a plain object such as
    /// `{ sample_resolution: 16, spacing_multiplier: 2.0 }`. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Malformed objects, invalid values, or a rebuild failure.
    #[wasm_bindgen]
    pub fn set_options(&mut self, options: JsValue) -> Result<(), JsValue> {
        let options: SurfaceOptions = serde_wasm_bindgen::from_value(options).map_err(to_js_error)?;
        self.apply_options(options)
    }

    /// # Errors
    ///
    /// Serialization failures.
    #[wasm_bindgen]
    pub fn get_options(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.options).map_err(to_js_error)
    }

    /// Vertex positions as packed `f32` triples.
    ///
    /// # Errors
    ///
    /// When no height field is loaded.
    #[wasm_bindgen]
    pub fn positions(&self) -> Result<Vec<f32>, JsValue> {
        Ok(self.surface()?.mesh().positions_f32())
    }

    /// Accumulated (unnormalized) vertex normals as packed `f32` triples.
    ///
    /// # Errors
    ///
    /// When no height field is loaded.
    #[wasm_bindgen]
    pub fn normals(&self) -> Result<Vec<f32>, JsValue> {
        Ok(self.surface()?.mesh().normals_f32())
    }

    /// Triangle indices as packed `u32` triples.
    ///
    /// # Errors
    ///
    /// When no height field is loaded.
    #[wasm_bindgen]
    pub fn indices(&self) -> Result<Vec<u32>, JsValue> {
        Ok(self.surface()?.mesh().indices_flat().to_vec())
    }

    /// Diagnostics of the last rebuild as a plain object.
    ///
    /// # Errors
    ///
    /// When no height field is loaded, or on serialization failures.
    #[wasm_bindgen]
    pub fn diagnostics(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self.surface()?.diagnostics()).map_err(to_js_error)
    }
}

impl Engine {
    fn surface(&self) -> Result<&BezierSurface, JsValue> {
        self.surface
            .as_ref()
            .ok_or_else(|| js_error("no height field has been loaded"))
    }

    fn apply_options(&mut self, options: SurfaceOptions) -> Result<(), JsValue> {
        options.validate().map_err(to_js_error)?;
        if let Some(surface) = self.surface.as_mut() {
            surface.resample(options).map_err(to_js_error)?;
            debug_log!("resampled: {}", surface.diagnostics().summary());
        }
        self.options = options;
        Ok(())
    }

    /// Native-side access to the owned surface.
    #[must_use]
    pub fn surface_ref(&self) -> Option<&BezierSurface> {
        self.surface.as_ref()
    }

    #[must_use]
    pub fn options(&self) -> SurfaceOptions {
        self.options
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        wasm_bindgen::JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        log::warn!("{message}");
        JsValue::NULL
    }
}
