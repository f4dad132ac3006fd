#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod scene;
pub mod tessellation;

use scene::{SceneCell, SceneGrid, SceneOutput, SceneSpec};
use tessellation::{PATTERN_NAMES, Pattern, RenderMode, TessellationError};
use wasm_bindgen::JsError;
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

/// Failures of the [`Engine`] state machine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("er is geen scène geladen")]
    NoScene,
    #[error("grid is nog niet geëvalueerd")]
    NotEvaluated,
    #[error("onbekend patroon `{0}`")]
    UnknownPattern(String),
    #[error("onbekende rendermodus `{0}`")]
    UnknownRenderMode(String),
    #[error(transparent)]
    Tessellation(#[from] TessellationError),
}

/// Public entry point for consumers.
#[wasm_bindgen]
pub struct Engine {
    initialized: bool,
    scene: Option<SceneSpec>,
    grid: Option<SceneGrid>,
    result_dirty: bool,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

#[wasm_bindgen]
impl Engine {
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Engine {
        Engine {
            initialized: true,
            scene: None,
            grid: None,
            result_dirty: false,
        }
    }

    /// Geeft terug of de engine de minimale initialisatie heeft doorlopen.
    #[wasm_bindgen]
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Laad een scènebeschrijving (oppervlak, patroon en rendermodus).
    #[wasm_bindgen]
    pub fn load_scene(&mut self, scene: JsValue) -> Result<(), JsValue> {
        let scene: SceneSpec = serde_wasm_bindgen::from_value(scene).map_err(to_js_error)?;
        self.load_scene_spec(scene);
        Ok(())
    }

    /// Vervang het patroon van de geladen scène; een naam geeft de standaardparameters.
    #[wasm_bindgen]
    pub fn set_pattern(&mut self, pattern: JsValue) -> Result<(), JsValue> {
        let pattern = match pattern.as_string() {
            Some(name) => Pattern::from_name(&name)
                .ok_or(EngineError::UnknownPattern(name))
                .map_err(to_js_error)?,
            None => serde_wasm_bindgen::from_value(pattern).map_err(to_js_error)?,
        };
        self.set_pattern_spec(pattern).map_err(to_js_error)
    }

    /// Kies hoe de cellen worden weergegeven.
    #[wasm_bindgen]
    pub fn set_render_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        self.set_render_mode_by_name(mode).map_err(to_js_error)
    }

    /// Bouw het grid van de geladen scène opnieuw op.
    #[wasm_bindgen]
    pub fn evaluate(&mut self) -> Result<(), JsValue> {
        self.evaluate_scene().map_err(to_js_error)
    }

    /// Haalt de cellen van de laatste evaluatie op in parameterruimte.
    #[wasm_bindgen]
    pub fn get_cells(&self) -> Result<JsValue, JsValue> {
        let cells = self.cells().map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&cells).map_err(|err| JsError::new(&err.to_string()).into())
    }

    /// Haalt de weergegeven geometrie op, één item per cel.
    #[wasm_bindgen]
    pub fn get_geometry(&self) -> Result<JsValue, JsValue> {
        let output = self.output().map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&output).map_err(|err| JsError::new(&err.to_string()).into())
    }

    #[wasm_bindgen]
    pub fn get_pattern_names(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&PATTERN_NAMES)
            .map_err(|err| JsError::new(&err.to_string()).into())
    }
}

impl Engine {
    pub fn load_scene_spec(&mut self, scene: SceneSpec) {
        debug_log!(
            "scène geladen: {} op {}",
            scene.pattern.name(),
            scene.surface.name()
        );
        self.scene = Some(scene);
        self.grid = None;
        self.result_dirty = true;
    }

    pub fn set_pattern_spec(&mut self, pattern: Pattern) -> Result<(), EngineError> {
        let scene = self.scene.as_mut().ok_or(EngineError::NoScene)?;
        scene.pattern = pattern;
        self.result_dirty = true;
        Ok(())
    }

    /// Rendering happens on demand, so the grid stays valid.
    pub fn set_render_mode_by_name(&mut self, mode: &str) -> Result<(), EngineError> {
        let scene = self.scene.as_mut().ok_or(EngineError::NoScene)?;
        scene.render =
            RenderMode::from_name(mode).ok_or_else(|| EngineError::UnknownRenderMode(mode.to_owned()))?;
        Ok(())
    }

    #[must_use]
    pub fn scene(&self) -> Option<&SceneSpec> {
        self.scene.as_ref()
    }

    pub fn evaluate_scene(&mut self) -> Result<(), EngineError> {
        if !self.result_dirty && self.grid.is_some() {
            return Ok(());
        }
        let scene = self.scene.as_ref().ok_or(EngineError::NoScene)?;
        match scene.build() {
            Ok(grid) => {
                debug_log!("grid geëvalueerd: {} cellen", grid.face_count());
                self.grid = Some(grid);
                self.result_dirty = false;
                Ok(())
            }
            Err(err) => {
                self.grid = None;
                Err(err.into())
            }
        }
    }

    fn evaluated(&self) -> Result<(&SceneSpec, &SceneGrid), EngineError> {
        let scene = self.scene.as_ref().ok_or(EngineError::NoScene)?;
        if self.result_dirty {
            return Err(EngineError::NotEvaluated);
        }
        let grid = self.grid.as_ref().ok_or(EngineError::NotEvaluated)?;
        Ok((scene, grid))
    }

    pub fn cells(&self) -> Result<Vec<SceneCell>, EngineError> {
        let (_, grid) = self.evaluated()?;
        Ok(SceneOutput::cells(grid))
    }

    pub fn output(&self) -> Result<SceneOutput, EngineError> {
        let (scene, grid) = self.evaluated()?;
        Ok(scene.render(grid))
    }
}

fn to_js_error<E: std::fmt::Display>(error: E) -> JsValue {
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

#[cfg(test)]
mod tests {
    use super::{Engine, EngineError};
    use crate::scene::{SceneSpec, SurfaceSpec};
    use crate::tessellation::Pattern;

    fn loaded() -> Engine {
        let mut engine = Engine::new();
        let pattern = Pattern::from_name("basic_quads").unwrap();
        engine.load_scene_spec(SceneSpec::new(SurfaceSpec::default(), pattern));
        engine
    }

    #[test]
    fn outputs_require_an_evaluation() {
        let mut engine = loaded();
        assert!(matches!(engine.cells(), Err(EngineError::NotEvaluated)));
        engine.evaluate_scene().unwrap();
        assert_eq!(engine.cells().unwrap().len(), 16);
    }

    #[test]
    fn pattern_changes_mark_the_grid_dirty() {
        let mut engine = loaded();
        engine.evaluate_scene().unwrap();
        engine
            .set_pattern_spec(Pattern::from_name("dense_triangles").unwrap())
            .unwrap();
        assert!(matches!(engine.output(), Err(EngineError::NotEvaluated)));
        engine.evaluate_scene().unwrap();
        assert_eq!(engine.output().unwrap().geometry.len(), 64);
    }

    #[test]
    fn render_mode_changes_keep_the_grid() {
        let mut engine = loaded();
        engine.evaluate_scene().unwrap();
        engine.set_render_mode_by_name("iso-boundary").unwrap();
        let output = engine.output().unwrap();
        assert_eq!(output.failures, 0);
        assert!(matches!(
            engine.set_render_mode_by_name("wireframe"),
            Err(EngineError::UnknownRenderMode(_))
        ));
    }

    #[test]
    fn operations_without_scene_fail() {
        let mut engine = Engine::new();
        assert!(matches!(engine.evaluate_scene(), Err(EngineError::NoScene)));
        assert!(matches!(
            engine.set_render_mode_by_name("uv"),
            Err(EngineError::NoScene)
        ));
    }
}
