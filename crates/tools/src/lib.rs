//! Runs a scene against a [`HeadlessHost`] and reports everything it did.

use std::fs;
use std::path::PathBuf;
use std::rc::Rc;

use clap::ValueEnum;
use foundation::time::Time;
use gpu::recording::GlCall;
use gpu::surface::{Surface, Viewport};
use runtime::diagnostics::{Diagnostic, DiagnosticLog};
use runtime::render_loop::{LoopControl, RenderLoop};
use scene::config::SceneConfig;
use scene::error::FrameError;
use scene::host::HeadlessHost;
use scene::setup::Setup;
use scene::{axis, rotating, triangle};
use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SceneKind {
    /// Flat triangle drawn once.
    Triangle,
    /// Triangle spinning about the vertical axis.
    Rotating,
    /// Triangle turned by the xAngle/yAngle sliders.
    Axis,
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub scene: SceneKind,
    pub viewport: Viewport,
    pub frames: u32,
    pub fps: f64,
    /// Raw slider values; `None` leaves that slider off the page.
    pub x_angle: Option<String>,
    pub y_angle: Option<String>,
    pub webgl: bool,
    pub config: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            scene: SceneKind::Triangle,
            viewport: Viewport::new(800, 600),
            frames: 1,
            fps: 60.0,
            x_angle: Some("0".to_string()),
            y_angle: Some("0".to_string()),
            webgl: true,
            config: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    Ready { frames_run: u64, stopped: bool },
    Degraded { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub scene: SceneKind,
    pub surface: Viewport,
    pub outcome: Outcome,
    pub diagnostics: Vec<Diagnostic>,
    pub calls: Vec<GlCall>,
}

pub fn load_config(path: Option<&PathBuf>) -> Result<SceneConfig, String> {
    let Some(path) = path else {
        return Ok(SceneConfig::default());
    };
    let text = fs::read_to_string(path).map_err(|e| format!("read {}: {e}", path.display()))?;
    SceneConfig::from_json(&text).map_err(|e| format!("{}: {e}", path.display()))
}

fn host_for(options: &RunOptions, config: &SceneConfig) -> HeadlessHost {
    let host = HeadlessHost::new(options.viewport);
    let sliders = [
        (&config.sliders.x_input_id, &options.x_angle),
        (&config.sliders.y_input_id, &options.y_angle),
    ];
    for (id, value) in sliders {
        if let Some(value) = value {
            host.add_input(id, value.as_str());
        }
    }
    if options.webgl { host } else { host.without_webgl() }
}

/// Ticks `render_loop` at `frames` evenly spaced timestamps starting at zero.
fn drive(mut render_loop: RenderLoop<FrameError>, frames: u32, fps: f64) -> Outcome {
    let step = if fps > 0.0 { 1.0 / fps } else { 0.0 };
    for i in 0..frames {
        if render_loop.tick(Time(f64::from(i) * step)) == LoopControl::Stop {
            break;
        }
    }
    Outcome::Ready {
        frames_run: render_loop.frames_run(),
        stopped: render_loop.is_stopped(),
    }
}

/// `Ready` scenes are handed to `ready`; degraded ones report why.
fn finish<R>(setup: Setup<R>, ready: impl FnOnce(R) -> Outcome) -> Outcome {
    match setup {
        Setup::Ready(scene) => ready(scene),
        Setup::Degraded(reason) => Outcome::Degraded {
            reason: reason.to_string(),
        },
    }
}

pub fn run(options: &RunOptions) -> Result<Report, String> {
    let config = load_config(options.config.as_ref())?;
    let host = host_for(options, &config);
    let log = Rc::new(DiagnosticLog::new());
    let (frames, fps) = (options.frames, options.fps);

    let (surface, outcome) = match options.scene {
        SceneKind::Triangle => {
            let output = triangle::mount(&host, &*log).map_err(|e| e.to_string())?;
            let outcome = finish(output.setup, |_| Outcome::Ready {
                frames_run: 1,
                stopped: true,
            });
            (output.surface, outcome)
        }
        SceneKind::Rotating => {
            let output = rotating::mount(&host, &config, &*log).map_err(|e| e.to_string())?;
            let outcome = finish(output.setup, |scene| {
                drive(scene.into_render_loop(), frames, fps)
            });
            (output.surface, outcome)
        }
        SceneKind::Axis => {
            let output = axis::mount(&host, &config, &*log).map_err(|e| e.to_string())?;
            let outcome = finish(output.setup, |scene| {
                drive(scene.into_render_loop(log.clone()), frames, fps)
            });
            (output.surface, outcome)
        }
    };

    tracing::info!(scene = ?options.scene, ?outcome, "scene finished");
    Ok(Report {
        scene: options.scene,
        surface: surface.size(),
        outcome,
        diagnostics: log.entries(),
        calls: surface.context().calls(),
    })
}

#[cfg(test)]
mod tests {
    use super::{Outcome, RunOptions, SceneKind, load_config, run};
    use scene::config::SceneConfig;
    use gpu::recording::GlCall;
    use gpu::surface::Viewport;
    use pretty_assertions::assert_eq;
    use runtime::diagnostics::DiagnosticKind;

    fn draws(calls: &[GlCall]) -> usize {
        calls
            .iter()
            .filter(|call| matches!(call, GlCall::DrawTriangles { .. }))
            .count()
    }

    #[test]
    fn triangle_draws_once() {
        let report = run(&RunOptions {
            viewport: Viewport::new(1024, 768),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(report.surface, Viewport::new(1024, 768));
        assert_eq!(
            report.outcome,
            Outcome::Ready {
                frames_run: 1,
                stopped: true
            }
        );
        assert_eq!(draws(&report.calls), 1);
        assert!(report.diagnostics.is_empty());
    }

    #[test]
    fn rotating_draws_every_requested_frame() {
        let report = run(&RunOptions {
            scene: SceneKind::Rotating,
            frames: 5,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            report.outcome,
            Outcome::Ready {
                frames_run: 5,
                stopped: false
            }
        );
        assert_eq!(draws(&report.calls), 5);
    }

    #[test]
    fn axis_without_a_slider_stops_on_first_frame() {
        let report = run(&RunOptions {
            scene: SceneKind::Axis,
            frames: 4,
            y_angle: None,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            report.outcome,
            Outcome::Ready {
                frames_run: 0,
                stopped: true
            }
        );
        assert_eq!(report.diagnostics.len(), 1);
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::FrameFailed);
        assert_eq!(draws(&report.calls), 0);
    }

    #[test]
    fn no_webgl_reports_degraded() {
        let report = run(&RunOptions {
            scene: SceneKind::Rotating,
            webgl: false,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            report.outcome,
            Outcome::Degraded {
                reason: "no WebGL rendering context".to_string()
            }
        );
        assert!(report.calls.is_empty());
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::ContextUnavailable);
    }

    #[test]
    fn partial_config_file_overrides_only_its_fields() {
        let path = std::env::temp_dir().join("triangles-partial-config.json");
        std::fs::write(&path, r#"{ "sliders": { "x_input_id": "spin" } }"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.sliders.x_input_id, "spin");
        assert_eq!(config.sliders.y_input_id, "yAngle");
        assert_eq!(config.rotation, SceneConfig::default().rotation);
    }

    #[test]
    fn zero_slider_divisor_in_config_is_refused() {
        let path = std::env::temp_dir().join("triangles-zero-divisor.json");
        std::fs::write(&path, r#"{ "sliders": { "divisor": 0 } }"#).unwrap();
        let result = run(&RunOptions {
            scene: SceneKind::Axis,
            config: Some(path.clone()),
            ..Default::default()
        });
        std::fs::remove_file(&path).ok();

        let err = result.unwrap_err();
        assert!(err.contains("sliders.divisor"), "{err}");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let path = std::env::temp_dir().join("triangles-no-such-config.json");
        assert!(load_config(Some(&path)).unwrap_err().starts_with("read "));
    }

    #[test]
    fn report_serializes_with_tagged_calls() {
        let report = run(&RunOptions::default()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["scene"], "triangle");
        assert_eq!(json["outcome"]["status"], "ready");
        assert_eq!(json["surface"]["width"], 800);
        assert!(json["calls"]
            .as_array()
            .unwrap()
            .iter()
            .any(|call| call["call"] == "draw_triangles"));
    }
}
