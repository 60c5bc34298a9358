//! Loading presets, scene snapshots and settings, and turning command-line
//! options into a bake request.

use anyhow::{bail, Context, Result};
use spaceswitch_bake::MemoryScene;
use spaceswitch_spec::{load_preset, BakeMode, BakeRequest, FrameWindow, SwitchSettings, SwitchSpec};
use std::fs;
use std::path::{Path, PathBuf};

use crate::session::SessionContext;

/// Options shared by `plan` and `switch`.
#[derive(Debug, Clone, Default)]
pub struct BakeOptions {
    /// Preset path; falls back to the session's last preset.
    pub preset: Option<String>,
    /// Scene snapshot path.
    pub scene: String,
    /// Optional settings file.
    pub settings: Option<String>,
    /// `current`, `keys` or `every`.
    pub mode: String,
    pub start: Option<f64>,
    pub end: Option<f64>,
    /// Reuse the session's last window when no window is given.
    pub last_window: bool,
}

/// Everything a plan or switch needs.
#[derive(Debug)]
pub struct LoadedInputs {
    pub preset_path: PathBuf,
    pub spec: SwitchSpec,
    pub scene: MemoryScene,
    pub settings: SwitchSettings,
    pub request: BakeRequest,
}

/// Parses a command-line mode name.
pub fn parse_mode(name: &str) -> Result<BakeMode> {
    match name {
        "current" => Ok(BakeMode::CurrentFrame),
        "keys" => Ok(BakeMode::BakeAtExistingKeyframes),
        "every" => Ok(BakeMode::BakeEveryFrame),
        other => bail!("unknown mode: {} (expected current, keys or every)", other),
    }
}

/// Builds the window from `--start`/`--end`, or from the session when asked.
pub fn frame_window(
    start: Option<f64>,
    end: Option<f64>,
    last_window: bool,
    session: &SessionContext,
) -> Result<Option<FrameWindow>> {
    match (start, end) {
        (Some(start), Some(end)) => Ok(Some(FrameWindow::new(start, end))),
        (None, None) if last_window => match session.last_window {
            Some(window) => Ok(Some(window)),
            None => bail!("--last-window given but the session has no window"),
        },
        (None, None) => Ok(None),
        _ => bail!("--start and --end must be given together"),
    }
}

/// Reads a scene snapshot.
pub fn load_scene(path: &Path) -> Result<MemoryScene> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scene file: {}", path.display()))?;
    MemoryScene::from_json(&content)
        .with_context(|| format!("Failed to parse scene file: {}", path.display()))
}

/// Writes a scene snapshot.
pub fn save_scene(scene: &MemoryScene, path: &Path) -> Result<()> {
    let json = scene.to_json_pretty()?;
    fs::write(path, json).with_context(|| format!("Failed to write scene file: {}", path.display()))
}

/// Reads settings, or returns the defaults.
pub fn load_settings(path: Option<&str>) -> Result<SwitchSettings> {
    let Some(path) = path else {
        return Ok(SwitchSettings::default());
    };
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path))?;
    SwitchSettings::from_json(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path))
}

/// Loads every input named by `options` and records the preset and window
/// in `session`.
pub fn load_inputs(options: &BakeOptions, session: &mut SessionContext) -> Result<LoadedInputs> {
    let preset_path = session.resolve_preset(options.preset.as_deref())?;
    let spec = load_preset(&preset_path)?;
    let scene = load_scene(Path::new(&options.scene))?;
    let settings = load_settings(options.settings.as_deref())?;

    let mode = parse_mode(&options.mode)?;
    let window = frame_window(options.start, options.end, options.last_window, session)?;
    let request = BakeRequest { mode, window };

    log::debug!("preset {} ({})", preset_path.display(), spec.mode_name());
    session.remember_preset(&preset_path);
    if window.is_some() {
        session.last_window = window;
    }

    Ok(LoadedInputs {
        preset_path,
        spec,
        scene,
        settings,
        request,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("current").unwrap(), BakeMode::CurrentFrame);
        assert_eq!(
            parse_mode("keys").unwrap(),
            BakeMode::BakeAtExistingKeyframes
        );
        assert_eq!(parse_mode("every").unwrap(), BakeMode::BakeEveryFrame);
        assert!(parse_mode("sometimes").is_err());
    }

    #[test]
    fn test_frame_window_requires_both_ends() {
        let session = SessionContext::default();
        assert!(frame_window(Some(1.0), None, false, &session).is_err());
        assert_eq!(frame_window(None, None, false, &session).unwrap(), None);
        assert_eq!(
            frame_window(Some(1.0), Some(9.0), true, &session).unwrap(),
            Some(FrameWindow::new(1.0, 9.0))
        );
    }

    #[test]
    fn test_frame_window_from_session() {
        let mut session = SessionContext::default();
        assert!(frame_window(None, None, true, &session).is_err());

        session.last_window = Some(FrameWindow::new(3.0, 7.0));
        assert_eq!(
            frame_window(None, None, true, &session).unwrap(),
            Some(FrameWindow::new(3.0, 7.0))
        );
    }

    #[test]
    fn test_missing_settings_file_is_error() {
        let err = load_settings(Some("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("here.json"));
        assert_eq!(load_settings(None).unwrap(), SwitchSettings::default());
    }
}
