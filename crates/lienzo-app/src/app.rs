//! Command-line application: import files into a session, list layers, export.

use lienzo_core::{
    Document, DocumentObserver, EditorConfig, EditorSession, LayerEntry, SessionError,
};
use lienzo_render::{ExportError, ExportFormat, export};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming an optional JSON editor config.
pub const CONFIG_ENV: &str = "LIENZO_CONFIG";

const USAGE: &str = "usage: lienzo [--out PATH] [--format svg|png|jpg]... [--size WxH] FILE...";

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}\n{usage}", usage = USAGE)]
    Usage(String),
    #[error("Cannot read config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("Cannot write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub editor: EditorConfig,
    /// Files to import, in order.
    pub inputs: Vec<PathBuf>,
    /// Output path; the extension is replaced per format.
    pub output: PathBuf,
    pub formats: Vec<ExportFormat>,
    /// Canvas size override.
    pub canvas: Option<(f64, f64)>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            inputs: Vec::new(),
            output: PathBuf::from(lienzo_render::DEFAULT_FILE_STEM),
            formats: vec![ExportFormat::Svg],
            canvas: None,
        }
    }
}

impl AppConfig {
    /// Parse command-line arguments (without the program name).
    pub fn from_args(
        args: impl IntoIterator<Item = String>,
        editor: EditorConfig,
    ) -> Result<Self, AppError> {
        let mut config = Self {
            editor,
            ..Self::default()
        };
        let mut formats = Vec::new();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--out" | "-o" => {
                    let value = args
                        .next()
                        .ok_or_else(|| AppError::Usage("--out needs a path".to_string()))?;
                    config.output = PathBuf::from(value);
                }
                "--format" | "-f" => {
                    let value = args
                        .next()
                        .ok_or_else(|| AppError::Usage("--format needs a value".to_string()))?;
                    let format = ExportFormat::from_extension(&value)
                        .ok_or_else(|| AppError::Usage(format!("unknown format: {value}")))?;
                    formats.push(match format {
                        ExportFormat::Jpeg { .. } => ExportFormat::Jpeg {
                            quality: config.editor.jpeg_quality,
                        },
                        other => other,
                    });
                }
                "--size" => {
                    let value = args
                        .next()
                        .ok_or_else(|| AppError::Usage("--size needs WxH".to_string()))?;
                    config.canvas = Some(parse_size(&value)?);
                }
                flag if flag.starts_with('-') => {
                    return Err(AppError::Usage(format!("unknown option: {flag}")));
                }
                _ => config.inputs.push(PathBuf::from(arg)),
            }
        }
        if !formats.is_empty() {
            config.formats = formats;
        }
        Ok(config)
    }
}

fn parse_size(value: &str) -> Result<(f64, f64), AppError> {
    let invalid = || AppError::Usage(format!("invalid size: {value}"));
    let (w, h) = value.split_once(['x', 'X']).ok_or_else(invalid)?;
    let w = w.trim().parse().map_err(|_| invalid())?;
    let h = h.trim().parse().map_err(|_| invalid())?;
    Ok((w, h))
}

/// Load the editor config named by [`CONFIG_ENV`], or the defaults when unset.
pub fn load_editor_config() -> Result<EditorConfig, AppError> {
    let Some(path) = std::env::var_os(CONFIG_ENV) else {
        return Ok(EditorConfig::default());
    };
    let path = PathBuf::from(path);
    let json = std::fs::read_to_string(&path).map_err(|source| AppError::ConfigIo {
        path: path.clone(),
        source,
    })?;
    let config = EditorConfig::from_json(&json)?;
    log::info!("Loaded config from {}", path.display());
    Ok(config)
}

/// Forwards session notifications to the log.
struct LogObserver;

impl DocumentObserver for LogObserver {
    fn document_changed(&mut self, document: &Document, layers: &[LayerEntry]) {
        log::debug!("Document {} now has {} layer(s)", document.id, layers.len());
    }

    fn history_changed(&mut self, can_undo: bool, can_redo: bool) {
        log::debug!("History: undo={can_undo} redo={can_redo}");
    }

    fn status(&mut self, message: &str) {
        log::info!("{message}");
    }
}

/// The application.
pub struct App {
    config: AppConfig,
    session: EditorSession,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let mut session = EditorSession::new(config.editor.clone());
        session.add_observer(Box::new(LogObserver));
        Self { config, session }
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    /// Run with the process arguments and environment.
    pub async fn run() -> Result<(), AppError> {
        let editor = load_editor_config()?;
        let config = AppConfig::from_args(std::env::args().skip(1), editor)?;
        if config.inputs.is_empty() {
            return Err(AppError::Usage("no input files".to_string()));
        }
        let mut app = App::new(config);
        let written = app.process().await?;
        for path in written {
            println!("{}", path.display());
        }
        Ok(())
    }

    /// Import every input, print the layer list and write the exports.
    ///
    /// A file that fails to import is skipped; the others still go through.
    pub async fn process(&mut self) -> Result<Vec<PathBuf>, AppError> {
        if let Some((width, height)) = self.config.canvas {
            self.session.resize_canvas(width, height)?;
        }
        for path in self.config.inputs.clone() {
            if let Err(e) = self.session.import_file(&path).await {
                log::warn!("Skipping {}: {e}", path.display());
            }
        }
        self.print_layers();
        self.export_all()
    }

    fn print_layers(&self) {
        for layer in self.session.layers() {
            let visibility = if layer.visible { "" } else { " (oculto)" };
            println!("{:>3}  {}{visibility}", layer.display_index, layer.name);
        }
    }

    fn export_all(&self) -> Result<Vec<PathBuf>, AppError> {
        let document = self.session.document();
        let canvas = self.session.canvas_size();
        let mut written = Vec::new();
        for &format in &self.config.formats {
            let output = export(document, canvas, format)?;
            let path = self.config.output.with_extension(format.extension());
            write_file(&path, &output.bytes)?;
            written.push(path);
        }
        Ok(written)
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<(), AppError> {
    std::fs::write(path, bytes).map_err(|source| AppError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Wrote {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_args() {
        let editor = EditorConfig {
            jpeg_quality: 0.6,
            ..EditorConfig::default()
        };
        let config = AppConfig::from_args(
            args(&["-o", "out/dibujo", "--format", "png", "-f", "jpg", "a.svg", "b.png"]),
            editor,
        )
        .unwrap();
        assert_eq!(config.output, PathBuf::from("out/dibujo"));
        assert_eq!(
            config.formats,
            vec![ExportFormat::Png, ExportFormat::Jpeg { quality: 0.6 }]
        );
        assert_eq!(config.inputs.len(), 2);
    }

    #[test]
    fn test_parse_args_errors() {
        let editor = EditorConfig::default;
        assert!(matches!(
            AppConfig::from_args(args(&["--format", "gif"]), editor()),
            Err(AppError::Usage(_))
        ));
        assert!(matches!(
            AppConfig::from_args(args(&["--out"]), editor()),
            Err(AppError::Usage(_))
        ));
        assert!(matches!(
            AppConfig::from_args(args(&["--bogus"]), editor()),
            Err(AppError::Usage(_))
        ));
    }

    #[test]
    fn test_parse_size() {
        assert_eq!(parse_size("1024x768").unwrap(), (1024.0, 768.0));
        assert!(parse_size("1024").is_err());
        assert!(parse_size("ax2").is_err());
    }

    #[test]
    fn test_process_imports_and_exports() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("forma.svg");
        std::fs::write(
            &input,
            r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="10" height="10"/></svg>"#,
        )
        .unwrap();
        let missing = dir.path().join("falta.png");

        let config = AppConfig {
            inputs: vec![input, missing],
            output: dir.path().join("salida"),
            formats: vec![ExportFormat::Svg, ExportFormat::Png],
            ..AppConfig::default()
        };
        let mut app = App::new(config);
        let written = pollster::block_on(app.process()).unwrap();

        assert_eq!(written.len(), 2);
        assert!(written.iter().all(|p| p.exists()));
        assert_eq!(app.session().document().len(), 1);
        let svg = std::fs::read_to_string(dir.path().join("salida.svg")).unwrap();
        assert!(svg.contains("Grupo-1"));
    }

    #[test]
    fn test_invalid_canvas_size_is_rejected() {
        let config = AppConfig {
            canvas: Some((50.0, 50.0)),
            ..AppConfig::default()
        };
        let mut app = App::new(config);
        assert!(matches!(
            pollster::block_on(app.process()),
            Err(AppError::Session(SessionError::InvalidCanvasSize { .. }))
        ));
    }
}
