// Viewer rendering: turns a PDB structure into a standalone 3Dmol.js page
// and either exports it or opens it in the default browser.

use crate::error::{FoldError, Result};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

const VIEWER_SCRIPT: &str = "https://cdnjs.cloudflare.com/ajax/libs/3Dmol/2.4.2/3Dmol-min.js";
const VIEWER_ELEMENT_ID: &str = "foldview-viewer";
const DISPLAY_FILE_NAME: &str = "foldview-protein.html";

/// Where the rendered viewer goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputMode {
    /// Write the page to this file.
    Export(PathBuf),
    /// Write the page to the temp dir and open it.
    Display,
}

/// Viewer size and 3Dmol style object.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerSpec {
    pub width: u32,
    pub height: u32,
    pub style: Value,
}

impl Default for ViewerSpec {
    fn default() -> Self {
        ViewerSpec {
            width: 600,
            height: 400,
            style: json!({ "cartoon": { "color": "spectrum" } }),
        }
    }
}

/// Result of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub opened: bool,
}

/// Receives the structure payload exactly as the service returned it.
pub trait Renderer {
    fn emit(&self, structure: &str, mode: &OutputMode) -> Result<Artifact>;
}

/// Embed a value as a JS literal inside a `<script>` block.
fn script_literal(value: &impl serde::Serialize) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Build the HTML page. Output depends only on the inputs so repeated
/// renders of the same structure are byte-identical.
pub fn render_html(structure: &str, spec: &ViewerSpec) -> Result<String> {
    let model = script_literal(&structure)?;
    let style = script_literal(&spec.style)?;
    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>foldview</title>
<script src="{script}"></script>
</head>
<body>
<div id="{id}" style="position: relative; width: {width}px; height: {height}px;"></div>
<script>
var viewer = $3Dmol.createViewer(document.getElementById("{id}"), {{backgroundColor: "white"}});
viewer.addModel({model}, "pdb");
viewer.setStyle({{}}, {style});
viewer.zoomTo();
viewer.render();
</script>
</body>
</html>
"#,
        script = VIEWER_SCRIPT,
        id = VIEWER_ELEMENT_ID,
        width = spec.width,
        height = spec.height,
        model = model,
        style = style,
    ))
}

/// 3Dmol.js page renderer used by the binary.
pub struct HtmlViewer {
    spec: ViewerSpec,
    opener: Option<PathBuf>,
}

impl HtmlViewer {
    pub fn new(spec: ViewerSpec) -> Self {
        HtmlViewer { spec, opener: None }
    }

    /// Launch display-mode pages with `program` instead of the platform opener.
    pub fn with_opener(mut self, program: impl Into<PathBuf>) -> Self {
        self.opener = Some(program.into());
        self
    }

    fn write(&self, structure: &str, path: &Path) -> Result<()> {
        let html = render_html(structure, &self.spec)?;
        fs::write(path, html)?;
        debug!(path = %path.display(), "wrote viewer page");
        Ok(())
    }
}

impl Renderer for HtmlViewer {
    fn emit(&self, structure: &str, mode: &OutputMode) -> Result<Artifact> {
        match mode {
            OutputMode::Export(path) => {
                self.write(structure, path)?;
                Ok(Artifact {
                    path: path.clone(),
                    opened: false,
                })
            }
            OutputMode::Display => {
                let path = std::env::temp_dir().join(DISPLAY_FILE_NAME);
                self.write(structure, &path)?;
                if let Err(err) = open_in_browser(opener(self.opener.as_deref(), &path), &path) {
                    if let Err(rm) = fs::remove_file(&path) {
                        warn!(path = %path.display(), "could not remove viewer page: {rm}");
                    }
                    return Err(err);
                }
                Ok(Artifact { path, opened: true })
            }
        }
    }
}

fn opener(program: Option<&Path>, path: &Path) -> Command {
    if let Some(program) = program {
        let mut cmd = Command::new(program);
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "macos") {
        let mut cmd = Command::new("open");
        cmd.arg(path);
        cmd
    } else if cfg!(target_os = "windows") {
        let mut cmd = Command::new("cmd");
        cmd.args(["/C", "start", ""]).arg(path);
        cmd
    } else {
        let mut cmd = Command::new("xdg-open");
        cmd.arg(path);
        cmd
    }
}

fn open_in_browser(mut cmd: Command, path: &Path) -> Result<()> {
    info!(command = ?cmd, "opening viewer");
    let status = cmd.status().map_err(|e| {
        FoldError::Render(format!(
            "could not launch a viewer for '{}': {e}",
            path.display()
        ))
    })?;
    if !status.success() {
        return Err(FoldError::Render(format!(
            "viewer command exited with {status} for '{}'",
            path.display()
        )));
    }
    Ok(())
}
