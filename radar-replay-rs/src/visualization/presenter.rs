//! Hands an assembled scene to the browser.
//!
//! The scene is embedded as a plotly figure in a self-contained HTML page
//! that pulls plotly.js from `DisplayConfig::plotly_js_url`.

use std::path::{Path, PathBuf};

use log::{debug, info};
use thiserror::Error;

use crate::config::DisplayConfig;
use crate::core::writers::{write_text, WriteError};

use super::scene::Scene;

/// DOM id of the plot container.
const PLOT_DIV_ID: &str = "radar-replay";

/// Errors that can occur while presenting a scene.
#[derive(Error, Debug)]
pub enum PresentError {
    #[error("failed to serialize scene: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error(transparent)]
    Write(#[from] WriteError),

    #[error("failed to create temporary page: {0}")]
    TempFile(#[source] std::io::Error),

    #[error("failed to open browser for '{path}': {source}")]
    Browser {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for presenter operations.
pub type Result<T> = std::result::Result<T, PresentError>;

/// Where the page goes and whether to open it.
#[derive(Debug, Clone)]
pub struct PresentOptions {
    /// Page location; a kept temporary file when `None`.
    pub output: Option<PathBuf>,
    /// Launch the system browser on the page.
    pub open_browser: bool,
}

impl Default for PresentOptions {
    fn default() -> Self {
        Self {
            output: None,
            open_browser: true,
        }
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the scene as a standalone HTML page.
pub fn render_html(scene: &Scene, display: &DisplayConfig) -> Result<String> {
    // A literal "</" inside the JSON would end the script element early.
    let figure = scene.to_json()?.replace("</", "<\\/");

    Ok(format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{script}"></script>
</head>
<body>
<div id="{div}" style="width:{width}px;height:{height}px;"></div>
<script>
const figure = {figure};
Plotly.newPlot("{div}", figure.data, figure.layout);
</script>
</body>
</html>
"#,
        title = escape_html(&scene.layout.title.text),
        script = escape_html(&display.plotly_js_url),
        div = PLOT_DIV_ID,
        width = display.width,
        height = display.height,
        figure = figure,
    ))
}

/// Render the scene and write it to `path`.
pub fn write_html(path: &Path, scene: &Scene, display: &DisplayConfig) -> Result<()> {
    let page = render_html(scene, display)?;
    debug!("Writing {} byte page to {}", page.len(), path.display());
    write_text(path, &page)?;
    Ok(())
}

fn temp_page_path() -> Result<PathBuf> {
    let file = tempfile::Builder::new()
        .prefix("radar-replay-")
        .suffix(".html")
        .tempfile()
        .map_err(PresentError::TempFile)?;
    let (_, path) = file.keep().map_err(|e| PresentError::TempFile(e.error))?;
    Ok(path)
}

/// Write the page and, if requested, open it in the default browser.
///
/// Returns the location of the written page.
pub fn present(scene: &Scene, display: &DisplayConfig, options: &PresentOptions) -> Result<PathBuf> {
    let path = match &options.output {
        Some(path) => path.clone(),
        None => temp_page_path()?,
    };

    write_html(&path, scene, display)?;
    info!("Wrote viewer page to {}", path.display());

    if options.open_browser {
        let target = path.display().to_string();
        webbrowser::open(&target).map_err(|e| PresentError::Browser {
            path: target.clone(),
            source: e,
        })?;
    }

    Ok(path)
}
