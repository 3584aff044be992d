use serde::Serialize;
use serde_json::{Value, json};

use crate::error::Result;
use crate::mesh::Mesh;

/// Turns a decoded mesh into something a viewer can display
pub trait ScenePlotter {
    type Output;

    fn plot(&mut self, mesh: &Mesh) -> Self::Output;
}

/// Decode `glb` and hand it to `plotter`.
///
/// A mesh without vertices or faces is rejected with
/// [`Error::EmptyMesh`](crate::error::Error::EmptyMesh) before the plotter runs.
pub fn render_scene<P: ScenePlotter>(glb: &[u8], plotter: &mut P) -> Result<P::Output> {
    let mesh = Mesh::from_glb(glb)?;
    mesh.ensure_not_empty()?;
    Ok(plotter.plot(&mesh))
}

/// Builds an untextured, translucent Plotly `mesh3d` figure with hidden axes
#[derive(Debug, Clone)]
pub struct PlotlyPlotter {
    pub color: String,
    pub opacity: f32,
}

impl Default for PlotlyPlotter {
    fn default() -> Self {
        Self {
            color: "lightblue".to_string(),
            opacity: 0.5,
        }
    }
}

impl ScenePlotter for PlotlyPlotter {
    type Output = PlotlyFigure;

    fn plot(&mut self, mesh: &Mesh) -> PlotlyFigure {
        let (x, (y, z)): (Vec<f32>, (Vec<f32>, Vec<f32>)) =
            mesh.positions.iter().map(|p| (p.x, (p.y, p.z))).unzip();
        let (i, (j, k)): (Vec<u32>, (Vec<u32>, Vec<u32>)) =
            mesh.faces.iter().map(|f| (f[0], (f[1], f[2]))).unzip();

        let hidden = json!({ "visible": false });
        PlotlyFigure {
            data: vec![json!({
                "type": "mesh3d",
                "x": x, "y": y, "z": z,
                "i": i, "j": j, "k": k,
                "color": self.color,
                "opacity": self.opacity,
            })],
            layout: json!({
                "scene": {
                    "xaxis": hidden,
                    "yaxis": hidden,
                    "zaxis": hidden,
                },
                "margin": { "l": 0, "r": 0, "t": 0, "b": 0 },
            }),
        }
    }
}

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// A Plotly figure, ready to be embedded in a page or handed to a JS client
#[derive(Debug, Clone, Serialize)]
pub struct PlotlyFigure {
    pub data: Vec<Value>,
    pub layout: Value,
}

impl PlotlyFigure {
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Standalone page showing the figure in an interactive viewer
    pub fn to_html(&self, title: &str) -> Result<String> {
        let data = serde_json::to_string(&self.data)?;
        let layout = serde_json::to_string(&self.layout)?;
        let title = escape_html(title);

        Ok(format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
</head>
<body style="margin:0">
<div id="model" style="width:100vw;height:100vh"></div>
<script>
Plotly.newPlot("model", {data}, {layout});
</script>
</body>
</html>
"#
        ))
    }
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
