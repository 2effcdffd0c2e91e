use super::plot::Rendering;
use super::{PlotError, Result};
use log::info;
use std::fs;
use std::path::PathBuf;
use std::process::Command;

/// Shows pending renderings by handing them to an external program.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewer {
    program: String,
    args: Vec<String>,
}

impl Viewer {
    /// `command` is split on whitespace, the file to show is appended last
    pub fn new(command: &str) -> Viewer {
        let mut parts = command.split_whitespace().map(String::from);
        let program = parts.next().unwrap_or_default();
        Viewer {
            program,
            args: parts.collect(),
        }
    }

    /// the opener of the platform
    pub fn system() -> Viewer {
        if cfg!(target_os = "windows") {
            Viewer::new("cmd /C start \"\"")
        } else if cfg!(target_os = "macos") {
            Viewer::new("open")
        } else {
            Viewer::new("xdg-open")
        }
    }

    pub fn from_command(command: Option<&str>) -> Viewer {
        match command {
            Some(c) => Viewer::new(c),
            None => Viewer::system(),
        }
    }

    /// Writes every rendering to its own temporary svg file, kept after
    /// the run so the viewer can still read it, and opens it.
    /// Returns the written files.
    pub fn show(&self, renderings: Vec<Rendering>) -> Result<Vec<PathBuf>> {
        if self.program.is_empty() {
            return Err(PlotError::Viewer("no viewer command given".to_string()));
        }
        let mut shown = Vec::with_capacity(renderings.len());
        for rendering in renderings {
            let path = write_temp(&rendering)?;
            info!("showing {} from {}", rendering.name, path.display());
            let status = Command::new(&self.program)
                .args(&self.args)
                .arg(&path)
                .status()
                .map_err(|e| PlotError::Viewer(format!("could not run '{}': {}", self.program, e)))?;
            if !status.success() {
                return Err(PlotError::Viewer(format!(
                    "'{}' failed on {} ({})",
                    self.program,
                    path.display(),
                    status
                )));
            }
            shown.push(path);
        }
        Ok(shown)
    }
}

fn write_temp(rendering: &Rendering) -> Result<PathBuf> {
    let stem = rendering.name.trim_end_matches(".csv").replace(|c: char| !c.is_alphanumeric(), "_");
    let file = tempfile::Builder::new()
        .prefix(&format!("csvplot-{}-", stem))
        .suffix(".svg")
        .tempfile()
        .map_err(|source| PlotError::Io {
            path: std::env::temp_dir(),
            source,
        })?;
    fs::write(file.path(), &rendering.svg).map_err(|source| PlotError::Io {
        path: file.path().to_path_buf(),
        source,
    })?;
    let path = file.into_temp_path().keep().map_err(|e| PlotError::Io {
        path: e.path.to_path_buf(),
        source: e.error,
    })?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendering(name: &str) -> Rendering {
        Rendering {
            name: name.to_string(),
            svg: "<svg></svg>".to_string(),
        }
    }

    #[test]
    fn command_is_split_into_program_and_args() {
        let viewer = Viewer::new("feh --scale-down");
        assert_eq!(viewer.program, "feh");
        assert_eq!(viewer.args, vec!["--scale-down".to_string()]);
        assert_eq!(Viewer::from_command(None), Viewer::system());
    }

    #[test]
    fn empty_command_is_refused() {
        assert!(matches!(
            Viewer::new("  ").show(vec![rendering("a.csv")]),
            Err(PlotError::Viewer(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn every_rendering_is_written_and_opened() {
        let shown = Viewer::new("true")
            .show(vec![rendering("a.csv"), rendering("log_b.csv")])
            .unwrap();
        assert_eq!(shown.len(), 2);
        for path in &shown {
            assert_eq!(fs::read_to_string(path).unwrap(), "<svg></svg>");
            fs::remove_file(path).unwrap();
        }
    }

    #[cfg(unix)]
    #[test]
    fn failing_viewer_is_an_error() {
        let result = Viewer::new("false").show(vec![rendering("a.csv")]);
        assert!(matches!(result, Err(PlotError::Viewer(_))));
    }
}
