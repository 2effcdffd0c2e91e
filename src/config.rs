use super::{CSV_DIR, FIGURE_SIZE, PLOT_DIR};
use std::path::PathBuf;

/// environment variable naming the program that shows the plots in display mode
pub const VIEWER_ENV: &str = "CSVPLOT_VIEWER";

/// Where files are read from and written to, and how they are shown.
/// Nothing here is persisted; the defaults are the fixed conventions of the tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub size: (u32, u32),
    pub viewer: Option<String>,
}

impl Default for Settings {
    fn default() -> Settings {
        Settings {
            input_dir: PathBuf::from(CSV_DIR),
            output_dir: PathBuf::from(PLOT_DIR),
            size: FIGURE_SIZE,
            viewer: None,
        }
    }
}

impl Settings {
    /// the defaults, with the viewer taken from CSVPLOT_VIEWER when set
    pub fn from_env() -> Settings {
        let viewer = std::env::var(VIEWER_ENV)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());
        Settings {
            viewer,
            ..Settings::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_directory_convention() {
        let settings = Settings::default();
        assert_eq!(settings.input_dir, PathBuf::from("csvs"));
        assert_eq!(settings.output_dir, PathBuf::from("plots"));
        assert_eq!(settings.size, (640, 480));
        assert_eq!(settings.viewer, None);
    }
}
