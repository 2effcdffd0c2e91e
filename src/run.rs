use super::config::Settings;
use super::plot::{render_svg, save_plot, Rendering};
use super::viewer::Viewer;
use super::{PlotError, Record, Result};
use log::info;

/// Loads and plots every input in order.
/// Without outputs the plots are collected and shown together at the end,
/// with outputs each plot is written to the output at the same position.
/// The first failure stops the run.
pub fn plot_files(inputs: &[String], outputs: Option<&[String]>, settings: &Settings) -> Result<()> {
    match outputs {
        Some(outputs) => write_plots(inputs, outputs, settings),
        None => {
            let pending = render_plots(inputs, settings)?;
            let viewer = Viewer::from_command(settings.viewer.as_deref());
            viewer.show(pending)?;
            Ok(())
        }
    }
}

/// write mode: input and output are paired by position
pub fn write_plots(inputs: &[String], outputs: &[String], settings: &Settings) -> Result<()> {
    if inputs.len() != outputs.len() {
        return Err(PlotError::CountMismatch {
            inputs: inputs.len(),
            outputs: outputs.len(),
        });
    }
    for (csvin, imgout) in inputs.iter().zip(outputs.iter()) {
        let fout = settings.output_dir.join(imgout);
        info!(
            "read data from {} and plot to {}",
            settings.input_dir.join(csvin).display(),
            fout.display()
        );
        let record = Record::from_csv(&settings.input_dir, csvin)?;
        save_plot(&record, &fout, settings.size)?;
    }
    Ok(())
}

/// display mode: the renderings waiting to be shown, in input order
pub fn render_plots(inputs: &[String], settings: &Settings) -> Result<Vec<Rendering>> {
    let mut pending: Vec<Rendering> = Vec::with_capacity(inputs.len());
    for csvin in inputs {
        info!("read data from {}", settings.input_dir.join(csvin).display());
        let record = Record::from_csv(&settings.input_dir, csvin)?;
        pending.push(render_svg(&record, settings.size)?);
    }
    Ok(pending)
}
