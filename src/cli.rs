use super::{PlotError, Result, VERSION};
use clap::{App, AppSettings, Arg, ErrorKind};

const WRITE: &str = "--write";
/// handed to clap untouched when given alone
const CLAP_FLAGS: [&str; 4] = ["-h", "--help", "-V", "--version"];

/// What the command line asks for.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    /// `csvplot help`
    Help,
    /// text that clap produced for --help or --version
    Info(String),
    /// plot the inputs; with outputs the plots are written, otherwise shown
    Plot {
        inputs: Vec<String>,
        outputs: Option<Vec<String>>,
    },
}

fn app() -> App<'static, 'static> {
    let arg_csvin = Arg::with_name("csv_files")
        .help("csv files inside csvs/, first row for the labels, then two numbers per row")
        .takes_value(true)
        .multiple(true)
        .required(true);
    let arg_write = Arg::with_name("write")
        .help("image files written inside plots/ instead of showing the plots, one per csv file")
        .long("write")
        .takes_value(true)
        .multiple(true)
        .number_of_values(1);
    App::new("csvplot")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about("cli app to plot two-column csv files")
        .setting(AppSettings::ColorNever)
        .arg(arg_csvin)
        .arg(arg_write)
}

/// Takes the CLI arguments (without the program name) and sorts them
/// into input files and, after `--write`, output files.
/// Any token other than the markers is a file name, leading '-' included.
pub fn parse_args<I, S>(args: I) -> Result<Invocation>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();
    match args.first().map(String::as_str) {
        None => return Err(PlotError::NotEnoughArguments),
        Some("help") if args.len() > 1 => return Err(PlotError::HelpWithArguments),
        Some("help") => return Ok(Invocation::Help),
        _ => {}
    }
    let n_write = args.iter().filter(|a| a.as_str() == WRITE).count();
    if n_write > 1 {
        return Err(PlotError::RepeatedWrite);
    }
    if args.last().map(String::as_str) == Some(WRITE) {
        return Err(PlotError::MissingOutputs);
    }

    let write_mode = n_write == 1;
    let clap_args: Vec<String> = if args.len() == 1 && CLAP_FLAGS.contains(&args[0].as_str()) {
        args
    } else {
        if args.iter().any(|a| a.as_str() == "--") {
            return Err(PlotError::Usage(
                "'--' is not a file name, separate input and output files with '--write'".to_string(),
            ));
        }
        // outputs go as --write=<name> and inputs after '--',
        // so clap takes names starting with '-' as values
        let (inputs, outputs) = match args.iter().position(|a| a.as_str() == WRITE) {
            Some(i) => (split_whitespace(&args[..i]), split_whitespace(&args[i + 1..])),
            None => (args, Vec::new()),
        };
        let mut clap_args: Vec<String> = outputs.iter().map(|o| format!("{}={}", WRITE, o)).collect();
        clap_args.push("--".to_string());
        clap_args.extend(inputs);
        clap_args
    };

    let matches = match app().get_matches_from_safe(std::iter::once("csvplot".to_string()).chain(clap_args)) {
        Ok(m) => m,
        Err(e) => match e.kind {
            ErrorKind::HelpDisplayed | ErrorKind::VersionDisplayed => {
                return Ok(Invocation::Info(e.message))
            }
            _ => return Err(PlotError::Usage(e.message)),
        },
    };

    let inputs: Vec<String> = matches
        .values_of("csv_files")
        .map(|v| v.map(String::from).collect())
        .unwrap_or_default();
    if !write_mode {
        return Ok(Invocation::Plot {
            inputs,
            outputs: None,
        });
    }
    let outputs: Vec<String> = matches
        .values_of("write")
        .map(|v| v.map(String::from).collect())
        .unwrap_or_default();
    if inputs.len() != outputs.len() {
        return Err(PlotError::CountMismatch {
            inputs: inputs.len(),
            outputs: outputs.len(),
        });
    }
    return Ok(Invocation::Plot {
        inputs,
        outputs: Some(outputs),
    });
}

fn split_whitespace(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .flat_map(|t| t.split_whitespace())
        .map(String::from)
        .collect()
}
