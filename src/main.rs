//! Desktop viewer binary for the prisma refractive dispersion visual.

use std::path::PathBuf;

use prisma::{options::Options, Viewer};

fn parse_args() -> Result<Option<PathBuf>, String> {
    let mut args = std::env::args().skip(1);
    let mut options = None;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--options" => {
                let path = args
                    .next()
                    .ok_or_else(|| "--options needs a path".to_owned())?;
                options = Some(PathBuf::from(path));
            }
            other => return Err(format!("unknown argument: {other}")),
        }
    }
    Ok(options)
}

fn main() {
    env_logger::init();

    let options_path = match parse_args() {
        Ok(path) => path,
        Err(e) => {
            log::error!("{e}");
            log::error!("Usage: prisma [--options path.toml]");
            std::process::exit(2);
        }
    };

    let options = match options_path {
        Some(path) => match Options::load(&path) {
            Ok(options) => {
                log::info!("loaded options from {}", path.display());
                options
            }
            Err(e) => {
                log::error!("{e}");
                std::process::exit(1);
            }
        },
        None => Options::default(),
    };

    if let Err(e) = Viewer::builder().with_options(options).build().run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
