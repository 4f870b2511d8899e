use std::{fs::File, io, path::PathBuf};

use clap::Parser;

use crate::{cli::usage::SyntheticArgs, input::write_intervals, prelude::*};

#[derive(Parser)]
pub struct ProfileArgs {
    #[clap(flatten)]
    pub synthetic: SyntheticArgs,

    /// CSV file to write, standard output by default.
    #[clap(long, short)]
    pub output: Option<PathBuf>,
}

impl ProfileArgs {
    #[instrument(skip_all)]
    pub fn run(&self) -> Result {
        let intervals = self.synthetic.generate()?;
        match &self.output {
            Some(path) => {
                let file = File::create(path)
                    .with_context(|| format!("failed to create `{}`", path.display()))?;
                write_intervals(&intervals, file)?;
                info!(path = %path.display(), "written");
            }
            None => write_intervals(&intervals, io::stdout().lock())?,
        }
        Ok(())
    }
}
