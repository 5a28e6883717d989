use crate::config::{Drivers, ParameterSet};
use crate::engine::Engine;
use crate::types::Projection;
use anyhow::{Context, Result, bail};
use std::{
    fs::{self, File},
    io::BufWriter,
    path::{Path, PathBuf},
};

/// Project directory holding the parameter snapshot and projection outputs.
pub struct Manager {
    project_dir: PathBuf,
}

impl Manager {
    pub fn new<P: AsRef<Path>>(project_dir: P) -> Result<Self> {
        let project_dir = project_dir.as_ref().to_path_buf();
        fs::create_dir_all(&project_dir)
            .with_context(|| format!("failed to create {project_dir:?}"))?;
        Ok(Self { project_dir })
    }

    /// Write the baseline parameters as a JSON snapshot.
    pub fn init_params(&self) -> Result<()> {
        let file = self.project_dir.join("params.json");
        if file.exists() {
            bail!("{file:?} already exists");
        }
        ParameterSet::baseline()
            .to_file(&file)
            .context("failed to save baseline params")?;
        log::info!("wrote {file:?}");
        Ok(())
    }

    pub fn run_projection(&self, drivers: Drivers) -> Result<()> {
        let params_file = self.params_file()?;
        let params = ParameterSet::from_file(&params_file)
            .with_context(|| format!("failed to load {params_file:?}"))?;
        log::info!("loaded {params_file:?}");
        log::debug!("{params:#?}");
        log::info!("{drivers:?}");

        let engine = Engine::new(params, drivers).context("failed to construct engine")?;
        let projection = engine.project();

        let monthly_file = self.monthly_file();
        let writer = create(&monthly_file)?;
        projection
            .write_monthly_csv(writer)
            .with_context(|| format!("failed to write {monthly_file:?}"))?;
        log::info!("wrote {monthly_file:?}");

        let annual_file = self.annual_file();
        let writer = create(&annual_file)?;
        projection
            .write_annual_csv(writer)
            .with_context(|| format!("failed to write {annual_file:?}"))?;
        log::info!("wrote {annual_file:?}");

        let projection_file = self.projection_file();
        projection
            .save(&projection_file)
            .context("failed to save projection")?;
        log::info!("wrote {projection_file:?}");

        projection.log_summary();

        Ok(())
    }

    pub fn show_summary(&self) -> Result<()> {
        let projection_file = self.projection_file();
        let projection = Projection::load(&projection_file)
            .with_context(|| format!("failed to load {projection_file:?}"))?;
        projection.log_summary();
        Ok(())
    }

    /// Prefer `params.toml` over `params.json` when both exist.
    fn params_file(&self) -> Result<PathBuf> {
        let candidates = ["params.toml", "params.json"].map(|name| self.project_dir.join(name));
        match candidates.into_iter().find(|file| file.is_file()) {
            Some(file) => Ok(file),
            None => bail!("no params.toml or params.json in {:?}", self.project_dir),
        }
    }

    fn monthly_file(&self) -> PathBuf {
        self.project_dir.join("monthly.csv")
    }

    fn annual_file(&self) -> PathBuf {
        self.project_dir.join("annual.csv")
    }

    fn projection_file(&self) -> PathBuf {
        self.project_dir.join("projection.msgpack")
    }
}

fn create(file: &Path) -> Result<BufWriter<File>> {
    let file = File::create(file).with_context(|| format!("failed to create {file:?}"))?;
    Ok(BufWriter::new(file))
}
