use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tessel_runtime::{DriverConfig, StreamerConfig, TickBudget};

// tessel.toml; every section and key is optional
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub stream: StreamSection,
    pub mesh: MeshSection,
    pub run: RunSection,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct StreamSection {
    pub render_distance: f32,
    pub unload_offset: f32,
    pub tick_budget_ms: f32,
    /// Fixed number of offset-table steps per tick instead of a time budget.
    pub tick_steps: Option<usize>,
    pub max_meshes_per_tick: usize,
}

impl Default for StreamSection {
    fn default() -> Self {
        let s = StreamerConfig::default();
        Self {
            render_distance: s.render_distance,
            unload_offset: s.unload_offset,
            tick_budget_ms: 1.0,
            tick_steps: None,
            max_meshes_per_tick: DriverConfig::default().max_meshes_per_tick,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MeshSection {
    pub background: bool,
    /// 0 picks one less than the available cores.
    pub workers: usize,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct RunSection {
    pub ticks: u32,
    /// Anchor speed in blocks per tick.
    pub speed: f32,
    pub blocks: Option<PathBuf>,
}

impl Default for RunSection {
    fn default() -> Self {
        Self {
            ticks: 600,
            speed: 0.5,
            blocks: None,
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: AppConfig = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: &Path) -> Result<Self, Box<dyn Error>> {
        let s = std::fs::read_to_string(path)
            .map_err(|e| format!("reading {}: {}", path.display(), e))?;
        let cfg = Self::from_toml_str(&s).map_err(|e| format!("{}: {}", path.display(), e))?;
        log::info!("loaded config {:?}", path);
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        let s = &self.stream;
        if !s.render_distance.is_finite() || s.render_distance < 0.0 {
            return Err(format!("render_distance must be >= 0, got {}", s.render_distance).into());
        }
        if !s.unload_offset.is_finite() || s.unload_offset < 0.0 {
            return Err(format!("unload_offset must be >= 0, got {}", s.unload_offset).into());
        }
        if !s.tick_budget_ms.is_finite() || s.tick_budget_ms < 0.0 {
            return Err(format!("tick_budget_ms must be >= 0, got {}", s.tick_budget_ms).into());
        }
        if !self.run.speed.is_finite() {
            return Err("run.speed must be finite".into());
        }
        Ok(())
    }

    pub fn budget(&self) -> TickBudget {
        match self.stream.tick_steps {
            Some(n) => TickBudget::Steps(n),
            None => TickBudget::Time(Duration::from_secs_f32(self.stream.tick_budget_ms / 1000.0)),
        }
    }

    pub fn mesh_workers(&self) -> usize {
        if !self.mesh.background {
            return 0;
        }
        if self.mesh.workers > 0 {
            return self.mesh.workers;
        }
        std::thread::available_parallelism()
            .map(|n| n.get().saturating_sub(1))
            .unwrap_or(1)
            .max(1)
    }

    pub fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            stream: StreamerConfig {
                render_distance: self.stream.render_distance,
                unload_offset: self.stream.unload_offset,
            },
            budget: self.budget(),
            max_meshes_per_tick: self.stream.max_meshes_per_tick,
            mesh_workers: self.mesh_workers(),
        }
    }
}
