//! Owns the shared dictionaries and learned overlays, and hands out sessions.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use tracing::{debug, info};

use tc_core::dict::{BushuAutoDict, BushuDict, DictError, MazegakiDict, MazegakiLru};
use tc_core::keymap::{KeymapConfigError, Keymaps};
use tc_core::settings::Settings;

use crate::{InputSession, Resources};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("dictionary: {0}")]
    Dict(#[from] DictError),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("keymap: {0}")]
    Keymap(#[from] KeymapConfigError),

    #[error("learned dictionary lock poisoned")]
    LockPoisoned,
}

/// Files backing the learned overlays. A missing path disables persistence
/// for that overlay.
#[derive(Debug, Clone, Default)]
pub struct LearnedPaths {
    pub bushu_auto: Option<PathBuf>,
    pub mazegaki_lru: Option<PathBuf>,
}

/// Which overlays `save_learned` wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveReport {
    pub bushu_auto: bool,
    pub mazegaki_lru: bool,
}

pub struct Engine {
    res: Resources,
    paths: LearnedPaths,
}

impl Engine {
    /// Build from already-loaded static data, with empty learned overlays.
    pub fn new(settings: Settings, keymaps: Keymaps, bushu: BushuDict, mazegaki: MazegakiDict) -> Self {
        let lru = MazegakiLru::new(settings.mazegaki.lru_capacity);
        Self {
            res: Resources {
                settings: Arc::new(settings),
                keymaps: Arc::new(keymaps),
                bushu: Arc::new(bushu),
                mazegaki: Arc::new(mazegaki),
                bushu_auto: Arc::new(RwLock::new(BushuAutoDict::new())),
                mazegaki_lru: Arc::new(RwLock::new(lru)),
            },
            paths: LearnedPaths::default(),
        }
    }

    /// Load the static tables from disk. The Mazegaki dictionary may be text
    /// or a compiled snapshot.
    pub fn open(
        settings: Settings,
        keymaps: Keymaps,
        bushu_path: &Path,
        mazegaki_path: &Path,
    ) -> Result<Self, EngineError> {
        let bushu = BushuDict::open(bushu_path)?;
        let mazegaki = MazegakiDict::open_any(mazegaki_path)?;
        info!(
            bushu = bushu.len(),
            mazegaki = mazegaki.len(),
            "static dictionaries loaded"
        );
        Ok(Self::new(settings, keymaps, bushu, mazegaki))
    }

    /// Attach learned-overlay files, loading them when learning is enabled.
    /// A file whose overlay is not loaded is never written either.
    pub fn with_learned(mut self, paths: LearnedPaths) -> Result<Self, EngineError> {
        let learning = self.res.settings.learning;
        self.paths = LearnedPaths::default();
        if learning.bushu {
            if let Some(path) = paths.bushu_auto {
                let auto = BushuAutoDict::open(&path)?;
                debug!(entries = auto.len(), path = %path.display(), "bushu auto loaded");
                self.res.bushu_auto = Arc::new(RwLock::new(auto));
                self.paths.bushu_auto = Some(path);
            }
        }
        if learning.mazegaki {
            if let Some(path) = paths.mazegaki_lru {
                let lru = MazegakiLru::open(&path, self.res.settings.mazegaki.lru_capacity)?;
                debug!(entries = lru.len(), path = %path.display(), "mazegaki lru loaded");
                self.res.mazegaki_lru = Arc::new(RwLock::new(lru));
                self.paths.mazegaki_lru = Some(path);
            }
        }
        Ok(self)
    }

    pub fn resources(&self) -> &Resources {
        &self.res
    }

    pub fn settings(&self) -> &Settings {
        &self.res.settings
    }

    pub fn session(&self) -> InputSession {
        InputSession::new(self.res.clone())
    }

    /// Persist dirty learned overlays.
    pub fn save_learned(&self) -> Result<SaveReport, EngineError> {
        let mut report = SaveReport::default();
        if let Some(path) = &self.paths.bushu_auto {
            let mut auto = self
                .res
                .bushu_auto
                .write()
                .map_err(|_| EngineError::LockPoisoned)?;
            report.bushu_auto = auto.save_if_dirty(path)?;
        }
        if let Some(path) = &self.paths.mazegaki_lru {
            let mut lru = self
                .res
                .mazegaki_lru
                .write()
                .map_err(|_| EngineError::LockPoisoned)?;
            report.mazegaki_lru = lru.save_if_dirty(path)?;
        }
        if report.bushu_auto || report.mazegaki_lru {
            debug!(?report, "learned dictionaries saved");
        }
        Ok(report)
    }
}
