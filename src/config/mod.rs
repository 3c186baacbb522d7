use crate::core::report::DEFAULT_TEXT_LIMIT;
use crate::models::distribution_mode::DistributionMode;
use crate::models::lunch_window::LunchWindow;
use crate::models::run_config::{MAX_LUNCH_WINDOWS, MIN_WORKERS, clamp_workers};
use crate::ui::messages::warning;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;

pub mod migrate;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: String,
    /// Default team size when `--workers` is not given.
    #[serde(default = "default_workers", deserialize_with = "lenient::workers")]
    pub workers: usize,
    #[serde(default, deserialize_with = "lenient::distribution_mode")]
    pub distribution_mode: DistributionMode,
    #[serde(default = "default_lunch_windows", deserialize_with = "lenient::lunch_windows")]
    pub lunch_windows: Vec<LunchWindow>,
    #[serde(default)]
    pub chain_mode: bool,
    /// Display names for workers 1..N; blanks fall back to "Worker N".
    #[serde(default)]
    pub worker_names: Vec<String>,
    #[serde(default = "default_text_limit", deserialize_with = "lenient::text_limit")]
    pub text_limit: usize,
    /// Directory used when `export --file` is a bare file name.
    #[serde(default)]
    pub export_dir: Option<String>,
}

fn default_workers() -> usize {
    MIN_WORKERS
}
fn default_lunch_windows() -> Vec<LunchWindow> {
    vec![LunchWindow::default()]
}
fn default_text_limit() -> usize {
    DEFAULT_TEXT_LIMIT
}

/// Readers that replace one bad value with its default (and say so)
/// instead of rejecting the whole file.
mod lenient {
    use super::{default_lunch_windows, default_text_limit, default_workers};
    use crate::models::distribution_mode::DistributionMode;
    use crate::models::lunch_window::LunchWindow;
    use crate::models::run_config::clamp_workers;
    use crate::ui::messages::warning;
    use serde::{Deserialize, Deserializer};
    use serde_yaml::Value;

    fn integer(v: &Value) -> Option<i64> {
        match v {
            Value::Number(n) => n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
            Value::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    pub fn workers<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
        let v = Value::deserialize(d)?;
        let Some(raw) = integer(&v) else {
            if !v.is_null() {
                warning(format!("config: workers is not a number, using {}", default_workers()));
            }
            return Ok(default_workers());
        };

        let n = clamp_workers(raw);
        if n as i64 != raw {
            warning(format!("config: workers {raw} out of range, using {n}"));
        }
        Ok(n)
    }

    pub fn distribution_mode<'de, D: Deserializer<'de>>(d: D) -> Result<DistributionMode, D::Error> {
        let v = Value::deserialize(d)?;
        if v.is_null() {
            return Ok(DistributionMode::default());
        }

        match v.as_str().and_then(DistributionMode::from_str_opt) {
            Some(mode) => Ok(mode),
            None => {
                let shown = v.as_str().unwrap_or("(not text)");
                warning(format!("config: unknown distribution_mode '{shown}', using total"));
                Ok(DistributionMode::default())
            }
        }
    }

    /// Windows with out-of-range parts are clamped; entries that are not
    /// maps are dropped.
    pub fn lunch_windows<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<LunchWindow>, D::Error> {
        let v = Value::deserialize(d)?;
        let items = match v {
            Value::Null => return Ok(default_lunch_windows()),
            Value::Sequence(items) => items,
            _ => {
                warning("config: lunch_windows must be a list, using the default window");
                return Ok(default_lunch_windows());
            }
        };

        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            if !item.is_mapping() {
                warning(format!("config: lunch window #{} is not a map, skipped", i + 1));
                continue;
            }
            let part = |key: &str| item.get(key).and_then(integer).unwrap_or(0);
            out.push(LunchWindow::new(part("hour"), part("minute"), part("duration")));
        }
        Ok(out)
    }

    pub fn text_limit<'de, D: Deserializer<'de>>(d: D) -> Result<usize, D::Error> {
        let v = Value::deserialize(d)?;
        match integer(&v) {
            Some(n) if n > 0 => Ok(n as usize),
            _ if v.is_null() => Ok(default_text_limit()),
            _ => {
                warning(format!("config: invalid text_limit, using {}", default_text_limit()));
                Ok(default_text_limit())
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let db_path = Self::database_file();
        Self {
            database: db_path.to_string_lossy().to_string(),
            workers: default_workers(),
            distribution_mode: DistributionMode::Total,
            lunch_windows: default_lunch_windows(),
            chain_mode: false,
            worker_names: Vec::new(),
            text_limit: default_text_limit(),
            export_dir: None,
        }
    }
}

impl Config {
    /// Return the standard configuration directory depending on the platform
    pub fn config_dir() -> PathBuf {
        if cfg!(target_os = "windows") {
            let appdata = env::var("APPDATA").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(appdata).join("timetotable")
        } else {
            let home = env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".timetotable")
        }
    }

    /// Return the full path of the config file
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("timetotable.conf")
    }

    /// Return the full path of the SQLite database
    pub fn database_file() -> PathBuf {
        Self::config_dir().join("timetotable.sqlite")
    }

    /// Load configuration from file, or return defaults if not found.
    /// An unreadable file is reported and replaced by defaults.
    pub fn load() -> Self {
        let path = Self::config_file();

        if !path.exists() {
            return Self::default();
        }

        let parsed = fs::read_to_string(&path)
            .map_err(|e| e.to_string())
            .and_then(|content| {
                serde_yaml::from_str::<Config>(&content).map_err(|e| e.to_string())
            });

        match parsed {
            Ok(cfg) => cfg.normalized(),
            Err(e) => {
                warning(format!(
                    "Configuration file {} is not valid ({}), using defaults",
                    path.display(),
                    e
                ));
                Self::default()
            }
        }
    }

    /// Clamp values that a hand-edited file may carry out of range.
    pub fn normalized(mut self) -> Self {
        self.workers = clamp_workers(self.workers as i64);
        self.lunch_windows = self
            .lunch_windows
            .iter()
            .map(LunchWindow::normalized)
            .take(MAX_LUNCH_WINDOWS)
            .collect();
        if self.text_limit == 0 {
            self.text_limit = default_text_limit();
        }
        self
    }

    /// Initialize configuration and database files
    pub fn init_all(custom_name: Option<String>, is_test: bool) -> io::Result<()> {
        let dir = Self::config_dir();
        fs::create_dir_all(&dir)?;

        // DB name: user provided or default
        let db_path = if let Some(name) = custom_name {
            let p = std::path::Path::new(&name);
            if p.is_absolute() {
                p.to_path_buf()
            } else {
                dir.join(p)
            }
        } else {
            Self::database_file()
        };

        let config = Config {
            database: db_path.to_string_lossy().to_string(),
            ..Config::default()
        };

        // Write config file
        if !is_test {
            let yaml = serde_yaml::to_string(&config).map_err(io::Error::other)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(yaml.as_bytes())?;
            println!("✅ Config file: {:?}", Self::config_file());
        }

        Ok(())
    }
}
