use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::PathBuf,
    time::Duration,
};

use directories::BaseDirs;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
    read_env: bool,
}

impl Config {
    pub fn load() -> Self {
        let mut map = default_map();
        let config_path = default_config_path();

        // Read .rbridgerc if exists
        if config_path.exists() {
            if let Ok(file) = fs::File::open(&config_path) {
                let reader = BufReader::new(file);
                for line in reader.lines().map_while(Result::ok) {
                    let line = line.trim();
                    if line.is_empty() || line.starts_with('#') {
                        continue;
                    }
                    if let Some((k, v)) = line.split_once('=') {
                        map.insert(k.trim().to_string(), v.trim().to_string());
                    }
                }
            }
        }

        // Overlay environment variables (take precedence)
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                map.insert(k, v);
            }
        }

        Self { inner: map, config_path, read_env: true }
    }

    /// Defaults overlaid with explicit pairs; never consults the environment.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map = default_map();
        for (k, v) in pairs {
            map.insert(k.into(), v.into());
        }
        Self { inner: map, config_path: default_config_path(), read_env: false }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        // ENV first
        if self.read_env {
            if let Ok(v) = env::var(key) {
                return Some(v);
            }
        }
        self.inner.get(key).cloned()
    }

    /// Like [`Config::get`] but treats an empty value as unset.
    pub fn get_non_empty(&self, key: &str) -> Option<String> {
        self.get(key).filter(|v| !v.trim().is_empty())
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn get_usize(&self, key: &str) -> Option<usize> {
        self.get(key).and_then(|v| v.parse::<usize>().ok())
    }

    pub fn get_duration_ms(&self, key: &str) -> Option<Duration> {
        self.get(key)
            .and_then(|v| v.trim().parse::<u64>().ok())
            .map(Duration::from_millis)
    }

    /// `source.encoding`: appended to `source()` calls when set.
    pub fn source_encoding(&self) -> Option<String> {
        self.get_non_empty("SOURCE_ENCODING")
    }

    /// `source.focus`: `"terminal"` focuses the console after sending text.
    pub fn source_focus(&self) -> String {
        self.get("SOURCE_FOCUS").unwrap_or_else(|| "editor".into())
    }

    pub fn r_term(&self) -> String {
        self.get_non_empty("R_TERM").unwrap_or_else(|| "R".into())
    }

    pub fn r_term_args(&self) -> Vec<String> {
        self.get("R_TERM_ARGS")
            .unwrap_or_default()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }

    pub fn rscript(&self) -> String {
        self.get_non_empty("RSCRIPT").unwrap_or_else(|| "Rscript".into())
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "R_TERM",
        "R_TERM_ARGS",
        "RSCRIPT",
        "SOURCE_ENCODING",
        "SOURCE_FOCUS",
        "LINT_ON_SAVE",
        "LINT_TIMEOUT",
        "CSV_VIEWER",
        "PREVIEW_MAX_ROWS",
        "PREVIEW_TIMEOUT_MS",
        "PREVIEW_REQUIRE_NONEMPTY",
    ];

    KEYS.contains(&k)
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("rbridge").join(".rbridgerc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();

    // Executables
    m.insert("R_TERM".into(), "R".into());
    let term_args = if cfg!(windows) {
        "--no-save --no-restore --quiet --ess"
    } else {
        "--no-save --no-restore --quiet --interactive"
    };
    m.insert("R_TERM_ARGS".into(), term_args.into());
    m.insert("RSCRIPT".into(), "Rscript".into());
    m.insert("CSV_VIEWER".into(), String::new());

    // Numbers
    m.insert("LINT_TIMEOUT".into(), "60".into());
    m.insert("PREVIEW_MAX_ROWS".into(), "100".into());

    // Strings
    m.insert("SOURCE_ENCODING".into(), "UTF-8".into());
    m.insert("SOURCE_FOCUS".into(), "editor".into());

    // Bools as strings
    m.insert("LINT_ON_SAVE".into(), "true".into());
    m.insert("PREVIEW_REQUIRE_NONEMPTY".into(), "false".into());

    m
}
