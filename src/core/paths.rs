use std::env;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct AppPaths {
    pub data_dir: PathBuf,
    pub log_dir: PathBuf,
    pub db_path: PathBuf,
    /// Local cache location for the downloaded index artifact.
    pub index_cache_path: PathBuf,
}

impl AppPaths {
    pub fn new() -> Self {
        let data_dir = discover_data_dir();
        let log_dir = data_dir.join("logs");
        let db_path = data_dir.join("primis_chat.db");
        let index_cache_path = data_dir.join("vectorstore").join("index.json");

        for dir in [&data_dir, &log_dir] {
            let _ = fs::create_dir_all(dir);
        }
        if let Some(parent) = index_cache_path.parent() {
            let _ = fs::create_dir_all(parent);
        }

        AppPaths {
            data_dir,
            log_dir,
            db_path,
            index_cache_path,
        }
    }

    #[cfg(test)]
    pub fn for_dir(dir: &std::path::Path) -> Self {
        AppPaths {
            data_dir: dir.to_path_buf(),
            log_dir: dir.join("logs"),
            db_path: dir.join("primis_chat.db"),
            index_cache_path: dir.join("index.json"),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

fn discover_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("PRIMIS_DATA_DIR") {
        return PathBuf::from(dir);
    }

    if cfg!(debug_assertions) {
        return env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join("data");
    }

    let xdg = env::var("XDG_DATA_HOME").unwrap_or_else(|_| {
        home_dir().join(".local/share").to_string_lossy().to_string()
    });
    PathBuf::from(xdg).join("primis-backend")
}

fn home_dir() -> PathBuf {
    env::var("HOME")
        .or_else(|_| env::var("USERPROFILE"))
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
}
