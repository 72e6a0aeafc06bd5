use std::path::PathBuf;
use std::time::Duration;

// =============================================================================
// Update scheduling
// =============================================================================

/// Interval between full re-reads of every tracked repository (24 hours)
pub const FULL_UPDATE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Interval between incremental update passes (1 minute)
pub const INCREMENTAL_UPDATE_INTERVAL: Duration = Duration::from_secs(60);

// =============================================================================
// GitHub API limits
// =============================================================================

/// Maximum number of attempts for one GraphQL query
pub const RETRY_CEILING: u32 = 20;

/// Base back-off delay; attempt n waits n times this long
pub const RETRY_BASE_DELAY: Duration = Duration::from_secs(2);

/// Remaining-quota level below which every request logs a warning
pub const RATE_LIMIT_LOW_WATER_MARK: u32 = 1000;

/// Feature versions tracked by default
pub const DEFAULT_VERSIONS: &[u32] = &[8, 9, 10, 11, 12, 13];

/// Returns the GitHub API token from $GITHUB_TOKEN, falling back to the
/// first line of `~/.github_token`.
pub fn github_token() -> Option<String> {
    github_token_with_env(std::env::var("GITHUB_TOKEN").ok(), dirs::home_dir())
}

fn github_token_with_env(env_token: Option<String>, home_dir: Option<PathBuf>) -> Option<String> {
    env_token
        .filter(|t| !t.trim().is_empty())
        .or_else(|| {
            let token_file = home_dir?.join(".github_token");
            let contents = std::fs::read_to_string(token_file).ok()?;
            contents.lines().next().map(|l| l.trim().to_string())
        })
        .filter(|t| !t.is_empty())
}

/// Returns the path to the data directory for jdk-index.
/// Uses $XDG_DATA_HOME/jdk-index if XDG_DATA_HOME is set,
/// otherwise falls back to ~/.local/share/jdk-index,
/// or ./jdk-index if neither is available.
pub fn data_dir() -> PathBuf {
    data_dir_with_env(std::env::var("XDG_DATA_HOME").ok(), dirs::home_dir())
}

/// Returns the directory holding one JSON document per feature version.
pub fn releases_dir() -> PathBuf {
    data_dir().join("releases")
}

fn data_dir_with_env(xdg_data_home: Option<String>, home_dir: Option<PathBuf>) -> PathBuf {
    let data_dir = xdg_data_home
        .map(PathBuf::from)
        .or_else(|| home_dir.map(|home| home.join(".local/share")))
        .unwrap_or_else(|| PathBuf::from("."));

    data_dir.join("jdk-index")
}
