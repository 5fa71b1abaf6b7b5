//! `.env` loading
//!
//! Files are read in priority order: `./.env`, then `~/.polls/.env`.
//! dotenvy never overwrites a variable that is already set, so the process
//! environment wins over both and the current directory wins over home.

use std::path::PathBuf;

/// Load the `.env` files that exist and return the ones that were read.
///
/// Runs before tracing is installed, so the caller logs the result.
pub fn load_dotenv() -> Vec<PathBuf> {
    let mut loaded = Vec::new();

    if let Ok(path) = dotenvy::dotenv() {
        loaded.push(path);
    }

    if let Some(env_file) = dirs::home_dir().map(|home| home.join(".polls").join(".env")) {
        if env_file.exists() && dotenvy::from_path(&env_file).is_ok() {
            loaded.push(env_file);
        }
    }

    loaded
}
