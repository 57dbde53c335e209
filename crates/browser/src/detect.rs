//! Chromium detection and install guidance.

use std::path::PathBuf;

/// Chromium-based executable names searched on PATH. All of these speak CDP.
const CHROMIUM_EXECUTABLES: &[&str] = &[
    "chrome",
    "google-chrome",
    "google-chrome-stable",
    "chromium",
    "chromium-browser",
    "msedge",
    "microsoft-edge-stable",
    "brave-browser",
];

/// macOS app bundle paths for Chromium-based browsers.
#[cfg(target_os = "macos")]
const MACOS_APP_PATHS: &[&str] = &[
    "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
    "/Applications/Chromium.app/Contents/MacOS/Chromium",
    "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
    "/Applications/Brave Browser.app/Contents/MacOS/Brave Browser",
];

/// Windows installation paths for Chromium-based browsers.
#[cfg(target_os = "windows")]
const WINDOWS_PATHS: &[&str] = &[
    r"C:\Program Files\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
    r"C:\Program Files (x86)\Microsoft\Edge\Application\msedge.exe",
];

/// Find a Chromium-based browser on this system.
///
/// Checks, in order: an explicit path from config, the `CHROME` environment
/// variable, platform install paths (app bundles are more reliable than PATH,
/// which can hold broken wrapper scripts), and finally known executable names
/// on PATH.
pub fn find_chromium(custom_path: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = custom_path {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
    }

    if let Ok(path) = std::env::var("CHROME") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Some(p);
        }
    }

    #[cfg(target_os = "macos")]
    for path in MACOS_APP_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
    }

    #[cfg(target_os = "windows")]
    for path in WINDOWS_PATHS {
        let p = PathBuf::from(path);
        if p.exists() {
            return Some(p);
        }
    }

    CHROMIUM_EXECUTABLES
        .iter()
        .find_map(|name| which::which(name).ok())
}

/// Platform-specific install instructions, shown when no browser was found.
pub fn install_hint() -> String {
    let instructions = if cfg!(target_os = "macos") {
        "  brew install --cask google-chrome"
    } else if cfg!(target_os = "linux") {
        "  Debian/Ubuntu: sudo apt install chromium-browser\n  \
         Fedora:         sudo dnf install chromium\n  \
         Arch:           sudo pacman -S chromium"
    } else if cfg!(target_os = "windows") {
        "  winget install Google.Chrome"
    } else {
        "  Download from https://www.google.com/chrome/"
    };

    format!(
        "No Chromium-based browser found. Install one:\n\n\
         {instructions}\n\n\
         Any Chromium-based browser works (Chrome, Chromium, Edge, Brave).\n\
         Or set the CHROME environment variable to the executable path."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_install_hint_not_empty() {
        let hint = install_hint();
        assert!(!hint.is_empty());
        assert!(hint.contains("Chrome"));
    }

    #[test]
    fn test_executables_list_covers_the_basics() {
        assert!(CHROMIUM_EXECUTABLES.contains(&"chrome"));
        assert!(CHROMIUM_EXECUTABLES.contains(&"chromium"));
    }

    #[test]
    fn test_custom_path_takes_precedence() {
        let dir = tempfile::tempdir().unwrap();
        let fake_browser = dir.path().join("fake-chrome-for-test");
        std::fs::write(&fake_browser, "fake").unwrap();

        let found = find_chromium(fake_browser.to_str());
        assert_eq!(found.as_deref(), Some(fake_browser.as_path()));
    }

    #[test]
    fn test_invalid_custom_path_falls_through() {
        // With a nonexistent custom path the lookup must not return that path;
        // whether anything else is found depends on the test machine.
        let found = find_chromium(Some("/nonexistent/path/to/chrome"));
        if let Some(path) = found {
            assert_ne!(path, PathBuf::from("/nonexistent/path/to/chrome"));
        }
    }
}
