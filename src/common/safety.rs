use std::path::Path;

/// Paths that must NEVER be deleted under any circumstances.
/// This is a critical safety net against bugs in operation bodies.
const PROTECTED_PATHS: &[&str] = &[
    "/",
    "/System",
    "/Applications",
    "/Users",
    "/Library",
    "/usr",
    "/bin",
    "/sbin",
    "/var",
    "/etc",
    "/opt",
    "/private",
    "/cores",
    "/Volumes",
];

/// Paths under home that must never be deleted entirely
const PROTECTED_HOME_DIRS: &[&str] = &[
    "", // home dir itself
    "Desktop",
    "Documents",
    "Downloads",
    "Pictures",
    "Music",
    "Movies",
    "Library",
    "Applications",
    ".ssh",
    ".gnupg",
];

/// SIP-protected prefixes that deletion attempts will always fail on
const SIP_PREFIXES: &[&str] = &["/System/", "/usr/libexec/", "/usr/standalone/"];

/// Check if a path is protected and should NEVER be deleted
pub fn is_protected(path: &Path) -> bool {
    let path_str = path.to_string_lossy();

    // Never delete root-level system paths
    for protected in PROTECTED_PATHS {
        if path_str == *protected {
            return true;
        }
    }

    // Never delete home directory or critical subdirectories
    if let Some(home) = dirs::home_dir() {
        let home_str = home.to_string_lossy().to_string();

        if path_str == home_str {
            return true;
        }

        for dir in PROTECTED_HOME_DIRS {
            let protected_path = if dir.is_empty() {
                home_str.clone()
            } else {
                format!("{}/{}", home_str, dir)
            };
            if path_str == protected_path {
                return true;
            }
        }
    }

    false
}

/// Check if a path sits under System Integrity Protection.
/// Deleting there is pointless even with elevated privileges.
pub fn is_sip_protected(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    SIP_PREFIXES.iter().any(|p| path_str.starts_with(p))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_protected() {
        assert!(is_protected(Path::new("/")));
    }

    #[test]
    fn test_system_dirs_protected() {
        assert!(is_protected(Path::new("/System")));
        assert!(is_protected(Path::new("/Users")));
        assert!(is_protected(Path::new("/Applications")));
        assert!(is_protected(Path::new("/Library")));
    }

    #[test]
    fn test_home_dir_protected() {
        if let Some(home) = dirs::home_dir() {
            assert!(is_protected(&home));
            assert!(is_protected(&home.join("Desktop")));
            assert!(is_protected(&home.join("Documents")));
            assert!(is_protected(&home.join(".ssh")));
        }
    }

    #[test]
    fn test_cache_dir_not_protected() {
        if let Some(home) = dirs::home_dir() {
            assert!(!is_protected(&home.join("Library/Caches/com.example.app")));
            assert!(!is_protected(&home.join("Library/Logs/old.log")));
            assert!(!is_protected(&home.join(".Trash/deleted.txt")));
        }
    }

    #[test]
    fn test_tmp_not_protected() {
        assert!(!is_protected(Path::new("/tmp/somefile")));
    }

    #[test]
    fn test_sip_prefixes() {
        assert!(is_sip_protected(Path::new("/System/Library/Caches/x")));
        assert!(!is_sip_protected(Path::new("/Library/Caches/x")));
    }
}
