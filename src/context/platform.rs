//! Host platform detection.

/// The host operating system, detected once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Windows,
    Linux,
    MacOs,
    Unknown,
}

impl Platform {
    /// Detect the current platform from the compiled-in OS identifier.
    pub fn detect() -> Self {
        Self::from_os_name(std::env::consts::OS)
    }

    /// Parse a platform from an OS identifier string.
    ///
    /// Accepts both `darwin` (the uname spelling) and `macos` (the Rust
    /// `std::env::consts::OS` spelling). Unrecognized identifiers map to
    /// [`Platform::Unknown`]; this never fails.
    pub fn from_os_name(name: &str) -> Self {
        match name.to_lowercase().as_str() {
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            "darwin" | "macos" => Self::MacOs,
            _ => Self::Unknown,
        }
    }

    /// Lowercase name, used in exported environment variables.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Windows => "windows",
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Unknown => "unknown",
        }
    }

    /// Whether executables carry an `.exe` suffix on this platform.
    pub fn uses_exe_suffix(&self) -> bool {
        matches!(self, Self::Windows)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_supported_identifiers() {
        assert_eq!(Platform::from_os_name("windows"), Platform::Windows);
        assert_eq!(Platform::from_os_name("linux"), Platform::Linux);
        assert_eq!(Platform::from_os_name("darwin"), Platform::MacOs);
        assert_eq!(Platform::from_os_name("macos"), Platform::MacOs);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(Platform::from_os_name("Windows"), Platform::Windows);
        assert_eq!(Platform::from_os_name("LINUX"), Platform::Linux);
        assert_eq!(Platform::from_os_name("Darwin"), Platform::MacOs);
    }

    #[test]
    fn unrecognized_maps_to_unknown() {
        assert_eq!(Platform::from_os_name("freebsd"), Platform::Unknown);
        assert_eq!(Platform::from_os_name(""), Platform::Unknown);
        assert_eq!(Platform::from_os_name("solaris"), Platform::Unknown);
    }

    #[test]
    fn detect_returns_a_known_value_on_supported_hosts() {
        // The build hosts we care about are all recognized.
        let platform = Platform::detect();
        if cfg!(any(target_os = "windows", target_os = "linux", target_os = "macos")) {
            assert_ne!(platform, Platform::Unknown);
        }
    }

    #[test]
    fn only_windows_uses_exe_suffix() {
        assert!(Platform::Windows.uses_exe_suffix());
        assert!(!Platform::Linux.uses_exe_suffix());
        assert!(!Platform::MacOs.uses_exe_suffix());
        assert!(!Platform::Unknown.uses_exe_suffix());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(Platform::MacOs.to_string(), "macos");
        assert_eq!(Platform::Windows.to_string(), "windows");
    }
}
