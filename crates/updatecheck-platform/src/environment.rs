use log::debug;

/// Variable consulted when the host does not name its own.
pub const DEFAULT_KILL_SWITCH_VAR: &str = "GRANTED_DISABLE_UPDATE_CHECK";

/// Operating system and CPU architecture names as reported to the update
/// checking service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPlatform {
    pub os: String,
    pub arch: String,
}

impl HostPlatform {
    #[must_use]
    pub fn current() -> Self {
        Self {
            os: os_name(std::env::consts::OS).to_string(),
            arch: arch_name(std::env::consts::ARCH).to_string(),
        }
    }
}

fn os_name(os: &str) -> &str {
    match os {
        "macos" => "darwin",
        other => other,
    }
}

fn arch_name(arch: &str) -> &str {
    match arch {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        "powerpc64" => "ppc64",
        other => other,
    }
}

/// Environment variable that disables update checking when set to `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KillSwitch {
    var: String,
}

impl Default for KillSwitch {
    fn default() -> Self {
        Self::new(DEFAULT_KILL_SWITCH_VAR)
    }
}

impl KillSwitch {
    #[must_use]
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    #[must_use]
    pub fn var(&self) -> &str {
        &self.var
    }

    #[must_use]
    pub fn is_engaged(&self) -> bool {
        let engaged = is_engaged_value(std::env::var(&self.var).ok().as_deref());
        if engaged {
            debug!("{} env var is true, skipping update check", self.var);
        }
        engaged
    }
}

fn is_engaged_value(value: Option<&str>) -> bool {
    value == Some("true")
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_KILL_SWITCH_VAR, KillSwitch, arch_name, is_engaged_value, os_name};

    #[test]
    fn default_kill_switch_uses_shared_variable() {
        assert_eq!(KillSwitch::default().var(), "GRANTED_DISABLE_UPDATE_CHECK");
        assert_eq!(KillSwitch::default().var(), DEFAULT_KILL_SWITCH_VAR);
        assert_eq!(KillSwitch::new("NO_UPDATES").var(), "NO_UPDATES");
    }

    #[test]
    fn kill_switch_only_engages_on_literal_true() {
        assert!(is_engaged_value(Some("true")));
        assert!(!is_engaged_value(Some("TRUE")));
        assert!(!is_engaged_value(Some("1")));
        assert!(!is_engaged_value(Some("")));
        assert!(!is_engaged_value(None));
    }

    #[test]
    fn unset_kill_switch_is_not_engaged() {
        let switch = KillSwitch::new("UPDATECHECK_PLATFORM_TEST_UNSET_VARIABLE");
        assert!(!switch.is_engaged());
    }

    #[test]
    fn platform_names_follow_service_conventions() {
        assert_eq!(os_name("macos"), "darwin");
        assert_eq!(os_name("linux"), "linux");
        assert_eq!(os_name("windows"), "windows");
        assert_eq!(arch_name("x86_64"), "amd64");
        assert_eq!(arch_name("aarch64"), "arm64");
        assert_eq!(arch_name("x86"), "386");
        assert_eq!(arch_name("riscv64"), "riscv64");
    }
}
