/// The platform type of the UniFi controller.
///
/// Determines URL prefixes and login paths. The `v4` API version tag of a
/// standalone Network Application maps to [`ClassicController`](Self::ClassicController).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerPlatform {
    /// UniFi OS device (UDM, UCG, etc.) -- `/proxy/network/` prefix.
    UnifiOs,
    /// Standalone Network Application (Java) -- port 8443, no prefix.
    ClassicController,
}

impl ControllerPlatform {
    /// The path prefix for legacy API endpoints.
    pub fn legacy_prefix(self) -> &'static str {
        match self {
            Self::UnifiOs => "/proxy/network",
            Self::ClassicController => "",
        }
    }

    /// The login endpoint path.
    pub fn login_path(self) -> &'static str {
        match self {
            Self::UnifiOs => "/api/auth/login",
            Self::ClassicController => "/api/login",
        }
    }

    /// The logout endpoint path.
    pub fn logout_path(self) -> &'static str {
        match self {
            Self::UnifiOs => "/api/auth/logout",
            Self::ClassicController => "/api/logout",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_controller_has_no_prefix() {
        assert_eq!(ControllerPlatform::ClassicController.legacy_prefix(), "");
        assert_eq!(ControllerPlatform::ClassicController.login_path(), "/api/login");
    }

    #[test]
    fn unifi_os_routes_through_proxy() {
        assert_eq!(ControllerPlatform::UnifiOs.legacy_prefix(), "/proxy/network");
        assert_eq!(ControllerPlatform::UnifiOs.logout_path(), "/api/auth/logout");
    }
}
