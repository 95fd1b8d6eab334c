//! Backend endpoint descriptors.
//!
//! An `Endpoint` pairs a logical operation name with an HTTP method and
//! path. Descriptors are static configuration, not runtime state; the API
//! client resolves them against the configured base URL.

/// HTTP method for an endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Get => write!(f, "GET"),
            Self::Post => write!(f, "POST"),
        }
    }
}

/// Static mapping of a logical backend operation to its method and path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Logical operation name, used in logs.
    pub name: &'static str,
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the API base URL.
    pub path: &'static str,
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.path)
    }
}

/// Credential exchange for a token pair.
pub const LOGIN: Endpoint = Endpoint {
    name: "login",
    method: HttpMethod::Post,
    path: "/auth/login",
};

/// Exchange a refresh token for a new access token.
pub const REFRESH: Endpoint = Endpoint {
    name: "refresh",
    method: HttpMethod::Post,
    path: "/auth/refresh",
};

/// Invalidate a refresh token server-side.
pub const LOGOUT: Endpoint = Endpoint {
    name: "logout",
    method: HttpMethod::Post,
    path: "/auth/logout",
};

/// Run the V7 dual-strategy analysis for a date/time.
pub const ANALYZE: Endpoint = Endpoint {
    name: "analyze",
    method: HttpMethod::Post,
    path: "/v7/analyze",
};

/// Today's global signal log.
pub const SIGNALS_TODAY: Endpoint = Endpoint {
    name: "signals_today",
    method: HttpMethod::Get,
    path: "/v7/signals/today",
};

/// Record a fired signal in the global log.
pub const RECORD_SIGNAL: Endpoint = Endpoint {
    name: "record_signal",
    method: HttpMethod::Post,
    path: "/v7/signals",
};

/// Today's minute-level VIX data.
pub const VIX_TODAY: Endpoint = Endpoint {
    name: "vix_today",
    method: HttpMethod::Get,
    path: "/vix/today",
};

/// US 10-year treasury yield.
pub const TREASURY: Endpoint = Endpoint {
    name: "treasury",
    method: HttpMethod::Get,
    path: "/v7/treasury",
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_display() {
        assert_eq!(ANALYZE.to_string(), "POST /v7/analyze");
        assert_eq!(VIX_TODAY.to_string(), "GET /vix/today");
    }

    #[test]
    fn test_paths_are_relative() {
        for endpoint in [
            LOGIN,
            REFRESH,
            LOGOUT,
            ANALYZE,
            SIGNALS_TODAY,
            RECORD_SIGNAL,
            VIX_TODAY,
            TREASURY,
        ] {
            assert!(endpoint.path.starts_with('/'), "{}", endpoint.name);
            assert!(!endpoint.path.ends_with('/'), "{}", endpoint.name);
        }
    }
}
