use parkpass_core::billing::OverstayPolicy;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields except the secrets have defaults suitable for local
/// development. In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Gate-pass and exit-policy configuration.
    pub gate: GateConfig,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
}

/// Configuration for the gate checkpoints.
#[derive(Debug, Clone)]
pub struct GateConfig {
    /// Shared secret for the gate-pass checksum.
    pub pass_secret: String,
    /// Exit-charge policy the facility runs with.
    pub exit_policy: OverstayPolicy,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Required | Default                    |
    /// |------------------------|----------|----------------------------|
    /// | `HOST`                 | no       | `0.0.0.0`                  |
    /// | `PORT`                 | no       | `3000`                     |
    /// | `CORS_ORIGINS`         | no       | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | no       | `30`                       |
    /// | `GATE_PASS_SECRET`     | **yes**  | --                         |
    /// | `EXIT_POLICY`          | no       | `overstay`                 |
    ///
    /// # Panics
    ///
    /// Panics if `GATE_PASS_SECRET` is missing or `EXIT_POLICY` is not one
    /// of `overstay` / `flat`. Misconfiguration fails at startup, not at the
    /// first gate scan.
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let gate = GateConfig::from_env();
        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            gate,
            jwt,
        }
    }
}

impl GateConfig {
    /// Load gate configuration from `GATE_PASS_SECRET` and `EXIT_POLICY`.
    pub fn from_env() -> Self {
        let pass_secret = std::env::var("GATE_PASS_SECRET")
            .expect("GATE_PASS_SECRET must be set in the environment");
        assert!(!pass_secret.is_empty(), "GATE_PASS_SECRET must not be empty");

        let exit_policy = std::env::var("EXIT_POLICY")
            .unwrap_or_else(|_| "overstay".into())
            .parse()
            .expect("EXIT_POLICY must be 'overstay' or 'flat'");

        Self {
            pass_secret,
            exit_policy,
        }
    }
}
