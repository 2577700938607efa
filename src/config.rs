use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;

use tracing::{info, warn};

use crate::stacking::EngineConfig;

/// Complete application configuration, loaded from environment variables or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub engine: EngineSettings,
    pub catalog: CatalogConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            engine: EngineSettings::from_env(),
            catalog: CatalogConfig::from_env(),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;
    const HOST_VAR: &'static str = "SHIPPING_CALC_API_HOST";
    const PORT_VAR: &'static str = "SHIPPING_CALC_API_PORT";

    fn from_env() -> Self {
        Self::from_values(env_string(Self::HOST_VAR), env_string(Self::PORT_VAR))
    }

    fn from_values(host: Option<String>, port: Option<String>) -> Self {
        let host_value = host.unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, display_host) = match host_value.parse::<IpAddr>() {
            Ok(ip) => (ip, host_value),
            Err(err) => {
                warn!(
                    "Could not parse {} ('{}'): {}. Using {}.",
                    Self::HOST_VAR,
                    host_value,
                    err,
                    Self::DEFAULT_HOST
                );
                (
                    IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                    Self::DEFAULT_HOST.to_string(),
                )
            }
        };

        let port = match port {
            Some(raw) => match raw.parse::<u16>() {
                Ok(value) if value != 0 => value,
                Ok(_) => {
                    warn!(
                        "{} must not be 0. Using {}.",
                        Self::PORT_VAR,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
                Err(err) => {
                    warn!(
                        "Could not parse {} ('{}'): {}. Using {}.",
                        Self::PORT_VAR,
                        raw,
                        err,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
            },
            None => Self::DEFAULT_PORT,
        };

        Self {
            bind_ip,
            display_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether binding to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }
}

/// Where reference data comes from and how requests default.
#[derive(Clone, Debug, Default)]
pub struct CatalogConfig {
    path: Option<PathBuf>,
    default_use_pallet: bool,
}

impl CatalogConfig {
    const PATH_VAR: &'static str = "SHIPPING_CALC_CATALOG_PATH";
    const USE_PALLET_VAR: &'static str = "SHIPPING_CALC_DEFAULT_USE_PALLET";

    fn from_env() -> Self {
        let path = env_string(Self::PATH_VAR).map(PathBuf::from);
        if let Some(path) = &path {
            info!("Using catalog override at {}", path.display());
        }
        let default_use_pallet = env_string(Self::USE_PALLET_VAR)
            .and_then(|raw| parse_bool(&raw, Self::USE_PALLET_VAR))
            .unwrap_or(false);
        Self {
            path,
            default_use_pallet,
        }
    }

    /// Catalog file replacing the embedded one, if configured.
    pub fn path(&self) -> Option<&std::path::Path> {
        self.path.as_deref()
    }

    /// Pallet mode for requests that do not state one.
    pub fn default_use_pallet(&self) -> bool {
        self.default_use_pallet
    }
}

/// Engine constants adjustable through the environment.
#[derive(Clone, Debug, Default)]
pub struct EngineSettings {
    engine: EngineConfig,
}

impl EngineSettings {
    const MAX_STACK_HEIGHT_VAR: &'static str = "SHIPPING_CALC_MAX_STACK_HEIGHT_MM";
    const PALLET_WEIGHT_RATIO_VAR: &'static str = "SHIPPING_CALC_PALLET_WEIGHT_RATIO";
    const LOW_UTILIZATION_VAR: &'static str = "SHIPPING_CALC_LOW_UTILIZATION_PERCENT";
    const HIGH_UTILIZATION_VAR: &'static str = "SHIPPING_CALC_HIGH_UTILIZATION_PERCENT";

    fn from_env() -> Self {
        let max_stack_height_mm = load_f64_with_warning(
            Self::MAX_STACK_HEIGHT_VAR,
            EngineConfig::DEFAULT_MAX_STACK_HEIGHT_MM,
            |value| value > 0.0,
            "must be greater than 0",
            "Adjusted stacking height changes pallet counts",
        );

        let pallet_self_weight_ratio = load_f64_with_warning(
            Self::PALLET_WEIGHT_RATIO_VAR,
            EngineConfig::DEFAULT_PALLET_SELF_WEIGHT_RATIO,
            |value| (0.0..=1.0).contains(&value),
            "must be between 0 and 1",
            "Adjusted pallet self-weight changes reported totals",
        );

        let mut low_utilization_percent = load_f64_with_warning(
            Self::LOW_UTILIZATION_VAR,
            EngineConfig::DEFAULT_LOW_UTILIZATION_PERCENT,
            |value| value >= 0.0,
            "must not be negative",
            "Adjusted utilization threshold changes recommendations",
        );

        let mut high_utilization_percent = load_f64_with_warning(
            Self::HIGH_UTILIZATION_VAR,
            EngineConfig::DEFAULT_HIGH_UTILIZATION_PERCENT,
            |value| value >= 0.0,
            "must not be negative",
            "Adjusted utilization threshold changes recommendations",
        );

        if low_utilization_percent > high_utilization_percent {
            warn!(
                "{} ({}) is above {} ({}). Using defaults for both.",
                Self::LOW_UTILIZATION_VAR,
                low_utilization_percent,
                Self::HIGH_UTILIZATION_VAR,
                high_utilization_percent
            );
            low_utilization_percent = EngineConfig::DEFAULT_LOW_UTILIZATION_PERCENT;
            high_utilization_percent = EngineConfig::DEFAULT_HIGH_UTILIZATION_PERCENT;
        }

        let engine = EngineConfig::builder()
            .max_stack_height_mm(max_stack_height_mm)
            .pallet_self_weight_ratio(pallet_self_weight_ratio)
            .low_utilization_percent(low_utilization_percent)
            .high_utilization_percent(high_utilization_percent)
            .build();

        Self { engine }
    }

    /// Returns the configured EngineConfig.
    pub fn engine_config(&self) -> EngineConfig {
        self.engine
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            warn!("Access to {} failed: {}. Using default value.", name, err);
            None
        }
    }
}

fn parse_bool(raw: &str, var_name: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        other => {
            warn!(
                "Could not interpret {} ('{}') as boolean value. Using default value.",
                var_name, other
            );
            None
        }
    }
}

fn load_f64_with_warning(
    var_name: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    notice: &str,
) -> f64 {
    parse_f64_setting(
        var_name,
        env_string(var_name),
        default,
        validator,
        invalid_hint,
        notice,
    )
}

fn parse_f64_setting(
    var_name: &str,
    raw: Option<String>,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    notice: &str,
) -> f64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && validator(value) => {
            let tolerance = (default.abs().max(1.0)) * 1e-9;
            if (value - default).abs() > tolerance {
                info!("{} ({} = {}).", notice, var_name, value);
            }
            value
        }
        Ok(_) => {
            warn!(
                "{} contains invalid value '{}': {}. Using {}.",
                var_name, raw, invalid_hint, default
            );
            default
        }
        Err(err) => {
            warn!(
                "Could not parse {} ('{}') as number: {}. Using {}.",
                var_name, raw, err, default
            );
            default
        }
    }
}
