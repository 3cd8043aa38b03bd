use std::path::Path;
use std::time::Duration;

use nextmap_lib::{Config, Result, Viewport};
use url::Url;

use crate::cli::Cli;

/// Effective settings after merging CLI flags over the config file.
/// A flag given on the command line always wins; the config file fills the
/// rest; built-in defaults fill whatever remains.
#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub url: Url,
    pub viewport: Viewport,
    pub zoom: u32,
    pub navigation_timeout: Option<Duration>,
    pub element_timeout: Duration,
    pub process_timeout: Duration,
    pub node_command: String,
    pub convert_command: String,
}

pub fn resolve_settings(cli: &Cli, config: &Config) -> Result<ResolvedSettings> {
    let url = Url::parse(cli.url.as_deref().unwrap_or(&config.url))?;

    Ok(ResolvedSettings {
        url,
        viewport: cli.viewport.unwrap_or(config.viewport),
        zoom: cli.zoom.unwrap_or(config.zoom),
        navigation_timeout: cli
            .nav_timeout
            .map(Duration::from_secs)
            .or(config.timeouts.navigation),
        element_timeout: cli
            .wait_timeout
            .map(Duration::from_secs)
            .unwrap_or(config.timeouts.element_wait),
        process_timeout: cli
            .process_timeout
            .map(Duration::from_secs)
            .unwrap_or(config.timeouts.process),
        node_command: config.node_command.clone(),
        convert_command: config.convert_command.clone(),
    })
}

/// Log effective settings to stderr (verbose mode).
pub fn log_effective_settings(config_path: Option<&Path>, settings: &ResolvedSettings) {
    let source = config_path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    let nav = settings
        .navigation_timeout
        .map(|t| format!("{}s", t.as_secs()))
        .unwrap_or_else(|| "browser default".to_string());
    eprintln!(
        "Effective settings [{source}]: url={}, viewport={}, zoom={}, timeouts: nav={}, wait={}s, process={}s, node={}, convert={}",
        settings.url,
        settings.viewport,
        settings.zoom,
        nav,
        settings.element_timeout.as_secs(),
        settings.process_timeout.as_secs(),
        settings.node_command,
        settings.convert_command,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use nextmap_lib::config::Timeouts;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(args)
    }

    #[test]
    fn config_fills_values_the_cli_leaves_out() {
        let config = Config {
            url: "https://www.nextbike.de/de/leipzig/".to_string(),
            zoom: 6,
            node_command: "nodejs".to_string(),
            timeouts: Timeouts {
                navigation: Some(Duration::from_secs(15)),
                element_wait: Duration::from_secs(40),
                process: Duration::from_secs(200),
            },
            ..Config::default()
        };

        let resolved =
            resolve_settings(&cli(&["nextmap", "--out", "map.png"]), &config).unwrap();

        assert_eq!(resolved.url.as_str(), "https://www.nextbike.de/de/leipzig/");
        assert_eq!(resolved.zoom, 6);
        assert_eq!(resolved.node_command, "nodejs");
        assert_eq!(resolved.navigation_timeout, Some(Duration::from_secs(15)));
        assert_eq!(resolved.element_timeout, Duration::from_secs(40));
        assert_eq!(resolved.process_timeout, Duration::from_secs(200));
    }

    #[test]
    fn cli_flags_win_over_config() {
        let config = Config {
            zoom: 6,
            timeouts: Timeouts {
                navigation: Some(Duration::from_secs(15)),
                element_wait: Duration::from_secs(40),
                process: Duration::from_secs(200),
            },
            ..Config::default()
        };

        let resolved = resolve_settings(
            &cli(&[
                "nextmap",
                "--out",
                "map.png",
                "-z",
                "2",
                "--viewport",
                "800x600",
                "--nav-timeout",
                "5",
                "--wait-timeout",
                "10",
                "--process-timeout",
                "60",
            ]),
            &config,
        )
        .unwrap();

        assert_eq!(resolved.zoom, 2);
        assert_eq!(resolved.viewport.width, 800);
        assert_eq!(resolved.navigation_timeout, Some(Duration::from_secs(5)));
        assert_eq!(resolved.element_timeout, Duration::from_secs(10));
        assert_eq!(resolved.process_timeout, Duration::from_secs(60));
    }

    #[test]
    fn defaults_apply_when_neither_side_sets_a_value() {
        let resolved = resolve_settings(
            &cli(&["nextmap", "--out", "map.png"]),
            &Config::default(),
        )
        .unwrap();

        assert_eq!(resolved.url.as_str(), "https://www.nextbike.de/de/dresden/");
        assert_eq!(resolved.viewport.width, 4108);
        assert_eq!(resolved.zoom, 3);
        assert!(resolved.navigation_timeout.is_none());
        assert_eq!(resolved.element_timeout, Duration::from_secs(30));
        assert_eq!(resolved.process_timeout, Duration::from_secs(120));
    }

    #[test]
    fn invalid_url_is_rejected_during_resolution() {
        let result = resolve_settings(
            &cli(&["nextmap", "--out", "map.png", "--url", "not a url"]),
            &Config::default(),
        );
        assert!(result.is_err());
    }
}
