use std::process::ExitCode;
use std::sync::Arc;

use nextmap_lib::{
    run_snapshot, AnnotateOptions, Config, SessionOptions, SnapError, SnapshotOptions,
};

use crate::cli::Cli;
use crate::settings::{log_effective_settings, resolve_settings};

/// Run the snapshot command.
pub async fn run(cli: Cli) -> ExitCode {
    let config = match Config::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(err) => return render_error(err),
    };
    let settings = match resolve_settings(&cli, &config) {
        Ok(s) => s,
        Err(err) => return render_error(err),
    };

    if cli.verbose {
        log_effective_settings(cli.config.as_deref(), &settings);
    }
    let progress: Option<Arc<dyn Fn(&str) + Send + Sync>> = if cli.verbose {
        Some(Arc::new(|msg: &str| eprintln!("{msg}")))
    } else {
        None
    };

    let options = SnapshotOptions {
        url: settings.url.clone(),
        out: cli.out.clone(),
        zoom: settings.zoom,
        session: SessionOptions {
            node_command: settings.node_command.clone(),
            viewport: settings.viewport,
            headless: !cli.no_headless,
            minimize: cli.minimize,
            navigation_timeout: settings.navigation_timeout,
            element_timeout: settings.element_timeout,
            process_timeout: settings.process_timeout,
            progress: None,
        },
        annotate: AnnotateOptions {
            command: settings.convert_command.clone(),
            ..AnnotateOptions::default()
        },
        keep_profile: cli.keep_profile,
        progress,
    };

    match run_snapshot(options).await {
        Ok(report) => {
            if let Some(dir) = &report.profile_dir {
                eprintln!("profile kept at {}", dir.display());
            }
            if cli.verbose {
                eprintln!(
                    "Wrote {} ({}x{}, {} zoom clicks, cookie banner {})",
                    report.out.display(),
                    report.width,
                    report.height,
                    report.zoom_clicks,
                    if report.cookie_declined {
                        "declined"
                    } else {
                        "absent"
                    }
                );
            }
            ExitCode::SUCCESS
        }
        Err(err) => render_error(err),
    }
}

fn render_error(err: SnapError) -> ExitCode {
    eprintln!("nextmap: {err}");
    if let Some(hint) = err.remediation() {
        eprintln!("hint: {hint}");
    }
    ExitCode::FAILURE
}
