use std::collections::BTreeMap;
use std::ffi::OsString;
use std::io::Write as _;
use std::path::Path;
use std::time::Duration;

use clap::{CommandFactory, FromArgMatches};
use moya::args::MoyaArgs;
use moya::config::types::ConfigFile;
use moya::config::{ConfigTarget, DEFAULT_CONFIG_FILES, load_config};
use moya::error::{AppError, AppResult, ConfigError, ValidationError};
use moya::plugin::{AccessTokenPlugin, LoggerConfiguration, NetworkLoggerPlugin};
use moya::{MoyaProvider, delayed_stub, immediately_stub};

pub(crate) fn run() -> AppResult<()> {
    let Some(args) = parse_args()? else {
        return Ok(());
    };

    crate::logger::init_logging(args.verbose, args.no_color);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(run_async(args))
}

fn parse_args() -> AppResult<Option<MoyaArgs>> {
    let mut cmd = MoyaArgs::command();
    let raw_args: Vec<OsString> = std::env::args_os().collect();

    if should_show_help(&raw_args) {
        cmd.print_help()?;
        println!();
        return Ok(None);
    }

    let matches = cmd.get_matches_from(raw_args);
    Ok(Some(MoyaArgs::from_arg_matches(&matches)?))
}

fn should_show_help(raw_args: &[OsString]) -> bool {
    let treat_as_empty =
        matches!(raw_args, [] | [_]) || matches!(raw_args, [_, second] if second == "--");
    if !treat_as_empty {
        return false;
    }

    !DEFAULT_CONFIG_FILES
        .iter()
        .any(|path| Path::new(path).exists())
}

async fn run_async(args: MoyaArgs) -> AppResult<()> {
    let config = load_config(args.config.as_deref())?
        .ok_or_else(|| AppError::config(ConfigError::MissingConfig))?;

    if args.list {
        print_routes(&config)?;
        return Ok(());
    }

    let route = args.route.as_deref().ok_or_else(|| {
        tracing::error!("Missing route (pass a route name or use --list).");
        AppError::validation(ValidationError::MissingRoute)
    })?;
    let vars: BTreeMap<String, String> = args.vars.iter().cloned().collect();
    let target = ConfigTarget::from_config(
        &config,
        route,
        &vars,
        args.base_url.as_deref(),
        &args.headers,
    )?;

    let provider = build_provider(&args)?;
    let response = provider.request(target).await?;
    tracing::info!("{} {}", route, response);

    let mut stdout = std::io::stdout().lock();
    stdout.write_all(&response.data)?;
    if !response.data.is_empty() && !response.data.ends_with(b"\n") {
        writeln!(stdout)?;
    }
    stdout.flush()?;
    Ok(())
}

fn build_provider(args: &MoyaArgs) -> AppResult<MoyaProvider<ConfigTarget>> {
    let mut builder = MoyaProvider::builder();

    if args.verbose || args.log_body {
        let configuration = if args.log_body {
            LoggerConfiguration::verbose()
        } else {
            LoggerConfiguration::default()
        };
        builder = builder.plugin(NetworkLoggerPlugin::new(configuration));
    }
    if let Some(token) = args.token.clone() {
        builder = builder.plugin(AccessTokenPlugin::new(move |_kind| token.clone()));
    }
    if args.stub {
        builder = match args.stub_delay_ms {
            Some(delay) => builder.stub_closure(delayed_stub(Duration::from_millis(delay))),
            None => builder.stub_closure(immediately_stub),
        };
    }

    Ok(builder.build()?)
}

fn print_routes(config: &ConfigFile) -> AppResult<()> {
    let mut stdout = std::io::stdout().lock();
    for (name, route) in &config.routes {
        match &route.description {
            Some(description) => writeln!(
                stdout,
                "{}\t{} {}\t{}",
                name, route.method, route.path, description
            )?,
            None => writeln!(stdout, "{}\t{} {}", name, route.method, route.path)?,
        }
    }
    Ok(())
}
