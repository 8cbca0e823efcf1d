use anyhow::Context as _;

/// Filter applied when `RUST_LOG` is unset. HTTP internals stay quiet so the
/// upload status lines on stdout are not drowned out.
const DEFAULT_FILTER: &str = "info,hyper_util=warn,reqwest=warn";

/// Installs a stderr subscriber; stdout is reserved for export status lines.
pub fn init() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(DEFAULT_FILTER))
        .context("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
