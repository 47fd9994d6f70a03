// # freedns_walkthrough
//
// Walks a live FreeDNS account through every console operation:
// list domains, create a domain, create/update/find a record, read its
// details, delete it, delete the domain. Each step is logged.
//
// ⚠️ This changes the account it runs against. Use a throwaway domain.
//
// ## Configuration
//
// `config.yaml` in the working directory (or the file named by
// `FREEDNS_CONFIG`), overridden by environment variables:
//
// - `AUTH_LOGIN` / `AUTH_PASSWORD`: console credentials
// - `AUTH_COOKIE_VALUE`: session cookie copied from a browser instead
// - `URLS_BASE`: console base URL
// - `FREEDNS_DEMO_DOMAIN`: domain to create and delete (default `kube.ml`)
// - `FREEDNS_DEMO_RECORD`: host part of the demo record (default `xpto`)
// - `FREEDNS_LOG_LEVEL`: trace|debug|info|warn|error (default info)
//
// ## Example
//
// ```bash
// AUTH_LOGIN=you@example.com AUTH_PASSWORD=secret \
//     cargo run -p freedns-demos --bin freedns_walkthrough
// ```

use anyhow::{Context, Result, bail};
use freedns_core::config::DEFAULT_CONFIG_FILE;
use freedns_core::{FreeDnsClient, FreeDnsConfig, RecordForm, Scraped, find_record_ids};
use freedns_transport_reqwest::ReqwestTransport;
use std::env;
use std::process::ExitCode;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the walkthrough
#[derive(Debug, Clone, Copy)]
enum WalkthroughExitCode {
    /// Every step completed
    Success = 0,
    /// Configuration error or startup failure
    ConfigError = 1,
    /// A console operation failed
    RuntimeError = 2,
}

impl From<WalkthroughExitCode> for ExitCode {
    fn from(code: WalkthroughExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Names the walkthrough creates and removes
struct DemoTarget {
    domain: String,
    record: String,
}

impl DemoTarget {
    fn from_env() -> Self {
        Self {
            domain: env::var("FREEDNS_DEMO_DOMAIN").unwrap_or_else(|_| "kube.ml".to_string()),
            record: env::var("FREEDNS_DEMO_RECORD").unwrap_or_else(|_| "xpto".to_string()),
        }
    }

    fn fqdn(&self) -> String {
        format!("{}.{}", self.record, self.domain)
    }
}

fn main() -> ExitCode {
    let log_level = match env::var("FREEDNS_LOG_LEVEL")
        .unwrap_or_default()
        .to_lowercase()
        .as_str()
    {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder().with_max_level(log_level).finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return WalkthroughExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return WalkthroughExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        let config_path = env::var("FREEDNS_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        let config = match load_config(&config_path).await {
            Ok(config) => config,
            Err(e) => {
                error!("Configuration error: {:#}", e);
                return WalkthroughExitCode::ConfigError;
            }
        };

        match run_walkthrough(config, DemoTarget::from_env()).await {
            Ok(()) => {
                info!("Walkthrough finished");
                WalkthroughExitCode::Success
            }
            Err(e) => {
                error!("Walkthrough failed: {:#}", e);
                WalkthroughExitCode::RuntimeError
            }
        }
    })
    .into()
}

async fn load_config(path: &str) -> Result<FreeDnsConfig> {
    let config = FreeDnsConfig::load(path)
        .await
        .with_context(|| format!("loading {}", path))?;
    config.validate()?;
    debug!("Configuration: {:?}", config);
    Ok(config)
}

/// Data of a scraped page, logging the console's banner if it showed one
fn page_data<T>(page: &str, scraped: Scraped<T>) -> T {
    if let Some(ref banner) = scraped.banner {
        warn!("{} page says: {}", page, banner);
    }
    scraped.data
}

async fn run_walkthrough(config: FreeDnsConfig, target: DemoTarget) -> Result<()> {
    let transport = ReqwestTransport::from_config(&config.http)?;
    let client = FreeDnsClient::connect(config, Box::new(transport))
        .await
        .context("authenticating")?;
    info!("Authenticated: {:?}", client.session());

    let domains = page_data("Domain", client.list_domains().await?);
    info!("Account has {} domain(s)", domains.len());
    for domain in domains.domains() {
        debug!("  {} ({})", domain.name, domain.id);
    }

    // An already-owned domain is reported by the console; carry on with it
    if let Err(e) = client.create_domain(&target.domain).await {
        warn!("Unable to create domain {}: {}", target.domain, e);
    }

    let domains = page_data("Domain", client.list_domains().await?);
    let Some(domain_id) = domains.id_of(&target.domain).map(str::to_string) else {
        bail!("domain {} is not on the account", target.domain);
    };
    info!("Domain {} has id {}", target.domain, domain_id);

    let form = RecordForm::new(&target.record, "A", "8.8.8.8").with_ttl("300");
    if let Err(e) = client.create_record(&domain_id, &form).await {
        warn!("Unable to create record {}: {}", target.fqdn(), e);
    }

    let records = page_data("Record", client.list_records(&domain_id).await?);
    let (record_ids, found) = find_record_ids(&records, &target.fqdn());
    if !found {
        bail!("record {} not found after creation", target.fqdn());
    }
    info!("Record {} has id(s) {:?}", target.fqdn(), record_ids);

    let record_id = &record_ids[0];
    let updated = RecordForm::new(&target.record, "A", "8.8.4.4").with_ttl("300");
    client
        .update_record(&domain_id, record_id, &updated)
        .await
        .context("updating record")?;

    let details = page_data("Record edit", client.get_record_details(record_id).await?);
    info!(
        "Record {}: {} {} (ttl {}, wildcard {})",
        details.id, details.fqdn, details.value, details.ttl, details.wildcard
    );

    client
        .delete_record(record_id)
        .await
        .context("deleting record")?;
    let remaining = page_data("Record", client.list_records(&domain_id).await?);
    info!("Domain {} has {} record(s) left", target.domain, remaining.len());

    client
        .delete_domain(&domain_id)
        .await
        .context("deleting domain")?;
    let domains = page_data("Domain", client.list_domains().await?);
    info!("Account has {} domain(s)", domains.len());

    Ok(())
}
