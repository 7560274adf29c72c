//! Record discovery for `--setup`
//!
//! Non-interactive rendition of first-run setup: every A record the
//! credentials can see becomes a managed record. Operators who want a
//! subset edit the saved config afterwards; the file is written to be
//! hand-edited.

use tracing::info;
use zoneup_core::traits::DnsProvider;
use zoneup_core::{Config, Domain, Result};

/// Replace `config.domains` with everything the provider account
/// currently serves: each zone, with its A records in listing order
/// (already de-duplicated by the client). Zones without A records are
/// kept with an empty record list so they show up in the file.
pub async fn adopt_all_records(provider: &dyn DnsProvider, mut config: Config) -> Result<Config> {
    let summaries = provider.list_domains().await?;
    info!(domains = summaries.len(), "domain listing fetched");

    let mut domains = Vec::with_capacity(summaries.len());
    for summary in summaries {
        let records = provider.list_records(&summary.name, "A").await?;
        info!(
            domain = %summary.name,
            records = records.len(),
            "adopting A records"
        );
        domains.push(Domain {
            name: summary.name,
            records,
        });
    }

    config.domains = domains;
    Ok(config)
}
