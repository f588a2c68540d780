use std::time::Duration;

use clap::Parser;

use crate::config::Config;
use crate::error::AppError;
use crate::probe::{ChangeCriterion, ProbeOptions, Target};
use crate::runner::{ProbeMode, RunRequest};
use crate::search::SearchFilter;

const EPILOG: &str = "\
If you specify one of the filtering parameters, a filtered search is run, otherwise random hosts are fetched.
--count sets how many hosts to find; a filtered search may return fewer.
Probe only hosts you are authorized to test.";

/// VNC Resolver search and Ctrl+Alt+Del probe
#[derive(Debug, Parser)]
#[command(
    name = "vncrevolver",
    version,
    about = "Find scanned VNC servers and check whether they react to Ctrl+Alt+Del",
    after_help = EPILOG
)]
pub struct Cli {
    /// Filter by client name (case-sensitive)
    #[arg(long)]
    pub clientname: Option<String>,

    /// Filter by ISO 3166-1 alpha-2 country code
    #[arg(long)]
    pub country: Option<String>,

    /// Filter by ASN
    #[arg(long)]
    pub asn: Option<String>,

    /// Number of hosts to find
    #[arg(long, default_value_t = 1)]
    pub count: usize,

    /// Probe hosts with Ctrl+Alt+Del. Without a value, probes the search
    /// results and prints the ones whose screen changed; with a HOST[:PORT]
    /// value, probes only that address.
    #[arg(long, value_name = "HOST[:PORT]")]
    pub check_ctrl_alt_del: Option<Option<String>>,

    /// Also print hosts whose screen did not change
    #[arg(long)]
    pub show_failed: bool,

    /// Delay between the two screenshots, in milliseconds
    #[arg(long, value_name = "MS")]
    pub screen_delay: Option<u64>,

    /// Which screen change counts: every pixel (all) or any pixel (any)
    #[arg(long, value_name = "MODE", default_value = "all")]
    pub change_mode: ChangeCriterion,
}

impl Cli {
    /// Resolve flags against `config` into a run request.
    pub fn into_request(self, config: &Config) -> Result<RunRequest, AppError> {
        let probe = match self.check_ctrl_alt_del {
            None => ProbeMode::Off,
            Some(None) => ProbeMode::SearchResults,
            Some(Some(address)) => ProbeMode::Address(address.parse::<Target>()?),
        };

        let screen_delay = self
            .screen_delay
            .map(Duration::from_millis)
            .unwrap_or(config.screen_delay);

        Ok(RunRequest {
            filter: SearchFilter::new(self.clientname, self.country, self.asn),
            count: self.count,
            probe,
            show_failed: self.show_failed,
            options: ProbeOptions {
                screen_delay,
                criterion: self.change_mode,
            },
        })
    }
}
