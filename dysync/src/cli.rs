use clap::Parser;

use dysync_types::{default_concurrency, AccountCredentials, ItemFilter, SyncConfig};

#[derive(Parser, Debug)]
#[command(
    name = "dysync",
    about = "Copy a DynamoDB table into another account and remove items the source no longer has",
    version = env!("CARGO_PKG_VERSION"),
    author
)]
pub struct Cli {
    #[arg(help = "Table to synchronize (same name on both sides)")]
    pub table: Option<String>,

    #[arg(long, env = "AWS_REGION", help = "Source region")]
    pub src_region: Option<String>,

    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true, help = "Source access key")]
    pub src_key: Option<String>,

    #[arg(
        long,
        env = "AWS_SECRET_ACCESS_KEY",
        hide_env_values = true,
        help = "Source secret key"
    )]
    pub src_secret: Option<String>,

    #[arg(long, env = "ROLE_ARN", help = "Role to assume for the source account")]
    pub src_rolearn: Option<String>,

    #[arg(long, help = "Endpoint override for the source (e.g. DynamoDB Local)")]
    pub src_endpoint: Option<String>,

    #[arg(long, env = "AWS_REGION", help = "Destination region")]
    pub dst_region: Option<String>,

    #[arg(long, help = "Destination access key")]
    pub dst_key: Option<String>,

    #[arg(long, help = "Destination secret key")]
    pub dst_secret: Option<String>,

    #[arg(long, help = "Role to assume for the destination account")]
    pub dst_rolearn: Option<String>,

    #[arg(long, help = "Endpoint override for the destination")]
    pub dst_endpoint: Option<String>,

    #[arg(long, help = "Only sync items with this hash key (implies --copy-only)")]
    pub id: Option<String>,

    #[arg(long, help = "Only sync items with this range key (implies --copy-only)")]
    pub sk: Option<String>,

    #[arg(long, help = "Copy items but never delete from the destination")]
    pub copy_only: bool,

    #[arg(long, default_value_t = default_concurrency(), help = "Number of concurrent writers")]
    pub concurrent: usize,

    #[arg(long, help = "Log what would change without writing or deleting")]
    pub dryrun: bool,

    #[arg(long, help = "Print the final report as JSON")]
    pub json: bool,

    #[arg(short, long, env = "RUST_LOG", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Run configuration described by the parsed flags. Nothing is validated
    /// here; `SyncConfig::plan` does that.
    pub fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            table: self.table.clone().unwrap_or_default(),
            source: AccountCredentials {
                region: self.src_region.clone(),
                access_key_id: self.src_key.clone(),
                secret_access_key: self.src_secret.clone(),
                role_arn: self.src_rolearn.clone(),
                endpoint_url: self.src_endpoint.clone(),
            },
            destination: AccountCredentials {
                region: self.dst_region.clone(),
                access_key_id: self.dst_key.clone(),
                secret_access_key: self.dst_secret.clone(),
                role_arn: self.dst_rolearn.clone(),
                endpoint_url: self.dst_endpoint.clone(),
            },
            filter: ItemFilter::new(self.id.clone(), self.sk.clone()),
            copy_only: self.copy_only,
            concurrency: self.concurrent,
            dry_run: self.dryrun,
        }
    }
}
