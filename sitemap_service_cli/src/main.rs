use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use sitemap_service_cli::{
    logging, utils, GroupingPolicy, SitemapFetcher, SitemapGenerator, SitemapStore,
    SubsetRequest,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Sitemap URL to fetch
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Local sitemap XML file
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Maximum number of URLs kept per group
    #[arg(short = 'n', long, allow_negative_numbers = true)]
    subset_size: i64,

    /// How URLs are grouped
    #[arg(short, long, value_enum, default_value_t = GroupingPolicy::Prefix)]
    grouping: GroupingPolicy,

    /// Directory the generated sitemap is written to
    #[arg(short, long, env = "SITEMAP_DIR")]
    output_dir: Option<PathBuf>,

    /// Also write the JSON report to this path
    #[arg(short, long)]
    report: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    logging::init_logging();

    let args = Args::parse();

    let content = match &args.file {
        Some(path) => Some(
            tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?,
        ),
        None => None,
    };
    let request =
        SubsetRequest::from_parts(args.url.as_deref(), content.as_deref(), args.subset_size)?;

    let store = SitemapStore::new(args.output_dir.unwrap_or_else(SitemapStore::default_dir));
    let generator = SitemapGenerator::new(SitemapFetcher::new()?, store, args.grouping);

    let report = generator.generate(&request).await?;
    let path = generator.store().path_for(&report.sitemap_id);

    println!(
        "Kept {} of {} URLs ({} grouping)",
        report.subset_size,
        report.total_urls,
        generator.policy()
    );
    println!("Sitemap id: {}", report.sitemap_id);
    println!("Written to: {}", path.display());

    if let Some(report_path) = &args.report {
        utils::save_json(&report, report_path)?;
    }

    Ok(())
}
