use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::{debug, info};

use schema_infer::{
    analyze, fetch_document_blocking, rank_patterns, FetchOptions, FieldType, HtmlDocument,
    InferOptions, Reporter,
};

#[derive(Parser)]
#[command(
    name = "infer-schema",
    about = "Infer a repeated-item extraction schema from a web page"
)]
struct Cli {
    /// Page URL to fetch (static HTML, no JavaScript)
    url: Option<String>,

    /// Read HTML from a local file instead of fetching
    #[arg(short, long, conflicts_with = "url")]
    file: Option<PathBuf>,

    /// URL recorded in the schema when reading from --file
    #[arg(long, requires = "file")]
    base_url: Option<String>,

    /// Write the schema JSON here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Use this container selector instead of mining
    #[arg(short, long)]
    container: Option<String>,

    /// Minimum number of repeated items for a pattern
    #[arg(long, default_value_t = 3)]
    min_items: usize,

    /// Discard patterns deeper than this
    #[arg(long)]
    max_depth: Option<usize>,

    /// Exclude elements inside this selector (repeatable)
    #[arg(short = 'x', long = "exclude")]
    exclude: Vec<String>,

    /// Exclude nav, header, footer and other navigation landmarks
    #[arg(long)]
    ignore_nav: bool,

    /// Minimum element children for a pattern member
    #[arg(long, default_value_t = 0)]
    min_children: usize,

    /// Minimum trimmed text length for a pattern member
    #[arg(long, default_value_t = 0)]
    min_text_length: usize,

    /// Favour table rows when scoring
    #[arg(long)]
    prefer_table: bool,

    /// Keep only these field types (comma separated: text,href,url,number,date,price)
    #[arg(long, value_delimiter = ',')]
    fields: Vec<String>,

    /// Record empty values as samples
    #[arg(long)]
    include_empty: bool,

    /// Minimum per-field confidence
    #[arg(long, default_value_t = 0.7)]
    confidence: f64,

    /// Containers sampled for field extraction
    #[arg(long, default_value_t = 5)]
    samples: usize,

    /// Print the ranked candidate list and exit
    #[arg(long)]
    list_patterns: bool,

    /// Print score breakdowns
    #[arg(long)]
    debug: bool,

    /// Only print errors and the schema
    #[arg(short, long)]
    quiet: bool,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// User agent for the request
    #[arg(long)]
    user_agent: Option<String>,
}

fn parse_field_type(name: &str) -> anyhow::Result<FieldType> {
    serde_json::from_value(serde_json::Value::String(name.trim().to_lowercase()))
        .with_context(|| format!("unknown field type `{}`", name))
}

impl Cli {
    fn infer_options(&self) -> anyhow::Result<InferOptions> {
        let field_types = if self.fields.is_empty() {
            None
        } else {
            Some(
                self.fields
                    .iter()
                    .map(|f| parse_field_type(f))
                    .collect::<anyhow::Result<Vec<_>>>()?,
            )
        };

        Ok(InferOptions {
            min_items: self.min_items,
            max_depth: self.max_depth,
            container_selector: self.container.clone(),
            exclude_selectors: self.exclude.clone(),
            ignore_nav: self.ignore_nav,
            min_children: self.min_children,
            min_text_length: self.min_text_length,
            prefer_table: self.prefer_table,
            field_types,
            include_empty: self.include_empty,
            confidence_threshold: self.confidence,
            sample_size: self.samples,
            debug: self.debug,
            list_patterns: self.list_patterns,
        })
    }

    fn load_document(&self) -> anyhow::Result<HtmlDocument> {
        if let Some(path) = &self.file {
            let html = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let url = self.base_url.clone().unwrap_or_default();
            return Ok(HtmlDocument::parse(url, &html));
        }

        let Some(url) = &self.url else {
            bail!("pass a URL or --file <path>");
        };
        let mut fetch = FetchOptions {
            timeout_secs: self.timeout,
            ..Default::default()
        };
        if let Some(ua) = &self.user_agent {
            fetch.user_agent = ua.clone();
        }
        Ok(fetch_document_blocking(url, &fetch)?)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.quiet { "warn" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .init();

    let options = cli.infer_options()?;
    let mut reporter = Reporter::stderr(cli.quiet).with_debug(cli.debug);

    reporter.status("Loading page...")?;
    let doc = cli.load_document()?;
    info!(url = %doc_url(&cli), "document loaded");

    if cli.list_patterns && options.container_selector.is_none() {
        let patterns = rank_patterns(&doc, &options)?;
        reporter.pattern_table(&patterns)?;
        return Ok(());
    }

    let analysis = analyze(&doc, &options)?;
    debug!(selected = %analysis.selected.selector, "pattern selected");
    if reporter.is_debug() {
        reporter.pattern_table(std::slice::from_ref(&analysis.selected))?;
    }
    if !reporter.is_quiet() {
        reporter.schema_summary(&analysis.schema)?;
    }

    let json = analysis.schema.to_json_pretty()?;
    match &cli.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "schema written");
        }
        None => println!("{}", json),
    }

    Ok(())
}

fn doc_url(cli: &Cli) -> String {
    match (&cli.url, &cli.file) {
        (Some(url), _) => url.clone(),
        (None, Some(path)) => path.display().to_string(),
        (None, None) => String::new(),
    }
}
