use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the quire binary.
#[derive(Debug, Parser)]
#[command(name = "quire", version, about = "Read a headless-CMS blog from the terminal")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "QUIRE_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// List posts, optionally filtered by tags, category or title.
    Posts(PostsArgs),
    /// Show one post by slug.
    Post(PostArgs),
    /// Show an author and their posts.
    Author(AuthorArgs),
    /// List categories in display order.
    Categories,
}

#[derive(Debug, Args, Default, Clone)]
pub struct PostsArgs {
    /// Only posts carrying one of these tags (repeatable).
    #[arg(long = "tag", value_name = "TAG", conflicts_with_all = ["search", "category_id"])]
    pub tags: Vec<String>,

    /// Title search; a blank query lists everything.
    #[arg(long, value_name = "QUERY", conflicts_with = "category_id")]
    pub search: Option<String>,

    /// Only posts in this category.
    #[arg(long = "category-id", value_name = "ID")]
    pub category_id: Option<i64>,

    /// Number of listing pages to show.
    #[arg(long, value_name = "COUNT", default_value_t = 1)]
    pub pages: usize,
}

#[derive(Debug, Args, Clone)]
pub struct PostArgs {
    pub slug: String,

    /// Print the heading outline instead of the post.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub outline: bool,
}

#[derive(Debug, Args, Clone)]
pub struct AuthorArgs {
    pub slug: String,

    /// Narrow the author's posts to these tags (repeatable).
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,
}

#[derive(Debug, Args, Default, Clone)]
pub struct Overrides {
    /// Override the CMS base URL.
    #[arg(long = "cms-url", value_name = "URL", value_hint = ValueHint::Url, global = true)]
    pub cms_url: Option<String>,

    /// Override the per-request timeout.
    #[arg(long = "timeout-seconds", value_name = "SECONDS", global = true)]
    pub timeout_seconds: Option<u64>,

    /// Override the listing page size.
    #[arg(long = "page-size", value_name = "COUNT", global = true)]
    pub page_size: Option<u64>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}
