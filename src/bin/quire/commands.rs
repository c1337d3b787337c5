#![deny(clippy::all, clippy::pedantic)]

use quire::application::blog::BlogService;
use quire::application::error::{FetchError, Operation};
use quire::application::pages::{AuthorPage, DetailPage, ListingPage};
use quire::config::{AuthorArgs, PostArgs, PostsArgs, ReaderSettings};
use tracing::info;
use url::Url;

use crate::CliError;
use crate::print::{
    AuthorCard, AuthorProfile, CategoryEntry, Listing, OutlineEntry, PostCard, PostPage,
    print_json,
};

/// Everything a command needs to talk to the CMS.
pub struct Reader {
    pub service: BlogService,
    pub origin: Url,
    pub settings: ReaderSettings,
}

fn failed(operation: Operation) -> impl FnOnce(FetchError) -> CliError {
    move |err| CliError::Fetch(err.user_message(operation))
}

pub async fn posts(reader: &Reader, args: PostsArgs) -> Result<(), CliError> {
    let mut page = ListingPage::new(reader.service.clone(), reader.settings.page_size);

    if let Some(category) = args.category_id {
        reader
            .service
            .list_posts_by_category(category)
            .await
            .map_err(failed(Operation::PostsByCategory))?;
    } else if let Some(query) = args.search {
        page.set_query(query);
        page.search().await.map_err(failed(Operation::SearchPosts))?;
    } else {
        page.set_categories(&args.tags)
            .await
            .map_err(failed(Operation::PostsByTags))?;
    }

    for _ in 1..args.pages.max(1) {
        page.load_more();
    }

    let posts: Vec<PostCard> = page
        .visible_posts()
        .iter()
        .map(|post| PostCard::new(&reader.origin, post))
        .collect();
    info!(count = posts.len(), "listing ready");

    let message = posts.is_empty().then(|| page.empty_message());
    print_json(&Listing {
        has_more: page.has_more(),
        posts,
        message,
    })
}

pub async fn post(reader: &Reader, args: PostArgs) -> Result<(), CliError> {
    let page = DetailPage::new(reader.service.clone(), args.slug);
    let post = page.open().await.map_err(failed(Operation::PostBySlug))?;

    if args.outline {
        let outline: Vec<OutlineEntry> = page.outline().into_iter().map(Into::into).collect();
        return print_json(&outline);
    }
    print_json(&PostPage::new(&reader.origin, &post))
}

pub async fn author(reader: &Reader, args: AuthorArgs) -> Result<(), CliError> {
    let mut page = AuthorPage::new(
        reader.service.clone(),
        args.slug,
        reader.settings.redirect_delay,
    )
    .with_tags(args.tags);
    let posts = page.open().await.map_err(failed(Operation::PostsByAuthor))?;

    print_json(&AuthorProfile {
        author: page
            .author()
            .map(|author| AuthorCard::new(&reader.origin, author)),
        posts: posts
            .iter()
            .map(|post| PostCard::new(&reader.origin, post))
            .collect(),
    })
}

pub async fn categories(reader: &Reader) -> Result<(), CliError> {
    let categories: Vec<CategoryEntry> = reader
        .service
        .list_categories()
        .await
        .map_err(failed(Operation::ListCategories))?
        .into_iter()
        .map(Into::into)
        .collect();
    print_json(&categories)
}
