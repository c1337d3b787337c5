//! HTTP adapter for the headless CMS.

pub mod assets;
pub mod normalize;

use std::time::Duration;

use async_trait::async_trait;
use quire_api_types::{Payload, error_message};
use reqwest::{Client, Response, Url};
use serde_json::Value;
use tracing::debug;

use crate::application::error::FetchError;
use crate::application::source::{ContentSource, PostQuery, SlugRoute};
use crate::domain::entities::{Category, Post};
use crate::infra::error::InfraError;

const AUTHOR_SLUG_FILTER: &str = "filters[blog_author][slug][$eq]";

#[derive(Clone, Debug)]
pub struct CmsClient {
    client: Client,
    base: Url,
}

impl CmsClient {
    pub fn new(base: Url, timeout: Duration) -> Result<Self, InfraError> {
        if base.cannot_be_a_base() {
            return Err(InfraError::configuration(format!(
                "CMS URL `{base}` cannot carry paths"
            )));
        }
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(timeout)
            .build()?;
        Ok(Self { client, base })
    }

    pub fn user_agent() -> &'static str {
        concat!("quire/", env!("CARGO_PKG_VERSION"))
    }

    /// Origin media paths are resolved against.
    pub fn origin(&self) -> &Url {
        &self.base
    }

    fn url(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|()| FetchError::InvalidInput(format!("invalid CMS URL `{}`", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn posts_url(&self, query: &PostQuery) -> Result<Url, FetchError> {
        let id_segment;
        let (segments, params): (Vec<&str>, Vec<(&str, String)>) = match query {
            PostQuery::All => (vec!["api", "blogs"], Vec::new()),
            PostQuery::Category(id) => {
                id_segment = id.to_string();
                (vec!["api", "blogs", "category", id_segment.as_str()], Vec::new())
            }
            PostQuery::AuthorId(id) => {
                id_segment = id.to_string();
                (vec!["api", "blogs", "author", id_segment.as_str()], Vec::new())
            }
            PostQuery::AuthorSlug { slug, tags } => {
                let mut params = vec![(AUTHOR_SLUG_FILTER, slug.clone())];
                if !tags.is_empty() {
                    params.push(("tags", tags.join(",")));
                }
                (vec!["api", "blogs"], params)
            }
            PostQuery::Tags(tags) => (vec!["api", "blogs"], vec![("tags", tags.join(","))]),
            PostQuery::Title(title) => (vec!["api", "blogs"], vec![("title", title.clone())]),
        };

        let mut url = self.url(&segments)?;
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Payload, FetchError> {
        debug!(%url, "GET");
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::network)?;
        Self::handle(resp).await
    }

    async fn handle(resp: Response) -> Result<Payload, FetchError> {
        let status = resp.status();
        let bytes = resp.bytes().await.map_err(FetchError::network)?;
        if !status.is_success() {
            let message = serde_json::from_slice::<Value>(&bytes)
                .ok()
                .as_ref()
                .and_then(error_message);
            return Err(FetchError::Server {
                status: status.as_u16(),
                message,
            });
        }
        let body: Value = serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::malformed(format!("failed to parse body: {err}")))?;
        Ok(Payload::from_body(body))
    }
}

#[async_trait]
impl ContentSource for CmsClient {
    async fn posts(&self, query: &PostQuery) -> Result<Vec<Post>, FetchError> {
        let url = self.posts_url(query)?;
        Ok(normalize::posts(self.get(url).await?))
    }

    async fn categories(&self) -> Result<Vec<Category>, FetchError> {
        let url = self.url(&["api", "blog-categories"])?;
        Ok(normalize::categories(self.get(url).await?))
    }

    async fn post(&self, slug: &str, route: SlugRoute) -> Result<Option<Post>, FetchError> {
        let url = match route {
            SlugRoute::Primary => self.url(&["api", "blogs", "slug", slug])?,
            SlugRoute::Direct => self.url(&["api", "blogs", slug])?,
        };
        normalize::single_post(self.get(url).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::MockServer;

    fn client(server: &MockServer) -> CmsClient {
        let base = Url::parse(&server.base_url()).expect("base url");
        CmsClient::new(base, Duration::from_secs(5)).expect("client")
    }

    fn cms() -> CmsClient {
        let base = Url::parse("http://cms.local:1337/").expect("base url");
        CmsClient::new(base, Duration::from_secs(5)).expect("client")
    }

    #[test]
    fn query_shapes_map_to_routes() {
        let cms = cms();
        let url = |query: PostQuery| cms.posts_url(&query).expect("url").to_string();

        assert_eq!(url(PostQuery::All), "http://cms.local:1337/api/blogs");
        assert_eq!(
            url(PostQuery::Category(4)),
            "http://cms.local:1337/api/blogs/category/4"
        );
        assert_eq!(
            url(PostQuery::AuthorId(2)),
            "http://cms.local:1337/api/blogs/author/2"
        );
        assert_eq!(
            url(PostQuery::Tags(vec!["rust".into(), "web".into()])),
            "http://cms.local:1337/api/blogs?tags=rust%2Cweb"
        );
        assert_eq!(
            url(PostQuery::Title("async & await".into())),
            "http://cms.local:1337/api/blogs?title=async+%26+await"
        );
        assert_eq!(
            url(PostQuery::AuthorSlug {
                slug: "ada".into(),
                tags: vec!["rust".into()]
            }),
            "http://cms.local:1337/api/blogs?filters%5Bblog_author%5D%5Bslug%5D%5B%24eq%5D=ada&tags=rust"
        );
    }

    #[test]
    fn base_path_is_preserved_and_slugs_are_escaped() {
        let base = Url::parse("http://cms.local/cms/").expect("base");
        let cms = CmsClient::new(base, Duration::from_secs(1)).expect("client");
        let url = cms.url(&["api", "blogs", "a/b"]).expect("url");
        assert_eq!(url.as_str(), "http://cms.local/cms/api/blogs/a%2Fb");
    }

    #[tokio::test]
    async fn lists_posts_from_enveloped_body() -> Result<(), FetchError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET").path("/api/blogs").query_param("title", "hello world");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"data":[{"id":1,"attributes":{"title":"Hello world","slug":"hello-world"}}]}"#);
        });

        let posts = client(&server)
            .posts(&PostQuery::Title("hello world".into()))
            .await?;
        mock.assert();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "hello-world");
        Ok(())
    }

    #[tokio::test]
    async fn author_filter_hits_list_endpoint() -> Result<(), FetchError> {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method("GET")
                .path("/api/blogs")
                .query_param("filters[blog_author][slug][$eq]", "ada")
                .query_param("tags", "rust,web");
            then.status(200)
                .header("content-type", "application/json")
                .body("[]");
        });

        let posts = client(&server)
            .posts(&PostQuery::AuthorSlug {
                slug: "ada".into(),
                tags: vec!["rust".into(), "web".into()],
            })
            .await?;
        mock.assert();
        assert!(posts.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn server_error_message_is_surfaced() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/api/blog-categories");
            then.status(500)
                .header("content-type", "application/json")
                .body(r#"{"data":null,"error":{"status":500,"message":"Database offline"}}"#);
        });

        let err = client(&server).categories().await.expect_err("server error");
        assert_eq!(
            err,
            FetchError::Server {
                status: 500,
                message: Some("Database offline".into())
            }
        );
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method("GET").path("/api/blogs");
            then.status(200).body("<html>");
        });

        let err = client(&server)
            .posts(&PostQuery::All)
            .await
            .expect_err("malformed");
        assert!(matches!(err, FetchError::Malformed(_)));
    }

    #[tokio::test]
    async fn slug_routes_use_distinct_paths() -> Result<(), FetchError> {
        let server = MockServer::start();
        let primary = server.mock(|when, then| {
            when.method("GET").path("/api/blogs/slug/intro");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"data":null}"#);
        });
        let direct = server.mock(|when, then| {
            when.method("GET").path("/api/blogs/intro");
            then.status(200)
                .header("content-type", "application/json")
                .body(r#"{"id":3,"title":"Intro","slug":"intro"}"#);
        });

        let cms = client(&server);
        assert_eq!(cms.post("intro", SlugRoute::Primary).await?, None);
        let post = cms.post("intro", SlugRoute::Direct).await?.expect("post");
        primary.assert();
        direct.assert();
        assert_eq!(post.id, Some(3));
        Ok(())
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let base = Url::parse("http://127.0.0.1:9/").expect("base");
        let cms = CmsClient::new(base, Duration::from_secs(2)).expect("client");
        let err = cms.categories().await.expect_err("refused");
        assert!(matches!(err, FetchError::Network(_)));
    }
}
