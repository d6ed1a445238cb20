use crate::auth::CredentialStore;
use crate::content::ContentValue;
use crate::document::{self, Element};
use crate::error::ProtocolError;
use crate::executor::{HttpResponse, RequestExecutor, SignedRequest};
use crate::protocol::atom::version::category_from_terms;
use crate::protocol::atom::{AtomProfile, AtomVersion};
use crate::protocol::{
    BlogInfo, BlogPost, Category, PostResult, ProtocolCapabilities, ProtocolClient,
};

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use log::debug;
use reqwest::Method;
use reqwest::header::HeaderName;
use url::Url;
use uuid::Uuid;

const ATOM_ACCEPT: &str = "application/atom+xml, application/atomsvc+xml, application/xml";
const ENTRY_CONTENT_TYPE: &str = "application/atom+xml;type=entry";
const SLUG_HEADER: HeaderName = HeaderName::from_static("slug");

/// Atom Publishing Protocol client; dialect and auth come from the profile.
pub struct AtomClient {
    profile: Box<dyn AtomProfile>,
    service_url: Url,
    executor: RequestExecutor,
    credentials: Arc<dyn CredentialStore>,
}

impl AtomClient {
    pub fn new(
        profile: Box<dyn AtomProfile>,
        service_url: Url,
        executor: RequestExecutor,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            profile,
            service_url,
            executor,
            credentials,
        }
    }

    fn version(&self) -> AtomVersion {
        self.profile.version()
    }

    fn request(&self, method: Method) -> Result<SignedRequest, ProtocolError> {
        let credentials = self.credentials.credentials()?;
        Ok(SignedRequest::new(method, self.profile.signer(), credentials).with_accept(ATOM_ACCEPT))
    }

    async fn send(&self, uri: &Url, request: SignedRequest) -> Result<HttpResponse, ProtocolError> {
        let response = self.executor.execute(uri, |hop| request.build(hop)).await?;
        Ok(response)
    }

    /// GET `uri` and parse the body; non-2xx and malformed XML are errors.
    async fn get_document(&self, uri: &Url) -> Result<(Element, HttpResponse), ProtocolError> {
        let response = self.send(uri, self.request(Method::GET)?).await?;
        let root = parse_success(uri, &response)?;
        Ok((root, response))
    }

    fn build_entry(&self, post: &BlogPost, is_new: bool) -> Result<Element, ProtocolError> {
        let version = self.version();
        let atom = version.namespace();
        let capabilities = self.profile.capabilities();
        let mut entry = Element::in_ns(atom, "entry");

        if is_new {
            entry.push(
                Element::in_ns(atom, "id").with_text(format!("urn:uuid:{}", Uuid::new_v4())),
            );
        }
        entry.push(Element::in_ns(atom, "title").with_text(post.title.as_str()));
        entry.push(Element::in_ns(atom, version.updated_element()).with_text(rfc3339(Utc::now())));

        if capabilities.supports_custom_date
            && let Some(published) = post.date_published
        {
            entry.push(
                Element::in_ns(atom, version.published_element()).with_text(rfc3339(published)),
            );
        }

        if capabilities.supports_excerpt
            && let Some(excerpt) = post.excerpt.as_deref().filter(|e| !e.is_empty())
        {
            entry.push(Element::in_ns(atom, "summary").with_text(excerpt));
        }

        let html = post.contents.to_html().unwrap_or_default();
        entry.push(version.html_content(&html));

        if capabilities.supports_categories {
            let scheme = self.profile.category_scheme();
            let limit = if capabilities.supports_multiple_categories {
                usize::MAX
            } else {
                1
            };
            for category in post.categories.iter().take(limit) {
                entry.push(version.category_element(&category.id, scheme, &category.name));
            }
        }

        if !post.publish {
            if !capabilities.supports_post_as_draft {
                return Err(ProtocolError::unsupported(self.profile.name(), "post_as_draft"));
            }
            let control = version.control_namespace();
            entry.push(
                Element::in_ns(control, "control")
                    .with_child(Element::in_ns(control, "draft").with_text("yes")),
            );
        }

        self.profile.decorate_entry(&mut entry, post);
        Ok(entry)
    }

    fn parse_entry(&self, entry: &Element, base: &Url) -> Result<BlogPost, ProtocolError> {
        let version = self.version();
        let atom = version.namespace();

        let text_of = |name: &str| -> Result<Option<ContentValue>, ProtocolError> {
            match entry.child(atom, name) {
                Some(element) => Ok(Some(version.text_value(element)?)),
                None => Ok(None),
            }
        };

        let title = text_of("title")?
            .and_then(|t| t.to_text())
            .unwrap_or_default();
        let contents = text_of("content")?.unwrap_or_else(|| ContentValue::html(""));
        let excerpt = text_of("summary")?
            .and_then(|s| s.to_text())
            .filter(|s| !s.is_empty());

        let date_published = entry
            .child_text(atom, version.published_element())
            .and_then(|value| DateTime::parse_from_rfc3339(&value).ok())
            .map(|date| date.with_timezone(&Utc));

        let is_draft = entry
            .child(version.control_namespace(), "control")
            .and_then(|c| c.child_text(version.control_namespace(), "draft"))
            .is_some_and(|draft| draft.eq_ignore_ascii_case("yes"));

        let mut post = BlogPost::new(title, contents);
        post.id = link_href(entry, atom, "edit", base, |_| true);
        post.permalink = link_href(entry, atom, "alternate", base, |mime| {
            mime.is_none_or(|m| m == "text/html")
        });
        post.excerpt = excerpt;
        post.categories = version.extract_categories(entry, self.profile.category_scheme());
        post.date_published = date_published;
        post.publish = !is_draft;
        Ok(post)
    }

    /// Homepage announced by a collection feed, or empty.
    async fn feed_homepage(&self, feed_url: &Url) -> Result<String, ProtocolError> {
        let (feed, response) = self.get_document(feed_url).await?;
        Ok(homepage_link(&feed, self.version().namespace(), response.url()).unwrap_or_default())
    }

    fn workspace_title(&self, element: &Element) -> Result<Option<String>, ProtocolError> {
        let version = self.version();
        match element.child(version.namespace(), "title") {
            Some(title) => Ok(version
                .text_value(title)?
                .to_text()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())),
            None => Ok(None),
        }
    }

    /// Walk `app:categories` blocks, fetching out-of-line documents once each.
    async fn collect_categories(
        &self,
        collection: &Element,
        base: &Url,
    ) -> Result<Vec<Category>, ProtocolError> {
        let version = self.version();
        let app = version.service_namespace();
        let atom = version.namespace();
        let wanted = self.profile.category_scheme().unwrap_or_default();

        let mut pending: VecDeque<(Element, Url)> = collection
            .children_named(app, "categories")
            .map(|c| (c.clone(), base.clone()))
            .collect();
        let mut visited: HashSet<Url> = HashSet::new();
        let mut categories = Vec::new();

        while let Some((block, block_base)) = pending.pop_front() {
            if let Some(href) = block.attr("href") {
                let target = block_base.join(href.trim())?;
                if !visited.insert(target.clone()) {
                    debug!("Skipping already visited categories document {target}");
                    continue;
                }
                let (document, response) = self.get_document(&target).await?;
                if !document.is(app, "categories") {
                    return Err(ProtocolError::remote(
                        target.as_str(),
                        "expected an app:categories document",
                    ));
                }
                pending.push_back((document, response.url().clone()));
                continue;
            }

            let inherited = block.attr("scheme").unwrap_or_default();
            for category in block.children_named(atom, "category") {
                let scheme = category.attr("scheme").filter(|s| !s.is_empty()).unwrap_or(inherited);
                if scheme != wanted {
                    continue;
                }
                if let Some(category) = category_from_terms(
                    category.attr("term").unwrap_or_default(),
                    category.attr("label").unwrap_or_default(),
                ) {
                    categories.push(category);
                }
            }
        }

        Ok(categories)
    }
}

#[async_trait]
impl ProtocolClient for AtomClient {
    fn protocol_name(&self) -> &'static str {
        self.profile.name()
    }

    fn capabilities(&self) -> &ProtocolCapabilities {
        self.profile.capabilities()
    }

    async fn verify_credentials(&self) -> Result<bool, ProtocolError> {
        let response = self.send(&self.service_url, self.request(Method::GET)?).await?;
        if response.status().is_auth_rejection() {
            debug!("{} rejected credentials for {}", self.profile.name(), self.service_url);
            return Ok(false);
        }
        parse_success(&self.service_url, &response)?;
        Ok(true)
    }

    async fn get_categories(&self, blog_id: &str) -> Result<Vec<Category>, ProtocolError> {
        if !self.profile.capabilities().supports_categories {
            return Err(ProtocolError::unsupported(self.profile.name(), "get_categories"));
        }

        let blog_id = self.profile.fixup_blog_id(blog_id);
        let app = self.version().service_namespace();
        let (service, response) = self.get_document(&self.service_url).await?;
        let base = response.url().clone();

        for collection in collections(&service, app) {
            let Some(href) = collection.attr("href") else {
                continue;
            };
            if base.join(href.trim())?.as_str() == blog_id {
                return self.collect_categories(collection, &base).await;
            }
        }

        Err(ProtocolError::remote(
            self.service_url.as_str(),
            format!("no collection '{blog_id}' in service document"),
        ))
    }

    async fn get_blogs(&self) -> Result<Vec<BlogInfo>, ProtocolError> {
        let version = self.version();
        let app = version.service_namespace();
        let atom = version.namespace();
        let (root, response) = self.get_document(&self.service_url).await?;
        let base = response.url().clone();

        if root.is(atom, "feed") {
            let name = self.workspace_title(&root)?.unwrap_or_default();
            let homepage_url = homepage_link(&root, atom, &base).unwrap_or_default();
            return Ok(vec![BlogInfo {
                id: self.service_url.to_string(),
                name,
                homepage_url,
            }]);
        }
        if !root.is(app, "service") {
            return Err(ProtocolError::remote(
                self.service_url.as_str(),
                "expected a service document or a feed",
            ));
        }

        let mut blogs = Vec::new();
        for workspace in root.children_named(app, "workspace") {
            let workspace_title = self.workspace_title(workspace)?;
            for collection in workspace.children_named(app, "collection") {
                if !accepts_entries(collection, app) {
                    continue;
                }
                let Some(href) = collection.attr("href").filter(|h| !h.trim().is_empty()) else {
                    continue;
                };
                let feed_url = base.join(href.trim())?;

                let name = [workspace_title.clone(), self.workspace_title(collection)?]
                    .into_iter()
                    .flatten()
                    .collect::<Vec<_>>()
                    .join(" - ");
                let blog = BlogInfo {
                    id: feed_url.to_string(),
                    name,
                    homepage_url: self.feed_homepage(&feed_url).await?,
                };

                if self.profile.should_promote(collection) {
                    blogs.insert(0, blog);
                } else {
                    blogs.push(blog);
                }
            }
        }

        Ok(blogs)
    }

    async fn create_or_update_post(
        &self,
        blog_id: &str,
        post: &BlogPost,
        is_new: bool,
    ) -> Result<PostResult, ProtocolError> {
        let entry = self.build_entry(post, is_new)?;
        let body = entry.to_xml().into_bytes();

        let (uri, mut request) = if is_new {
            let uri = Url::parse(&self.profile.fixup_blog_id(blog_id))?;
            (uri, self.request(Method::POST)?)
        } else {
            let id = post
                .id
                .as_deref()
                .ok_or_else(|| ProtocolError::invalid_request("updating a post requires its id"))?;
            let request = self
                .request(Method::PUT)?
                .with_if_match(strong_etag(post.etag.as_deref()));
            (Url::parse(id)?, request)
        };

        request = request.with_body(ENTRY_CONTENT_TYPE, body);
        if is_new
            && self.profile.capabilities().supports_slug
            && let Some(slug) = post.slug.as_deref().filter(|s| !s.is_empty())
        {
            request = request.with_header(SLUG_HEADER, slug);
        }

        let response = self.send(&uri, request).await?;
        if !response.status().is_success() {
            return Err(ProtocolError::http_status(
                uri.as_str(),
                response.status(),
                &response.text(),
            ));
        }

        let remote_post = if response.text().trim().is_empty() {
            None
        } else {
            let root = document::parse(&response.text())
                .map_err(|e| ProtocolError::remote(uri.as_str(), format!("malformed entry: {e}")))?;
            Some(self.parse_entry(&root, response.url())?)
        };

        let post_id = if is_new {
            remote_post
                .as_ref()
                .and_then(|p| p.id.clone())
                .or_else(|| {
                    response
                        .location()
                        .and_then(|l| response.url().join(l).ok())
                        .map(|u| u.to_string())
                })
                .ok_or_else(|| {
                    ProtocolError::remote(
                        uri.as_str(),
                        "response has neither an edit link nor a Location",
                    )
                })?
        } else {
            uri.to_string()
        };

        Ok(PostResult {
            post_id,
            etag: response.etag(),
            remote_post,
        })
    }

    async fn get_recent_posts(
        &self,
        blog_id: &str,
        max_posts: usize,
    ) -> Result<Vec<BlogPost>, ProtocolError> {
        let atom = self.version().namespace();
        let mut next = Some(Url::parse(&self.profile.fixup_blog_id(blog_id))?);
        let mut seen: HashSet<String> = HashSet::new();
        let mut posts = Vec::new();

        'pages: while let Some(page_url) = next.take() {
            if posts.len() >= max_posts {
                break;
            }
            let (feed, response) = self.get_document(&page_url).await?;
            let base = response.url().clone();

            let mut entries = feed.children_named(atom, "entry").peekable();
            if entries.peek().is_none() {
                break;
            }

            for entry in entries {
                if posts.len() >= max_posts {
                    break 'pages;
                }
                // No id: key on the edit link. Neither: never a duplicate.
                let entry_key = entry
                    .child_text(atom, "id")
                    .or_else(|| link_href(entry, atom, "edit", &base, |_| true));
                if let Some(key) = entry_key
                    && !seen.insert(key.clone())
                {
                    debug!("Duplicate entry {key} in {page_url}, stopping");
                    break 'pages;
                }
                posts.push(self.parse_entry(entry, &base)?);
            }

            next = link_href(&feed, atom, "next", &base, |_| true)
                .map(|href| Url::parse(&href))
                .transpose()?;
        }

        Ok(posts)
    }

    async fn get_post(&self, _blog_id: &str, post_id: &str) -> Result<BlogPost, ProtocolError> {
        let uri = Url::parse(post_id)?;
        let (entry, response) = self.get_document(&uri).await?;
        if !entry.is(self.version().namespace(), "entry") {
            return Err(ProtocolError::remote(uri.as_str(), "no post entry returned"));
        }

        let mut post = self.parse_entry(&entry, response.url())?;
        post.id = Some(post_id.to_string());
        post.etag = response.etag();
        Ok(post)
    }

    async fn delete_post(&self, _blog_id: &str, post_id: &str) -> Result<(), ProtocolError> {
        let uri = Url::parse(post_id)?;
        let request = self.request(Method::DELETE)?.with_if_match(Some("*"));
        let response = self.send(&uri, request).await?;

        let status = response.status();
        if status.is_success() || status.is_gone() {
            return Ok(());
        }
        Err(ProtocolError::http_status(uri.as_str(), status, &response.text()))
    }
}

fn parse_success(uri: &Url, response: &HttpResponse) -> Result<Element, ProtocolError> {
    if !response.status().is_success() {
        return Err(ProtocolError::http_status(uri.as_str(), response.status(), &response.text()));
    }
    document::parse(&response.text())
        .map_err(|e| ProtocolError::remote(uri.as_str(), format!("malformed XML: {e}")))
}

fn collections<'a>(service: &'a Element, app: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
    service
        .children_named(app, "workspace")
        .flat_map(move |w| w.children_named(app, "collection"))
}

fn accepts_entries(collection: &Element, app: &str) -> bool {
    let mut accepts = collection.children_named(app, "accept").peekable();
    if accepts.peek().is_none() {
        return true;
    }
    accepts.any(|a| accepts_entry(&a.text()))
}

fn accepts_entry(content_type: &str) -> bool {
    let mut parts = content_type.split(';');
    let essence = parts.next().unwrap_or_default().trim().to_ascii_lowercase();
    match essence.as_str() {
        "entry" | "*/*" | "application/*" => true,
        "application/atom+xml" => parts.any(|param| {
            param.split_once('=').is_some_and(|(k, v)| {
                k.trim().eq_ignore_ascii_case("type") && v.trim().eq_ignore_ascii_case("entry")
            })
        }),
        _ => false,
    }
}

fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn link_href(
    element: &Element,
    atom: &str,
    rel: &str,
    base: &Url,
    type_matches: impl Fn(Option<&str>) -> bool,
) -> Option<String> {
    element
        .children_named(atom, "link")
        .filter(|link| link.attr("rel") == Some(rel))
        .find(|link| type_matches(link.attr("type").map(mime_essence).as_deref()))
        .and_then(|link| link.attr("href"))
        .and_then(|href| base.join(href.trim()).ok())
        .map(|url| url.to_string())
}

fn homepage_link(feed: &Element, atom: &str, base: &Url) -> Option<String> {
    link_href(feed, atom, "alternate", base, |mime| {
        matches!(mime, Some("text/html" | "application/xhtml+xml"))
    })
}

fn strong_etag(etag: Option<&str>) -> Option<&str> {
    etag.filter(|e| !e.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("w/")))
}

fn rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
