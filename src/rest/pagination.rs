//! Page-number pagination driven by response headers.
//!
//! List endpoints report their position in a result set through two headers:
//!
//! - `X-Total-Count`: the number of items across all pages
//! - `Link`: comma separated `<url>; rel="first|last|next|prev"` entries whose
//!   URLs carry `page` and `per_page` query parameters
//!
//! [`PageDetails::from_response`] turns them into a value describing one
//! response's position. Relations the server does not emit (there is no
//! `prev` on page 1, no `next` on the last page) stay `None`.

use crate::clients::HttpResponse;

/// Position of one list response within its result set.
///
/// # Example
///
/// ```rust
/// use onfido::rest::PageDetails;
///
/// let details = PageDetails::parse(
///     Some("6"),
///     &[r#"<https://api.eu.onfido.com/v3.6/applicants?page=2&per_page=2>; rel="next", <https://api.eu.onfido.com/v3.6/applicants?page=3&per_page=2>; rel="last""#],
/// );
///
/// assert_eq!(details.total, Some(6));
/// assert_eq!(details.limit, Some(2));
/// assert_eq!(details.next_page, Some(2));
/// assert_eq!(details.last_page, Some(3));
/// assert_eq!(details.first_page, None);
/// assert_eq!(details.prev_page, None);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PageDetails {
    /// Total number of items; `Some(0)` is a genuine empty result set.
    pub total: Option<u64>,
    /// Page size taken from any link's `per_page` parameter.
    pub limit: Option<u32>,
    /// Page number of the `first` link.
    pub first_page: Option<u32>,
    /// Page number of the `last` link.
    pub last_page: Option<u32>,
    /// Page number of the `next` link.
    pub next_page: Option<u32>,
    /// Page number of the `prev` link.
    pub prev_page: Option<u32>,
}

impl PageDetails {
    /// Extracts page details from a response's headers.
    #[must_use]
    pub fn from_response(response: &HttpResponse) -> Self {
        let links = response.header_values("link").unwrap_or_default();
        Self::parse(response.header("x-total-count"), links)
    }

    /// Builds page details from raw `X-Total-Count` and `Link` header values.
    ///
    /// An unparseable total is treated like a missing one. Link entries with
    /// an unknown relation or no usable `page` parameter are skipped.
    #[must_use]
    pub fn parse<S: AsRef<str>>(total_count: Option<&str>, link_headers: &[S]) -> Self {
        let mut details = Self {
            total: total_count.and_then(|value| value.trim().parse().ok()),
            ..Self::default()
        };

        for header in link_headers {
            for entry in header.as_ref().split(',') {
                details.apply_link(entry);
            }
        }

        details
    }

    fn apply_link(&mut self, entry: &str) {
        let Some((url, rel)) = parse_link_entry(entry) else {
            return;
        };

        let slot = match rel {
            "first" => &mut self.first_page,
            "last" => &mut self.last_page,
            "next" => &mut self.next_page,
            "prev" => &mut self.prev_page,
            _ => return,
        };

        if let Some(page) = positive_param(url, "page") {
            *slot = Some(page);
        }
        if let Some(per_page) = positive_param(url, "per_page") {
            self.limit = Some(per_page);
        }
    }

    /// Returns `true` if a `next` link was present.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }

    /// Returns `true` if a `prev` link was present.
    #[must_use]
    pub const fn has_prev_page(&self) -> bool {
        self.prev_page.is_some()
    }
}

/// Splits `<url>; rel="name"` into its URL and relation.
fn parse_link_entry(entry: &str) -> Option<(&str, &str)> {
    let mut parts = entry.split(';');
    let url = parts
        .next()?
        .trim()
        .strip_prefix('<')?
        .strip_suffix('>')?;

    let rel = parts.find_map(|part| {
        part.trim()
            .strip_prefix("rel=")
            .map(|value| value.trim_matches('"'))
    })?;

    Some((url, rel))
}

/// Returns a non-zero numeric query parameter of `url`.
fn positive_param(url: &str, name: &str) -> Option<u32> {
    let value = query_param(url, name)?;
    value.parse().ok().filter(|n: &u32| *n != 0)
}

/// Returns the raw value of a query parameter of `url`.
pub(crate) fn query_param<'a>(url: &'a str, name: &str) -> Option<&'a str> {
    let (_, query) = url.split_once('?')?;
    query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find_map(|(key, value)| (key == name).then_some(value))
}

/// A page-number pagination option, shared by list operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pagination {
    /// The 1-based page to fetch.
    Page(u32),
    /// Number of items per page.
    Limit(u32),
}

/// Sort direction for list operations that support ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Oldest first.
    Asc,
    /// Newest first.
    #[default]
    Desc,
}

impl SortDirection {
    /// Returns the query parameter value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Merged pagination parameters for one list call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct PageParams {
    page: Option<u32>,
    per_page: Option<u32>,
}

impl PageParams {
    pub(crate) fn apply(&mut self, option: Pagination) {
        match option {
            Pagination::Page(page) => self.page = Some(page),
            Pagination::Limit(limit) => self.per_page = Some(limit),
        }
    }

    /// Returns the query parameters; zero values are omitted.
    pub(crate) fn to_query(self) -> Vec<(String, String)> {
        [("page", self.page), ("per_page", self.per_page)]
            .into_iter()
            .filter_map(|(key, value)| {
                value
                    .filter(|n| *n != 0)
                    .map(|n| (key.to_string(), n.to_string()))
            })
            .collect()
    }
}
