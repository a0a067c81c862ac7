//! Facet filter and pagination over in-memory listings.
//!
//! Listings (jobs, resources) are fetched whole, then narrowed here by a
//! free-text search, a type facet and a tag facet. Filtering is a linear
//! scan that preserves input order; pagination is applied to the result.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub const DEFAULT_PER_PAGE: usize = 9;
pub const MAX_PER_PAGE: usize = 100;

/// An item that can be narrowed by search, type and tags.
pub trait Facetable {
    /// Fields the free-text search looks into.
    fn search_fields(&self) -> Vec<&str>;
    /// The value matched against the type facet.
    fn kind(&self) -> &str;
    fn tags(&self) -> &[String];
}

/// Raw listing parameters as they arrive in the query string.
/// `types` and `tags` are comma separated.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListingQuery {
    pub search: Option<String>,
    pub types: Option<String>,
    pub tags: Option<String>,
    pub page: Option<usize>,
    pub per_page: Option<usize>,
}

/// Normalized filter: lowercased search and facet sets.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ListingFilter {
    pub search: String,
    pub types: BTreeSet<String>,
    pub tags: BTreeSet<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageRequest {
    pub page: usize,
    pub per_page: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct FacetCounts {
    pub types: Vec<FacetCount>,
    pub tags: Vec<FacetCount>,
}

/// A filtered page together with the facets available on the full list.
#[derive(Debug, Serialize)]
pub struct Listing<T> {
    #[serde(flatten)]
    pub page: Page<T>,
    pub facets: FacetCounts,
}

impl<T: Clone> Listing<&T> {
    /// Detaches the page from the slice it was built over.
    pub fn cloned(self) -> Listing<T> {
        Listing {
            page: Page {
                items: self.page.items.into_iter().cloned().collect(),
                page: self.page.page,
                per_page: self.page.per_page,
                total_items: self.page.total_items,
                total_pages: self.page.total_pages,
            },
            facets: self.facets,
        }
    }
}

impl ListingQuery {
    pub fn to_filter(&self) -> ListingFilter {
        ListingFilter {
            search: self
                .search
                .as_deref()
                .map(|s| s.trim().to_lowercase())
                .unwrap_or_default(),
            types: split_csv(self.types.as_deref()),
            tags: split_csv(self.tags.as_deref()),
        }
    }

    pub fn page_request(&self) -> Result<PageRequest, AppError> {
        let page = self.page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::Validation("page starts at 1".to_string()));
        }
        let per_page = self
            .per_page
            .unwrap_or(DEFAULT_PER_PAGE)
            .clamp(1, MAX_PER_PAGE);
        Ok(PageRequest { page, per_page })
    }
}

fn split_csv(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|s| {
        s.split(',')
            .map(|part| part.trim().to_lowercase())
            .filter(|part| !part.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

impl ListingFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.types.is_empty() && self.tags.is_empty()
    }

    pub fn matches<T: Facetable>(&self, item: &T) -> bool {
        let search_ok = self.search.is_empty()
            || item
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&self.search));

        let type_ok = self.types.is_empty() || self.types.contains(&item.kind().to_lowercase());

        let tags_ok = self.tags.is_empty()
            || item
                .tags()
                .iter()
                .any(|t| self.tags.contains(&t.to_lowercase()));

        search_ok && type_ok && tags_ok
    }
}

/// Keeps the items matching every active facet, in their original order.
pub fn apply_filter<'a, T: Facetable>(items: &'a [T], filter: &ListingFilter) -> Vec<&'a T> {
    if filter.is_empty() {
        return items.iter().collect();
    }
    items.iter().filter(|item| filter.matches(*item)).collect()
}

pub fn paginate<T>(items: Vec<T>, req: PageRequest) -> Page<T> {
    let total_items = items.len();
    let total_pages = total_items.div_ceil(req.per_page);
    let start = (req.page - 1).saturating_mul(req.per_page);

    let items = items.into_iter().skip(start).take(req.per_page).collect();

    Page {
        items,
        page: req.page,
        per_page: req.per_page,
        total_items,
        total_pages,
    }
}

/// Counts every type and tag across `items`, most frequent first.
pub fn facet_counts<T: Facetable>(items: &[T]) -> FacetCounts {
    let mut types: BTreeMap<String, usize> = BTreeMap::new();
    let mut tags: BTreeMap<String, usize> = BTreeMap::new();

    for item in items {
        *types.entry(item.kind().to_lowercase()).or_insert(0) += 1;
        let unique: BTreeSet<String> = item.tags().iter().map(|t| t.to_lowercase()).collect();
        for tag in unique {
            *tags.entry(tag).or_insert(0) += 1;
        }
    }

    FacetCounts {
        types: sorted_counts(types),
        tags: sorted_counts(tags),
    }
}

fn sorted_counts(counts: BTreeMap<String, usize>) -> Vec<FacetCount> {
    let mut out: Vec<FacetCount> = counts
        .into_iter()
        .map(|(value, count)| FacetCount { value, count })
        .collect();
    // stable sort keeps the alphabetical order from the BTreeMap for ties
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

/// Filter, facet and paginate in one step.
pub fn build_listing<'a, T: Facetable>(
    items: &'a [T],
    query: &ListingQuery,
) -> Result<Listing<&'a T>, AppError> {
    let req = query.page_request()?;
    let filtered = apply_filter(items, &query.to_filter());
    Ok(Listing {
        page: paginate(filtered, req),
        facets: facet_counts(items),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Item {
        title: &'static str,
        body: &'static str,
        kind: &'static str,
        tags: Vec<String>,
    }

    impl Facetable for Item {
        fn search_fields(&self) -> Vec<&str> {
            vec![self.title, self.body]
        }
        fn kind(&self) -> &str {
            self.kind
        }
        fn tags(&self) -> &[String] {
            &self.tags
        }
    }

    fn item(title: &'static str, body: &'static str, kind: &'static str, tags: &[&str]) -> Item {
        Item {
            title,
            body,
            kind,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn fixtures() -> Vec<Item> {
        vec![
            item("Rust Intern", "Backend services", "internship", &["rust", "backend"]),
            item("Designer", "Figma and UX research", "full_time", &["design"]),
            item("Data Analyst", "SQL dashboards", "part_time", &["sql", "Data"]),
            item("Backend Attachment", "Go and Postgres", "attachment", &["go", "backend"]),
        ]
    }

    fn query(search: Option<&str>, types: Option<&str>, tags: Option<&str>) -> ListingQuery {
        ListingQuery {
            search: search.map(String::from),
            types: types.map(String::from),
            tags: tags.map(String::from),
            page: None,
            per_page: None,
        }
    }

    fn titles(items: &[&Item]) -> Vec<&'static str> {
        items.iter().map(|i| i.title).collect()
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let items = fixtures();
        let filter = query(None, None, None).to_filter();
        assert!(filter.is_empty());
        assert_eq!(apply_filter(&items, &filter).len(), items.len());
    }

    #[test]
    fn test_search_is_case_insensitive_over_all_fields() {
        let items = fixtures();
        let out = apply_filter(&items, &query(Some("  POSTGRES "), None, None).to_filter());
        assert_eq!(titles(&out), vec!["Backend Attachment"]);

        let out = apply_filter(&items, &query(Some("backend"), None, None).to_filter());
        assert_eq!(titles(&out), vec!["Rust Intern", "Backend Attachment"]);
    }

    #[test]
    fn test_type_facet_accepts_any_listed_type() {
        let items = fixtures();
        let out = apply_filter(
            &items,
            &query(None, Some("internship, PART_TIME,,"), None).to_filter(),
        );
        assert_eq!(titles(&out), vec!["Rust Intern", "Data Analyst"]);
    }

    #[test]
    fn test_tag_facet_matches_on_any_intersection() {
        let items = fixtures();
        let out = apply_filter(&items, &query(None, None, Some("design,data")).to_filter());
        assert_eq!(titles(&out), vec!["Designer", "Data Analyst"]);
    }

    #[test]
    fn test_facets_and_search_combine_with_and() {
        let items = fixtures();
        let out = apply_filter(
            &items,
            &query(Some("go"), Some("attachment,internship"), Some("backend")).to_filter(),
        );
        assert_eq!(titles(&out), vec!["Backend Attachment"]);
    }

    #[test]
    fn test_no_match_returns_empty() {
        let items = fixtures();
        let out = apply_filter(&items, &query(Some("haskell"), None, None).to_filter());
        assert!(out.is_empty());
    }

    #[test]
    fn test_paginate_middle_and_last_page() {
        let data: Vec<u32> = (1..=20).collect();
        let page = paginate(data.clone(), PageRequest { page: 2, per_page: 9 });
        assert_eq!(page.items, (10..=18).collect::<Vec<_>>());
        assert_eq!(page.total_items, 20);
        assert_eq!(page.total_pages, 3);

        let last = paginate(data, PageRequest { page: 3, per_page: 9 });
        assert_eq!(last.items, vec![19, 20]);
    }

    #[test]
    fn test_paginate_past_end_is_empty_with_totals() {
        let page = paginate(vec![1, 2, 3], PageRequest { page: 5, per_page: 2 });
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 3);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_paginate_empty_list_has_zero_pages() {
        let page = paginate(Vec::<u8>::new(), PageRequest { page: 1, per_page: 9 });
        assert_eq!(page.total_pages, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_page_request_defaults_and_clamps() {
        let q = ListingQuery::default();
        assert_eq!(
            q.page_request().unwrap(),
            PageRequest { page: 1, per_page: DEFAULT_PER_PAGE }
        );

        let q = ListingQuery { per_page: Some(10_000), ..Default::default() };
        assert_eq!(q.page_request().unwrap().per_page, MAX_PER_PAGE);

        let q = ListingQuery { per_page: Some(0), ..Default::default() };
        assert_eq!(q.page_request().unwrap().per_page, 1);
    }

    #[test]
    fn test_page_zero_is_rejected() {
        let q = ListingQuery { page: Some(0), ..Default::default() };
        assert!(matches!(q.page_request(), Err(AppError::Validation(_))));
    }

    #[test]
    fn test_facet_counts_sorted_by_frequency() {
        let items = fixtures();
        let facets = facet_counts(&items);
        assert_eq!(facets.types.len(), 4);
        assert_eq!(
            facets.tags[0],
            FacetCount { value: "backend".to_string(), count: 2 }
        );
        assert!(facets.tags.iter().any(|f| f.value == "data"));
    }

    #[test]
    fn test_build_listing_totals_count_filtered_items() {
        let items = fixtures();
        let q = ListingQuery {
            tags: Some("backend".to_string()),
            per_page: Some(1),
            ..Default::default()
        };
        let listing = build_listing(&items, &q).unwrap();
        assert_eq!(listing.page.total_items, 2);
        assert_eq!(listing.page.items.len(), 1);
        assert_eq!(listing.facets.types.len(), 4);
    }
}
