//! Offset pagination: `page`/`size`/`sort` query parameters and the page envelope.
//!
//! Query parsing is lenient: a `page` or `size` that does not parse as a
//! non-negative integer (or a `size` of zero) falls back to the default.
//! `sort` may be repeated; each value is `property[,property...][,asc|desc]`.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Largest row offset a SQL backend accepts (signed 64-bit).
pub const MAX_OFFSET: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    fn parse(s: &str) -> Option<Self> {
        if s.eq_ignore_ascii_case("asc") {
            Some(Self::Asc)
        } else if s.eq_ignore_ascii_case("desc") {
            Some(Self::Desc)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    pub property: String,
    pub direction: Direction,
}

impl SortOrder {
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Asc,
        }
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: Direction::Desc,
        }
    }
}

/// A resolved page request. `page` is zero-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_sort(mut self, sort: Vec<SortOrder>) -> Self {
        self.sort = sort;
        self
    }

    /// Row offset of the first item, never above [`MAX_OFFSET`].
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size).min(MAX_OFFSET)
    }
}

/// Raw pagination parameters as they arrived on the query string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageParams {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub sort: Vec<SortOrder>,
}

impl PageParams {
    /// Parse `page`, `size` and every `sort` pair out of a raw query string.
    /// Unrelated parameters are ignored.
    pub fn from_query(raw: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(raw) = raw else {
            return params;
        };

        for (key, value) in url::form_urlencoded::parse(raw.as_bytes()) {
            match key.as_ref() {
                "page" => params.page = value.trim().parse::<u64>().ok(),
                "size" => params.size = value.trim().parse::<u64>().ok().filter(|s| *s > 0),
                "sort" => params.sort.extend(parse_sort(&value)),
                _ => {}
            }
        }
        params
    }

    /// Apply defaults, clamp `size` to `max_size` and `page` so the offset fits
    /// in [`MAX_OFFSET`]. A clamped page still lies past any real data.
    pub fn resolve(self, default_size: u64, max_size: u64) -> PageRequest {
        let max_size = max_size.max(1);
        let size = self.size.unwrap_or(default_size).clamp(1, max_size);
        let page = self.page.unwrap_or(0).min(MAX_OFFSET / size);
        PageRequest::new(page, size).with_sort(self.sort)
    }
}

fn parse_sort(value: &str) -> Vec<SortOrder> {
    let mut parts: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let direction = match parts.last().and_then(|last| Direction::parse(last)) {
        Some(d) => {
            parts.pop();
            d
        }
        None => Direction::Asc,
    };

    parts
        .into_iter()
        .map(|property| SortOrder {
            property: property.to_string(),
            direction,
        })
        .collect()
}

/// One slice of results plus the count of all matching rows.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            request,
        }
    }

    pub fn total_pages(&self) -> u64 {
        self.total.div_ceil(self.request.size.max(1))
    }

    /// Map items while preserving totals and the request (Domain->DTO mapping convenience)
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SortDto {
    pub sorted: bool,
    pub unsorted: bool,
    pub empty: bool,
}

/// Page envelope returned by list endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageDto<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    pub size: u64,
    pub number: u64,
    pub number_of_elements: u64,
    pub first: bool,
    pub last: bool,
    pub empty: bool,
    pub sort: SortDto,
}

impl<T> From<Page<T>> for PageDto<T> {
    fn from(page: Page<T>) -> Self {
        let total_pages = page.total_pages();
        let number = page.request.page;
        let sorted = !page.request.sort.is_empty();
        let count = page.items.len() as u64;
        Self {
            total_elements: page.total,
            total_pages,
            size: page.request.size,
            number,
            number_of_elements: count,
            first: number == 0,
            last: number.saturating_add(1) >= total_pages,
            empty: count == 0,
            sort: SortDto {
                sorted,
                unsorted: !sorted,
                empty: !sorted,
            },
            content: page.items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_query_uses_defaults() {
        let req = PageParams::from_query(None).resolve(2, 2000);
        assert_eq!(req, PageRequest::new(0, 2));
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn page_size_and_sort_are_read() {
        let req = PageParams::from_query(Some("page=3&size=10&sort=name,desc&sort=id"))
            .resolve(2, 2000);
        assert_eq!(req.page, 3);
        assert_eq!(req.size, 10);
        assert_eq!(req.offset(), 30);
        assert_eq!(req.sort, vec![SortOrder::desc("name"), SortOrder::asc("id")]);
    }

    #[test]
    fn invalid_numbers_fall_back_to_defaults() {
        for q in ["page=-1&size=abc", "page=x&size=0", "size=-5", "page=&size="] {
            let req = PageParams::from_query(Some(q)).resolve(2, 2000);
            assert_eq!((req.page, req.size), (0, 2), "query {q}");
        }
    }

    #[test]
    fn size_is_capped() {
        let req = PageParams::from_query(Some("size=99999")).resolve(2, 2000);
        assert_eq!(req.size, 2000);
    }

    #[test]
    fn huge_page_is_clamped_to_a_bindable_offset() {
        for q in [
            "page=4611686018427387904",
            "page=18446744073709551615",
            "page=9223372036854775807&size=2000",
        ] {
            let req = PageParams::from_query(Some(q)).resolve(2, 2000);
            assert!(req.offset() <= MAX_OFFSET, "query {q}");
            assert!(req.page > 1_000_000, "query {q}");
        }

        let req = PageParams::from_query(Some("page=9223372036854775807&size=1")).resolve(2, 2000);
        assert_eq!(req.page, MAX_OFFSET);
        assert_eq!(req.offset(), MAX_OFFSET);
    }

    #[test]
    fn sort_without_direction_and_multi_property() {
        assert_eq!(parse_sort("name"), vec![SortOrder::asc("name")]);
        assert_eq!(parse_sort("email,ASC"), vec![SortOrder::asc("email")]);
        assert_eq!(
            parse_sort("name,email,desc"),
            vec![SortOrder::desc("name"), SortOrder::desc("email")]
        );
        assert!(parse_sort(" , ").is_empty());
    }

    #[test]
    fn encoded_sort_is_decoded() {
        let params = PageParams::from_query(Some("sort=name%2Cdesc"));
        assert_eq!(params.sort, vec![SortOrder::desc("name")]);
    }

    #[test]
    fn envelope_metadata() {
        let page = Page::new(vec![1, 2], 5, PageRequest::new(1, 2));
        let dto: PageDto<i32> = page.into();
        assert_eq!(dto.total_elements, 5);
        assert_eq!(dto.total_pages, 3);
        assert_eq!(dto.number, 1);
        assert_eq!(dto.number_of_elements, 2);
        assert!(!dto.first);
        assert!(!dto.last);
        assert!(!dto.empty);
        assert!(dto.sort.unsorted);
    }

    #[test]
    fn empty_page_is_first_and_last() {
        let dto: PageDto<i32> = Page::new(vec![], 0, PageRequest::new(0, 2)).into();
        assert_eq!(dto.total_pages, 0);
        assert!(dto.first && dto.last && dto.empty);

        let json = serde_json::to_value(&dto).unwrap();
        assert!(json.get("totalElements").is_some());
        assert!(json.get("numberOfElements").is_some());
    }

    #[test]
    fn map_keeps_totals() {
        let page = Page::new(vec![1, 2], 7, PageRequest::new(0, 2)).map(|n| n * 10);
        assert_eq!(page.items, vec![10, 20]);
        assert_eq!(page.total, 7);
    }
}
