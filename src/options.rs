use url::form_urlencoded;

/// Options that map their fields onto URL query parameters.
///
/// Implementations push only the fields that are set; zero numbers and
/// empty strings are left out so the server applies its defaults.
pub trait QueryOptions {
    /// Append this value's `(name, value)` pairs
    fn query_pairs(&self, pairs: &mut Vec<(&'static str, String)>);
}

/// Pagination parameters accepted by list endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListOptions {
    /// Page of results to retrieve
    pub page: u32,
    /// Number of results per page
    pub per_page: u32,
}

impl ListOptions {
    pub fn new(page: u32, per_page: u32) -> Self {
        ListOptions { page, per_page }
    }
}

impl QueryOptions for ListOptions {
    fn query_pairs(&self, pairs: &mut Vec<(&'static str, String)>) {
        if self.page != 0 {
            pairs.push(("page", self.page.to_string()));
        }
        if self.per_page != 0 {
            pairs.push(("per_page", self.per_page.to_string()));
        }
    }
}

/// Add the parameters in `opts` to the query string of `path`.
///
/// Any query already present on `path` is replaced. Parameters are sorted
/// by name, and no `?` is appended when nothing is set.
pub fn add_options<O>(path: &str, opts: Option<&O>) -> String
where
    O: QueryOptions + ?Sized,
{
    let Some(opts) = opts else {
        return path.to_string();
    };

    let base = path.split_once('?').map_or(path, |(base, _)| base);

    let mut pairs = Vec::new();
    opts.query_pairs(&mut pairs);
    if pairs.is_empty() {
        return base.to_string();
    }
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();
    format!("{}?{}", base, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_options_produce_no_query() {
        let path = add_options("time_entries", Some(&ListOptions::default()));
        assert_eq!(path, "time_entries");
    }

    #[test]
    fn test_missing_options_keep_path() {
        let path = add_options::<ListOptions>("time_entries?x=1", None);
        assert_eq!(path, "time_entries?x=1");
    }

    #[test]
    fn test_page_only() {
        let opts = ListOptions { page: 2, per_page: 0 };
        let path = add_options("time_entries", Some(&opts));
        assert_eq!(path, "time_entries?page=2");
    }

    #[test]
    fn test_existing_query_is_replaced() {
        let opts = ListOptions::new(3, 50);
        let path = add_options("time_entries?page=1", Some(&opts));
        assert_eq!(path, "time_entries?page=3&per_page=50");
    }
}
