const PAGE_PARAM: &str = "page";

fn parse_route(route: &str) -> Option<(reqwest::Url, bool)> {
    if let Ok(url) = reqwest::Url::parse(route) {
        return Some((url, true));
    }
    let base = reqwest::Url::parse("http://localhost/").ok()?;
    base.join(route).ok().map(|url| (url, false))
}

pub fn page_from_route(route: &str) -> u32 {
    let Some((url, _)) = parse_route(route.trim()) else {
        return 1;
    };
    url.query_pairs()
        .find(|(k, _)| k == PAGE_PARAM)
        .and_then(|(_, v)| v.trim().parse::<u32>().ok())
        .filter(|p| *p >= 1)
        .unwrap_or(1)
}

pub fn route_for_page(base_route: &str, page: u32) -> String {
    let Some((mut url, absolute)) = parse_route(base_route.trim()) else {
        return base_route.to_string();
    };
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != PAGE_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    url.set_query(None);
    if !kept.is_empty() || page > 1 {
        let mut query = url.query_pairs_mut();
        for (k, v) in kept.iter() {
            query.append_pair(k, v);
        }
        if page > 1 {
            query.append_pair(PAGE_PARAM, &page.to_string());
        }
    }
    if absolute {
        return url.to_string();
    }
    match url.query() {
        Some(q) => format!("{}?{}", url.path(), q),
        None => url.path().to_string(),
    }
}
