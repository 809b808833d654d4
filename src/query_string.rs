use std::collections::HashMap;

#[derive(PartialEq, Debug)]
pub struct QueryString {
    items: HashMap<String, String>,
}

impl QueryString {
    pub fn from(buf: &str) -> Self {
        let vs: Vec<(String, String)> = serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        let items: HashMap<String, String> = vs.into_iter().collect();

        QueryString {
            items,
        }
    }

    /// `page` parameter. Missing, malformed or zero values give 1.
    pub fn get_page(&self) -> u32 {
        let val = self.items.get("page")
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        if val == 0 { return 1; }
        val
    }

    /// `keyword` parameter, empty when absent
    pub fn get_keyword(&self) -> &str {
        self.items.get("keyword").map(|k| k.as_str()).unwrap_or("")
    }
}
