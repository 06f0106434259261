//! Property keys: `name`, `name?`, `name(modifier)`, `name?(modifier, description)`.
//!
//! The bare key `*` is shorthand for `(*)`, the additional-properties entry.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyKey<'a> {
    pub name: &'a str,
    pub optional: bool,
    pub modifier: Option<Modifier<'a>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifier<'a> {
    pub keyword: &'a str,
    pub description: Option<&'a str>,
}

impl<'a> PropertyKey<'a> {
    pub fn parse(raw: &'a str) -> Self {
        if raw.trim() == "*" {
            return PropertyKey {
                name: "",
                optional: false,
                modifier: Some(Modifier { keyword: "*", description: None }),
            };
        }
        let (head, modifier) = match raw.split_once('(') {
            Some((head, region)) => (head, Some(Modifier::parse(region))),
            None => (raw, None),
        };
        let head = head.trim();
        let (name, optional) = match head.strip_suffix('?') {
            Some(name) => (name.trim_end(), true),
            None => (head, false),
        };
        PropertyKey { name, optional, modifier }
    }

    /// Empty names never land in `required`, whatever their marker.
    pub fn is_required(&self) -> bool {
        !self.optional && !self.name.is_empty()
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self.modifier, Some(Modifier { keyword: "*", .. }))
    }
}

impl<'a> Modifier<'a> {
    // `region` is everything after the first `(`; a missing `)` is tolerated.
    fn parse(region: &'a str) -> Self {
        let region = region.strip_suffix(')').unwrap_or(region);
        match region.split_once(',') {
            Some((keyword, description)) => Modifier {
                keyword: keyword.trim(),
                description: Some(description.trim()),
            },
            None => Modifier { keyword: region.trim(), description: None },
        }
    }
}
