use std::collections::VecDeque;
use std::marker::PhantomData;

use http::HeaderMap;
use http::header::LINK;
use serde_json::{Map, Value, json};

use super::Resource;
use super::base::{Core, check_status};
use crate::call::Call;
use crate::error::Result;
use crate::session::Response;

const MAX_PER_PAGE: i64 = 100;

/// Where a [`PageIterator`] is in its walk over the pages.
#[derive(Debug, Clone, PartialEq)]
pub enum IteratorState {
    /// No page has been requested yet.
    NotStarted,
    /// Items from the last page are waiting to be handed out.
    Buffered {
        items: VecDeque<Value>,
        next_url: Option<String>,
    },
    /// Nothing more will be yielded.
    Done,
}

/// Lazily walks a paginated listing, one `GET` per page.
///
/// The first request carries `params` plus `per_page`; later pages follow
/// the `Link: <...>; rel="next"` header and carry no params of their own.
/// A negative count yields everything.
#[derive(Debug)]
pub struct PageIterator<T> {
    core: Core,
    url: String,
    params: Map<String, Value>,
    count: i64,
    state: IteratorState,
    _marker: PhantomData<T>,
}

impl<T: Resource> PageIterator<T> {
    pub fn new(core: Core, url: String, count: i64, params: Option<Map<String, Value>>) -> Self {
        let mut params = params.unwrap_or_default();
        let per_page = if count < 0 || count > MAX_PER_PAGE {
            MAX_PER_PAGE
        } else {
            count
        };
        params
            .entry("per_page")
            .or_insert_with(|| json!(per_page));

        Self {
            core,
            url,
            params,
            count,
            state: IteratorState::NotStarted,
            _marker: PhantomData,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn state(&self) -> &IteratorState {
        &self.state
    }

    fn fetch(&mut self, url: &str, first: bool) -> Result<()> {
        let mut call = Call::new(url);
        if first {
            call = call.named("params", Value::Object(self.params.clone()));
        }

        let response = self.core.session()?.get(call);
        self.state = match response {
            Response::Unset | Response::Exhausted => IteratorState::Done,
            Response::Http {
                status,
                headers,
                body,
            } => {
                check_status(status, &body)?;
                let items = match body {
                    Value::Array(items) => items,
                    Value::Object(mut object) => match object.remove("items") {
                        Some(Value::Array(items)) => items,
                        _ => Vec::new(),
                    },
                    _ => Vec::new(),
                };
                if items.is_empty() {
                    IteratorState::Done
                } else {
                    IteratorState::Buffered {
                        items: items.into(),
                        next_url: next_link(&headers),
                    }
                }
            }
        };
        Ok(())
    }

    fn advance(&mut self) -> Result<Option<Value>> {
        loop {
            if self.count == 0 {
                self.state = IteratorState::Done;
            }

            match &mut self.state {
                IteratorState::Done => return Ok(None),
                IteratorState::NotStarted => {
                    let url = self.url.clone();
                    self.fetch(&url, true)?;
                }
                IteratorState::Buffered { items, next_url } => {
                    if let Some(item) = items.pop_front() {
                        if self.count > 0 {
                            self.count -= 1;
                        }
                        return Ok(Some(item));
                    }
                    match next_url.take() {
                        Some(url) => self.fetch(&url, false)?,
                        None => self.state = IteratorState::Done,
                    }
                }
            }
        }
    }
}

impl<T: Resource> Iterator for PageIterator<T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.advance() {
            Ok(Some(item)) => Some(T::from_json(&item, self.core.session_ref().cloned())),
            Ok(None) => None,
            Err(err) => {
                self.state = IteratorState::Done;
                Some(Err(err))
            }
        }
    }
}

/// The `rel="next"` target of a `Link` header, if any.
pub fn next_link(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .find_map(|link| {
            let mut pieces = link.split(';');
            let target = pieces.next()?.trim();
            let is_next = pieces.any(|param| param.trim() == r#"rel="next""#);
            if is_next {
                target
                    .strip_prefix('<')
                    .and_then(|t| t.strip_suffix('>'))
                    .map(str::to_string)
            } else {
                None
            }
        })
}
