//! Cursor pagination driven by the `Link` response header.
//!
//! [`Client::fetch_all`] walks pages until the server stops advertising a `rel="next"` link or
//! the caller's page budget is spent. Each page is authorized and dispatched on its own; a
//! failure or a done [`Context`] on any page discards everything collected so far.

pub mod link;

// self
use crate::{_prelude::*, client::Client, context::Context, obs, request::ApiRequest};

/// Number of pages a walk may fetch.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PageBudget(u32);
impl PageBudget {
	/// Walk until the server reports no further pages.
	pub const UNLIMITED: Self = Self(0);

	/// Caps the walk at `pages` pages; `0` means unlimited.
	pub const fn new(pages: u32) -> Self {
		Self(pages)
	}

	/// Returns the cap, or `None` when unlimited.
	pub const fn limit(self) -> Option<u32> {
		if self.0 == 0 { None } else { Some(self.0) }
	}

	/// Returns `true` once `fetched` pages exhaust the budget.
	pub const fn is_exhausted(self, fetched: u32) -> bool {
		self.0 != 0 && fetched >= self.0
	}
}
impl From<u32> for PageBudget {
	fn from(pages: u32) -> Self {
		Self::new(pages)
	}
}

impl Client {
	/// Fetches every page reachable from `first`, concatenated in server order.
	///
	/// `first` must already target page one (including its page-size query). Each subsequent
	/// page reuses its method and headers with the URL replaced by the `next` cursor; the
	/// authorizer is invoked afresh for every page. Pages with an empty body count toward the
	/// budget and contribute no items. Items are never deduplicated.
	pub async fn fetch_all<T>(
		&self,
		ctx: &Context,
		first: ApiRequest,
		budget: impl Into<PageBudget>,
	) -> Result<Vec<T>>
	where
		T: DeserializeOwned,
	{
		let budget = budget.into();
		let mut target = first.url.clone();
		let mut items = Vec::new();
		let mut fetched = 0_u32;

		loop {
			ctx.check()?;

			let mut request = first.clone();

			request.url = target;

			let response = self.dispatch(ctx, request).await?;
			let page: Vec<T> = if response.is_body_blank() {
				Vec::new()
			} else {
				crate::client::decode_body(&response)?
			};

			fetched += 1;

			let next = self.next_cursor(response.metadata.headers.get_all("link"));

			obs::record_page(fetched, page.len(), next.is_some());
			items.extend(page);

			match next {
				Some(url) if !budget.is_exhausted(fetched) => target = url,
				_ => break,
			}
		}

		Ok(items)
	}

	/// Resolves the `rel="next"` cursor against the base URL; unparseable cursors end the walk.
	fn next_cursor(&self, link_values: &[String]) -> Option<Url> {
		let raw = link::next_url(link_values)?;

		self.base_url.join(&raw).ok()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn budget_semantics() {
		assert_eq!(PageBudget::UNLIMITED.limit(), None);
		assert!(!PageBudget::UNLIMITED.is_exhausted(u32::MAX));
		assert_eq!(PageBudget::new(2).limit(), Some(2));
		assert!(!PageBudget::new(2).is_exhausted(1));
		assert!(PageBudget::new(2).is_exhausted(2));
		assert!(PageBudget::from(1).is_exhausted(1));
	}
}
