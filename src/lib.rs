//! Typed async client for the Okta users and groups API: authenticated requests, JSON decoding
//! into domain types, and `Link`-header pagination under a caller-controlled page budget.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod client;
pub mod context;
pub mod error;
pub mod http;
pub mod obs;
pub mod pagination;
pub mod request;
pub mod services;

pub use client::{Client, ClientBuilder};
pub use context::{Context, ContextError};
pub use error::{Error, Result};
pub use services::{Group, GroupService, ListUsersOptions, User, UserService};

mod _prelude {
	pub use std::{
		collections::BTreeMap,
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	#[cfg(feature = "reqwest")]
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize, de::DeserializeOwned};
	pub use thiserror::Error as ThisError;
	pub use time::{Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

#[cfg(feature = "reqwest")] pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, parking_lot as _, tokio as _};
