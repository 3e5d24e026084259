//! # Fetchr Engine
//!
//! Turns a declarative description of a REST or GraphQL call into a
//! reusable resolver.
//!
//! A [`Config`] names a URL template, headers, a body, response rules and an
//! optional `grab`/`shape` post-processing step. [`create_resolver`] turns it
//! into a [`Resolver`]; each [`Resolver::resolve`] call renders the templates
//! against the caller's variables, performs the request through a
//! [`Transport`](fetchr_api::Transport) and runs the response through the
//! rules.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fetchr_engine::{Config, create_resolver};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::rest("https://jsonplaceholder.typicode.com/users/{{ id }}")
//!     .with_grab("address")
//!     .with_shape(json!({"city": "{{ city }}"}));
//!
//! let resolver = create_resolver(config)?;
//! let city = resolver.resolve_value(Some(json!({"id": 1}))).await?;
//! println!("{city}");
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - **`template`**: `{{ path }}` / `{{{ path }}}` rendering over JSON values
//! - **`rules`**: matcher and applier tables plus the implicit JSON fallback
//! - **`resolver`**: REST and GraphQL adapters and the adapter table
//! - **`config`**: loading configs and bundles from YAML or JSON files

pub mod config;
mod error;
pub mod resolver;
pub mod rules;
pub mod template;

pub use config::{ResolverBundle, load_bundle_file, load_config_file};
pub use error::{ConfigError, ResolveError};
pub use resolver::{Resolver, create_resolver, create_resolver_with_transport};
pub use rules::apply_rules;

pub use fetchr_types::{Applier, ApplierError, Config, ConfigBundle, Details, Matcher, RequestOptions, ResolveOutput, Rule, RuleContext};
