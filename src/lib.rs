pub mod error;
pub mod provider;
pub mod query;
pub mod mutate;
pub mod diff;
pub mod recover;
pub mod api;

pub use error::{BiopsError, Result};
pub use provider::{Provider, ProviderKind, ProviderStore};
pub use query::{Query, ListFilter, UpdateRequest, Datasource};
pub use mutate::apply_edits;
pub use diff::{diff_queries, format_diff, DiffLine, DiffTag, FieldDiff};
pub use recover::{recovery_command, shell_escape, NO_CHANGE};
pub use api::{client_for, ProviderApi, RedashApi, MetabaseApi};
pub use api::http::{HttpTransport, Transport, PAGE_SIZE};
