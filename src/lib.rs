//! APM Console - Main Library
//!
//! Client for the administration console of a software portfolio: login,
//! registration, and a collection screen that lists, creates, edits and
//! deletes software records through a remote REST collection.
//!
//! # Module Structure
//!
//! - **`shared`** - Types that cross the wire
//!   - Software records and their editable field set
//!   - List and error response bodies
//!   - Configuration (`AppConfig`) and shared error types
//!
//! - **`console`** - The client
//!   - `gateway` - HTTP access to the collection behind a trait
//!   - `collection` - store, modal controller, form buffers and the synchronizer
//!   - `auth` - login/register calls and registration checks
//!
//! # Usage
//!
//! ```rust,no_run
//! use apm_console::console::{Config, HttpGateway, Synchronizer};
//! use tokio::runtime::Handle;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let gateway = HttpGateway::new(Config::from_env()?)?;
//! let mut sync = Synchronizer::new(gateway, Handle::current());
//!
//! sync.refresh();
//! sync.settle().await;
//! for software in sync.state().store().iter() {
//!     println!("{} {}", software.id, software.display_name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Threading
//!
//! All console state is owned by one `Synchronizer` and changed only through
//! `&mut self`. Gateway calls run as tasks on the runtime handle passed to
//! `Synchronizer::new` and report back over a channel; results are applied on
//! `poll()` or `next_completion().await`, in the order they complete.

/// Shared types and data structures
pub mod shared;

/// Console client: gateway, auth and collection state
pub mod console;
