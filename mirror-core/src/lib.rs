//! Addon mirror core library — domain types, version naming, configuration, errors.
//!
//! - [`types`] — [`AddonDescriptor`] and the [`Slug`] newtype
//! - [`naming`] — patch string → [`Flavour`] / interface id
//! - [`config`] — [`MirrorConfig`] (YAML) and [`Credentials`] (environment)
//! - [`error`] — [`MirrorError`]

pub mod config;
pub mod error;
pub mod naming;
pub mod types;

pub use config::{Credentials, MirrorConfig};
pub use error::MirrorError;
pub use naming::{flavour_of, interface_id_of, Flavour};
pub use types::{AddonDescriptor, Slug, ARTIFACT_EXTENSION};
