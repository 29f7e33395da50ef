#![forbid(unsafe_code)]

//! # gart-net
//!
//! HTTP fetch layer for gart.
//!
//! ## Public contract
//!
//! The [`Net`] trait is the fetch boundary everything above this crate talks
//! to. [`HttpClient`] is the reqwest-backed implementation; [`BoundedNet`] is
//! a decorator that enforces a global in-flight admission ceiling shared by
//! every operation of one session (describe, search, and file downloads all
//! compete for the same slots).
//!
//! ## Admission (normative)
//!
//! - At most N requests are in flight at once per [`BoundedNet`].
//! - Waiters are admitted in arrival order (FIFO).
//! - A slot is released exactly once per request, including when the calling
//!   task is cancelled while waiting or mid-flight (RAII permit).
//!
//! ## Conditional fetch
//!
//! [`Net::get_conditional`] attaches a previously observed validator token as
//! `If-None-Match`. A server-side 304 surfaces as
//! [`Conditional::NotModified`] with no body; callers must not rewrite the
//! file in that case.
//!
//! No retry lives in this crate. Retry policy, if any, is a caller concern.

mod client;
mod error;
mod limit;
mod traits;
mod types;

pub use crate::{
    client::HttpClient,
    error::{NetError, NetResult},
    limit::BoundedNet,
    traits::{Net, NetExt},
    types::{normalize_validator, Conditional, Headers, NetOptions},
};
