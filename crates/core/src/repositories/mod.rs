//! File-backed storage for evaluation records and user accounts.
//!
//! Both stores keep one YAML document per entity in a sharded directory under the configured
//! data dir:
//!
//! ```text
//! <data_dir>/
//!   evaluations/<s1>/<s2>/<record_id>/evaluation.yaml
//!   users/<s1>/<s2>/<sha256(email)>/user.yaml
//! ```

pub mod accounts;
pub mod evaluations;
mod shared;
