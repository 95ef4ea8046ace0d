// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! Everything above this module talks to [`crate::StatementBackend`]. Backend
//! modules are limited to:
//!
//! - Connection initialization and session settings
//! - Binding [`crate::SqlValue`]s to the driver's types
//! - Transaction control statements
//! - Mapping driver errors onto [`crate::PersistenceError`]

pub mod mysql;
