// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! Global constants for the PowerDNS solver.
//!
//! This module contains all numeric and string constants used throughout the codebase.
//! Constants are organized by category for easy maintenance.

// ============================================================================
// Solver Constants
// ============================================================================

/// Name of the solver, referenced as `solverName` on cert-manager issuers
pub const SOLVER_NAME: &str = "pdns";

// ============================================================================
// DNS Protocol Constants
// ============================================================================

/// Record type managed by this solver
pub const RECORD_TYPE_TXT: &str = "TXT";

/// Default TTL for challenge TXT records (2 minutes)
pub const DEFAULT_TXT_RECORD_TTL_SECS: u32 = 120;

// ============================================================================
// PowerDNS API Constants
// ============================================================================

/// Server id used when the issuer config does not set `serverID`
pub const DEFAULT_SERVER_ID: &str = "localhost";

/// Header carrying the PowerDNS API key
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Path of the API version discovery endpoint
pub const API_DISCOVERY_PATH: &str = "api";

/// Path prefix of the v1 API
pub const API_V1_PREFIX: [&str; 2] = ["api", "v1"];

/// First API version that addresses records by fully-qualified name
pub const FIRST_QUALIFIED_API_VERSION: u32 = 1;

// ============================================================================
// HTTP Constants
// ============================================================================

/// Timeout for PowerDNS API requests when the issuer config does not set one
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// JSON content type sent on every request
pub const CONTENT_TYPE_JSON: &str = "application/json";

// ============================================================================
// Logging Constants
// ============================================================================

/// Default log filter when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Environment variable selecting the log output format (`text` or `json`)
pub const LOG_FORMAT_ENV: &str = "RUST_LOG_FORMAT";
