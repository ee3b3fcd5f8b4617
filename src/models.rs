// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at_ms: i64,
    pub display_order: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub project_id: i64,
    pub timestamp_ms: i64,
    pub title: String,
    pub notes: Option<String>,
    pub category_id: Option<i64>,
    // Minor currency units; exactly one of credit/debit is non-zero.
    pub credit_minor: i64,
    pub debit_minor: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Snapshot of a project moved to the trash. Holds no live reference back to
/// the projects table; `original_id` is the identity a restore reclaims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeletedProject {
    pub id: i64,
    pub original_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at_ms: i64,
    pub deleted_at_ms: i64,
}

/// Derived row, never persisted: recomputed from the source tables on every
/// observed change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectBalance {
    pub project_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub balance_minor: i64,
}
