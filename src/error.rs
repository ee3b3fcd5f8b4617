// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

/// Errors surfaced by the repositories. Validation failures carry messages
/// meant to be shown to the user verbatim; everything else wraps the
/// underlying storage error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("project name cannot be empty")]
    EmptyProjectName,

    #[error("a project with that name already exists")]
    DuplicateProjectName,

    #[error("no project with id {0}")]
    ProjectNotFound(i64),

    #[error("nothing in the trash for original id {0}")]
    TrashEntryNotFound(i64),

    #[error("transaction amount must be positive")]
    NonPositiveAmount,

    #[error(transparent)]
    Sql(rusqlite::Error),
}

// Extended result code 2067 is SQLITE_CONSTRAINT_UNIQUE. The projects.name
// index is the only unique constraint a repository write can trip after its
// own pre-checks: deleted_projects.original_id is unreachable because a
// project's live row is gone once its snapshot exists.
impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(code, Some(ref desc))
                if code.extended_code == 2067 && desc.contains("projects.name") =>
            {
                Error::DuplicateProjectName
            }
            other => Error::Sql(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
