//! What every recipe needs: the workspace, the identity resolver and the
//! audit emitter, plus the per-request inputs.

use std::fmt;

use tablelog_contracts::{
    error::{TablelogError, TablelogResult},
    identity::{Headers, ResolvedIdentity},
    resource::QualifiedName,
};
use tablelog_core::{AuditEmitter, IdentityResolver};

use crate::workspace::Workspace;

/// Long-lived collaborators shared by all recipes.
pub struct RecipeContext {
    pub workspace: Box<dyn Workspace>,
    pub resolver: IdentityResolver,
    pub emitter: AuditEmitter,
}

impl RecipeContext {
    pub fn new(
        workspace: Box<dyn Workspace>,
        resolver: IdentityResolver,
        emitter: AuditEmitter,
    ) -> Self {
        Self {
            workspace,
            resolver,
            emitter,
        }
    }

    /// Resolve the caller of `request`.
    pub fn caller(&self, request: &PageRequest) -> ResolvedIdentity {
        self.resolver.resolve(request.headers.as_ref())
    }

    /// The HTTP path of the warehouse called `name`.
    pub fn warehouse_path(&self, name: &str) -> TablelogResult<String> {
        self.workspace
            .list_warehouses()?
            .into_iter()
            .find(|w| w.name == name)
            .map(|w| w.http_path)
            .ok_or_else(|| TablelogError::NotFound {
                what: format!("SQL warehouse '{name}'"),
            })
    }
}

/// The request a recipe runs for.
///
/// `headers` is `None` when there is no request context at all, e.g. a
/// background job; the resolver then falls back to the principal.
#[derive(Debug, Clone, Default)]
pub struct PageRequest {
    pub headers: Option<Headers>,
}

impl PageRequest {
    pub fn with_headers(headers: Headers) -> Self {
        Self {
            headers: Some(headers),
        }
    }

    pub fn without_context() -> Self {
        Self { headers: None }
    }
}

/// The warehouse and table picked on a page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSelection {
    /// Warehouse display name, as listed by the workspace.
    pub warehouse: String,
    pub table: QualifiedName,
}

impl TableSelection {
    pub fn new(warehouse: impl Into<String>, table: QualifiedName) -> Self {
        Self {
            warehouse: warehouse.into(),
            table,
        }
    }
}

/// A message shown to the user after an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserNotice {
    Success(String),
    /// The operation failed because the caller lacks permission.
    AccessDenied(String),
    Error(String),
}

impl UserNotice {
    pub fn message(&self) -> &str {
        match self {
            UserNotice::Success(m) | UserNotice::AccessDenied(m) | UserNotice::Error(m) => m,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, UserNotice::Success(_))
    }
}

impl fmt::Display for UserNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserNotice::Success(m) => write!(f, "[ok] {m}"),
            UserNotice::AccessDenied(m) => write!(f, "[denied] {m}"),
            UserNotice::Error(m) => write!(f, "[error] {m}"),
        }
    }
}
