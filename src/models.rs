use serde::{Deserialize, Serialize};
use std::fmt;

/// Storage bucket descriptor, serialized as-is into the create request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketSpec {
    pub id: String,
    pub name: String,
    pub public: bool,
}

impl BucketSpec {
    pub fn new(id: &str, public: bool) -> Self {
        Self {
            id: id.to_string(),
            name: id.to_string(),
            public,
        }
    }
}

/// The three buckets the platform expects.
pub fn default_buckets() -> Vec<BucketSpec> {
    vec![
        BucketSpec::new("avatars", true),
        BucketSpec::new("documents", false),
        BucketSpec::new("professional-cards", false),
    ]
}

/// Request body for the admin user-creation endpoint.
#[derive(Debug, Serialize)]
pub struct NewAdminUser {
    pub email: String,
    pub password: String,
    pub email_confirm: bool,
}

/// Subset of the admin user-creation response we care about.
#[derive(Debug, Default, Deserialize)]
pub struct AdminUser {
    pub id: Option<String>,
    pub email: Option<String>,
}

/// Result of one verification step: a boolean plus a human-readable detail.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub name: &'static str,
    pub success: bool,
    pub detail: String,
}

impl StepOutcome {
    pub fn success(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            success: true,
            detail: detail.into(),
        }
    }

    pub fn failure(name: &'static str, detail: impl Into<String>) -> Self {
        Self {
            name,
            success: false,
            detail: detail.into(),
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.success { "✅" } else { "❌" };
        write!(f, "{} {}: {}", mark, self.name, self.detail)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SchemaStatus {
    Present { rows: usize },
    Absent,
}

impl fmt::Display for SchemaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaStatus::Present { rows } => {
                write!(f, "schema present ({} existing rows)", rows)
            }
            SchemaStatus::Absent => write!(f, "schema not configured yet"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BucketStatus {
    Created,
    AlreadyExists,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct BucketOutcome {
    pub id: String,
    pub status: BucketStatus,
}

impl fmt::Display for BucketOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.status {
            BucketStatus::Created => write!(f, "bucket '{}' created", self.id),
            BucketStatus::AlreadyExists => write!(f, "bucket '{}' already exists", self.id),
            BucketStatus::Failed(detail) => {
                write!(f, "bucket '{}' failed: {}", self.id, detail)
            }
        }
    }
}

/// Collected outcomes of a full setup run.
#[derive(Debug, Clone)]
pub struct SetupReport {
    pub rest_api: StepOutcome,
    pub auth_api: StepOutcome,
    pub schema: SchemaStatus,
    pub user_test: StepOutcome,
    pub buckets: Vec<BucketOutcome>,
}

impl SetupReport {
    /// Schema and bucket outcomes are reported but never gate the verdict.
    pub fn overall(&self) -> bool {
        self.rest_api.success && self.auth_api.success && self.user_test.success
    }
}
