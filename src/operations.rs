use crate::common;
use crate::models;
use crate::Result;
use log::{error, info, warn};
use reqwest::{Client as ReqwestClient, StatusCode};
use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid project URL: {0}")]
    InvalidUrl(String),
    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
}

/// Fixed password for the throwaway probe user.
const PROBE_PASSWORD: &str = "TestPassword123!";

/// Ensure the endpoint has a scheme, drop any trailing slash, reject
/// anything `Url` cannot parse.
fn normalize_endpoint(endpoint: &str) -> Result<String> {
    let base_url = if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        format!("https://{}", endpoint)
    } else {
        endpoint.to_string()
    };

    let base_url = base_url.trim_end_matches('/').to_string();

    Url::parse(&base_url).map_err(|_| ConfigError::InvalidUrl(endpoint.to_string()))?;
    Ok(base_url)
}

/// Project reference is the first host label (`<ref>.supabase.co`).
pub fn derive_project_id(endpoint: &str) -> Result<String> {
    let url = Url::parse(&normalize_endpoint(endpoint)?)
        .map_err(|_| ConfigError::InvalidUrl(endpoint.to_string()))?;
    let host = url
        .host_str()
        .ok_or_else(|| ConfigError::InvalidUrl(endpoint.to_string()))?;
    Ok(host.split('.').next().unwrap_or(host).to_string())
}

fn probe_email() -> String {
    format!("probe-{}@supacheck.dev", chrono::Utc::now().timestamp())
}

pub struct ProjectClient {
    base_url: String,
    anon_key: String,
    service_key: String,
    project_id: String,
    client: ReqwestClient,
}

impl ProjectClient {
    pub fn new(
        endpoint: &str,
        anon_key: &str,
        service_key: &str,
        project_id: Option<&str>,
    ) -> Result<Self> {
        if anon_key.is_empty() {
            return Err(ConfigError::MissingCredential("anon key").into());
        }
        if service_key.is_empty() {
            return Err(ConfigError::MissingCredential("service key").into());
        }

        let base_url = normalize_endpoint(endpoint)?;
        let project_id = match project_id {
            Some(id) => id.to_string(),
            None => derive_project_id(&base_url)?,
        };

        let client = common::create_client()?;

        Ok(Self {
            base_url,
            anon_key: anon_key.to_string(),
            service_key: service_key.to_string(),
            project_id,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// REST liveness probe. Success is HTTP 200 exactly; transport errors
    /// fold into a failed outcome instead of propagating.
    pub async fn check_rest_api(&self) -> models::StepOutcome {
        info!("Checking REST API connectivity...");

        let response = self
            .client
            .get(format!("{}/rest/v1/", self.base_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.anon_key)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status() == StatusCode::OK => {
                info!("REST API reachable");
                models::StepOutcome::success("rest-api", "REST API reachable")
            }
            Ok(resp) => {
                error!("REST API unreachable (HTTP {})", resp.status());
                models::StepOutcome::failure(
                    "rest-api",
                    format!("REST API unreachable (HTTP {})", resp.status()),
                )
            }
            Err(e) => {
                error!("REST API connection error: {}", e);
                models::StepOutcome::failure("rest-api", format!("connection error: {}", e))
            }
        }
    }

    /// Auth liveness probe. Sends only the apikey header.
    pub async fn check_auth_api(&self) -> models::StepOutcome {
        info!("Checking Auth API connectivity...");

        let response = self
            .client
            .get(format!("{}/auth/v1/settings", self.base_url))
            .header("apikey", &self.anon_key)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status() == StatusCode::OK => {
                info!("Auth API reachable");
                models::StepOutcome::success("auth-api", "Auth API reachable")
            }
            Ok(resp) => {
                error!("Auth API unreachable (HTTP {})", resp.status());
                models::StepOutcome::failure(
                    "auth-api",
                    format!("Auth API unreachable (HTTP {})", resp.status()),
                )
            }
            Err(e) => {
                error!("Auth API connection error: {}", e);
                models::StepOutcome::failure("auth-api", format!("connection error: {}", e))
            }
        }
    }

    /// Probe one known table of the application schema. Anything other than
    /// a clean 200 is treated as "not configured yet".
    pub async fn check_schema(&self) -> models::SchemaStatus {
        info!("Checking for an existing application schema...");

        let response = self
            .client
            .get(format!("{}/rest/v1/users?limit=1", self.base_url))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await;

        match response {
            Ok(resp) if resp.status() == StatusCode::OK => {
                let rows = resp
                    .json::<serde_json::Value>()
                    .await
                    .ok()
                    .and_then(|v| v.as_array().map(|a| a.len()))
                    .unwrap_or(0);
                info!("Application schema already configured ({} existing rows)", rows);
                models::SchemaStatus::Present { rows }
            }
            Ok(resp) if resp.status() == StatusCode::NOT_FOUND => {
                info!("Application schema not configured yet");
                models::SchemaStatus::Absent
            }
            Ok(resp) => {
                warn!("Unexpected status from schema probe: {}", resp.status());
                models::SchemaStatus::Absent
            }
            Err(_) => {
                info!("Application schema not configured yet (endpoint unreachable)");
                models::SchemaStatus::Absent
            }
        }
    }

    /// Create a throwaway admin user, then delete it again. A failed delete
    /// is logged but does not fail the step.
    pub async fn test_admin_user(&self) -> models::StepOutcome {
        let email = probe_email();
        info!("Creating probe user {}...", email);

        let payload = models::NewAdminUser {
            email: email.clone(),
            password: PROBE_PASSWORD.to_string(),
            email_confirm: true,
        };

        let response = self
            .client
            .post(format!("{}/auth/v1/admin/users", self.base_url))
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&payload)
            .send()
            .await;

        let response = match response {
            Ok(resp) => resp,
            Err(e) => {
                error!("Probe user creation failed: {}", e);
                return models::StepOutcome::failure(
                    "user-test",
                    format!("connection error: {}", e),
                );
            }
        };

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            error!("Probe user creation returned HTTP {}: {}", status, body);
            return models::StepOutcome::failure(
                "user-test",
                format!("user creation failed (HTTP {})", status),
            );
        }

        let user: models::AdminUser = response.json().await.unwrap_or_default();
        info!("Probe user created: {}", email);

        match user.id {
            Some(id) => {
                let delete = self
                    .client
                    .delete(format!("{}/auth/v1/admin/users/{}", self.base_url, id))
                    .header("apikey", &self.service_key)
                    .bearer_auth(&self.service_key)
                    .send()
                    .await;

                match delete {
                    Ok(resp) if resp.status() == StatusCode::OK => {
                        info!("Probe user deleted");
                    }
                    Ok(resp) => {
                        warn!("Could not delete probe user (HTTP {})", resp.status());
                    }
                    Err(e) => {
                        warn!("Could not delete probe user: {}", e);
                    }
                }
            }
            None => {
                warn!("Create response carried no user id, skipping cleanup");
            }
        }

        models::StepOutcome::success(
            "user-test",
            format!("admin user round trip ok ({})", email),
        )
    }

    /// Create each bucket in turn. 409 means it already exists; other
    /// failures are logged and the loop keeps going.
    pub async fn provision_buckets(
        &self,
        buckets: &[models::BucketSpec],
    ) -> Vec<models::BucketOutcome> {
        info!("Provisioning storage buckets...");

        let mut outcomes = Vec::with_capacity(buckets.len());
        for bucket in buckets {
            let response = self
                .client
                .post(format!("{}/storage/v1/bucket", self.base_url))
                .header("apikey", &self.service_key)
                .bearer_auth(&self.service_key)
                .json(bucket)
                .send()
                .await;

            let status = match response {
                Ok(resp) => match resp.status() {
                    StatusCode::OK | StatusCode::CREATED => {
                        info!("Bucket '{}' created", bucket.id);
                        models::BucketStatus::Created
                    }
                    StatusCode::CONFLICT => {
                        info!("Bucket '{}' already exists", bucket.id);
                        models::BucketStatus::AlreadyExists
                    }
                    other => {
                        warn!("Bucket '{}' returned HTTP {}", bucket.id, other);
                        models::BucketStatus::Failed(format!("HTTP {}", other))
                    }
                },
                Err(e) => {
                    error!("Bucket '{}' creation failed: {}", bucket.id, e);
                    models::BucketStatus::Failed(e.to_string())
                }
            };

            outcomes.push(models::BucketOutcome {
                id: bucket.id.clone(),
                status,
            });
        }
        outcomes
    }

    /// Full verification and provisioning flow, in fixed order. The schema
    /// result is reported but never gates later steps. Always returns a
    /// report, never an error.
    pub async fn run_setup(&self) -> models::SetupReport {
        println!("🗄️ Supabase project check — {}", self.project_id);
        println!("{}", "=".repeat(50));

        let rest_api = self.check_rest_api().await;
        println!("{}", rest_api);

        let auth_api = self.check_auth_api().await;
        println!("{}", auth_api);

        let schema = self.check_schema().await;
        println!("• {}", schema);

        let user_test = self.test_admin_user().await;
        println!("{}", user_test);

        let buckets = self.provision_buckets(&models::default_buckets()).await;
        for outcome in &buckets {
            println!("• {}", outcome);
        }

        println!("{}", render_guide(&self.project_id));

        let report = models::SetupReport {
            rest_api,
            auth_api,
            schema,
            user_test,
            buckets,
        };

        println!("{}", "=".repeat(50));
        if report.overall() {
            println!("✅ Supabase project reachable and ready for configuration");
            println!();
            println!("Recommended next steps:");
            println!("  1. Apply the database schema via the SQL editor (see guide above)");
            println!("  2. Configure the backend deployment");
            println!("  3. Deploy the frontend");
        } else {
            println!("❌ Problems detected with the Supabase project");
        }

        report
    }
}

/// Static manual-configuration guide with dashboard URLs for this project.
pub fn render_guide(project_id: &str) -> String {
    format!(
        r#"
{bar}
📋 MANUAL SUPABASE CONFIGURATION GUIDE
{bar}

🔗 Key URLs:
  - Dashboard: https://supabase.com/dashboard/project/{id}
  - SQL Editor: https://supabase.com/dashboard/project/{id}/sql
  - Table Editor: https://supabase.com/dashboard/project/{id}/editor
  - Auth Settings: https://supabase.com/dashboard/project/{id}/auth/settings

📝 Configuration steps:

1. DATABASE SCHEMA:
   - Open https://supabase.com/dashboard/project/{id}/sql
   - Create a new query
   - Paste the contents of database/supabase/01-schema.sql and run it
   - Repeat for 02-functions.sql and 03-seed-data.sql

2. AUTHENTICATION:
   - Open https://supabase.com/dashboard/project/{id}/auth/settings
   - Set the site URL and the /auth/callback redirect URL
   - Enable email confirmation

3. STORAGE:
   - Buckets are created automatically when possible
   - Otherwise create manually: avatars, documents, professional-cards

4. VERIFICATION:
   - Open https://supabase.com/dashboard/project/{id}/editor
   - Check that the application schema and its tables exist
   - Try signing in
"#,
        bar = "=".repeat(60),
        id = project_id
    )
}
