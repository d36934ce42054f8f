use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "supacheck")]
#[command(about = "Verify and provision a Supabase project over its HTTP API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Connection settings shared by every subcommand. Flags win over their
/// environment-variable counterparts.
#[derive(Args)]
pub struct ConnectionOpts {
    /// Project URL (defaults to SUPABASE_URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Anonymous API key (defaults to SUPABASE_ANON_KEY)
    #[arg(long)]
    pub anon_key: Option<String>,

    /// service_role API key (defaults to SUPABASE_SERVICE_KEY)
    #[arg(long)]
    pub service_key: Option<String>,

    /// Project reference id (defaults to SUPABASE_PROJECT_ID, else derived from the URL)
    #[arg(long)]
    pub project_id: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full verification and provisioning flow
    Setup {
        #[command(flatten)]
        conn: ConnectionOpts,
    },

    /// Check REST and Auth API connectivity
    Check {
        #[command(flatten)]
        conn: ConnectionOpts,
    },

    /// Check whether the application schema is configured
    Schema {
        #[command(flatten)]
        conn: ConnectionOpts,
    },

    /// Exercise the admin user create/delete round trip
    UserTest {
        #[command(flatten)]
        conn: ConnectionOpts,
    },

    /// Provision the default storage buckets
    Buckets {
        #[command(flatten)]
        conn: ConnectionOpts,
    },

    /// Print the manual configuration guide
    Guide {
        #[command(flatten)]
        conn: ConnectionOpts,
    },
}
