use clap::Parser;
use dotenv::dotenv;
use supacheck::{cli, models, operations, Result};

fn resolve_client(conn: cli::ConnectionOpts) -> Result<operations::ProjectClient> {
    let url = conn
        .url
        .or_else(|| std::env::var("SUPABASE_URL").ok())
        .ok_or("No project URL given, use --url or set the SUPABASE_URL environment variable")?;

    // Flags win over environment variables
    let anon_key = conn
        .anon_key
        .or_else(|| std::env::var("SUPABASE_ANON_KEY").ok())
        .unwrap_or_default();
    let service_key = conn
        .service_key
        .or_else(|| std::env::var("SUPABASE_SERVICE_KEY").ok())
        .unwrap_or_default();
    let project_id = conn
        .project_id
        .or_else(|| std::env::var("SUPABASE_PROJECT_ID").ok());

    operations::ProjectClient::new(&url, &anon_key, &service_key, project_id.as_deref())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    dotenv().ok();

    env_logger::init();
    let args = cli::Cli::parse();

    match args.command {
        cli::Commands::Setup { conn } => {
            let client = resolve_client(conn)?;
            client.run_setup().await;
        }
        cli::Commands::Check { conn } => {
            let client = resolve_client(conn)?;
            println!("{}", client.check_rest_api().await);
            println!("{}", client.check_auth_api().await);
        }
        cli::Commands::Schema { conn } => {
            let client = resolve_client(conn)?;
            println!("{}", client.check_schema().await);
        }
        cli::Commands::UserTest { conn } => {
            let client = resolve_client(conn)?;
            println!("{}", client.test_admin_user().await);
        }
        cli::Commands::Buckets { conn } => {
            let client = resolve_client(conn)?;
            for outcome in client.provision_buckets(&models::default_buckets()).await {
                println!("{}", outcome);
            }
        }
        cli::Commands::Guide { conn } => {
            // The guide only needs a project id, not credentials
            let project_id = match conn
                .project_id
                .or_else(|| std::env::var("SUPABASE_PROJECT_ID").ok())
            {
                Some(id) => id,
                None => {
                    let url = conn
                        .url
                        .or_else(|| std::env::var("SUPABASE_URL").ok())
                        .ok_or("No project id given, use --project-id or --url")?;
                    operations::derive_project_id(&url)?
                }
            };
            println!("{}", operations::render_guide(&project_id));
        }
    }

    Ok(())
}
