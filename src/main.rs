//! cliente-admin CLI binary entry point.

use cliente_admin::cli::{self, AuthCommands, Cli, ClientesCommands, Commands, Context};
use cliente_admin::config::AdminConfig;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "CLIENTE_ADMIN_LOG";

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse_args();

    let mut config = match AdminConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
    }
    let context = match Context::new(config) {
        Ok(context) => context,
        Err(e) => {
            eprintln!("❌ {e}");
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Auth(auth_args) => match auth_args.command {
            AuthCommands::Login(args) => cli::auth::handle_login(&context, args).await,
            AuthCommands::Logout => cli::auth::handle_logout(&context).await,
            AuthCommands::LogoutAll => cli::auth::handle_logout_all(&context).await,
            AuthCommands::Status => cli::auth::handle_status(&context).await,
        },
        Commands::Clientes(clientes_args) => match clientes_args.command {
            ClientesCommands::List => cli::clientes::handle_list(&context).await,
            ClientesCommands::Show { id } => cli::clientes::handle_show(&context, id).await,
            ClientesCommands::Create(fields) => cli::clientes::handle_create(&context, fields).await,
            ClientesCommands::Update { id, fields } => {
                cli::clientes::handle_update(&context, id, fields).await
            }
            ClientesCommands::Delete { id, yes } => {
                cli::clientes::handle_delete(&context, id, yes).await
            }
        },
        Commands::Cep(args) => cli::cep::handle_lookup(&context, &args.cep).await,
    };

    if let Some(reason) = context.session_ended() {
        eprintln!("🔒 Session ended ({reason}). Log in again: cliente-admin auth login <username>");
        std::process::exit(1);
    }
    if let Err(e) = result {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
