//! CLI entry point for cliente-admin.

pub mod auth;
pub mod cep;
pub mod clientes;
mod context;

pub use context::Context;

use clap::{Args, Parser, Subcommand};

/// Result type shared by command handlers.
pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Cliente administration CLI
#[derive(Parser, Debug)]
#[command(name = "cliente-admin", version, about = "Manage clientes on the Cliente backend")]
pub struct Cli {
    /// Backend root URL (overrides CLIENTE_ADMIN_BASE_URL)
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Session management
    Auth(AuthArgs),
    /// Customer records
    Clientes(ClientesArgs),
    /// Look up an address by postal code
    Cep(CepArgs),
}

#[derive(Parser, Debug)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommands,
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    /// Log in and store the credential pair
    Login(LoginArgs),
    /// Revoke this session and clear stored credentials
    Logout,
    /// Revoke every session of the current user
    LogoutAll,
    /// Show stored session state
    Status,
}

/// Arguments for `cliente-admin auth login`.
#[derive(Parser, Debug)]
pub struct LoginArgs {
    pub username: String,

    /// Password; read from stdin when omitted
    #[arg(long)]
    pub senha: Option<String>,
}

#[derive(Parser, Debug)]
pub struct ClientesArgs {
    #[command(subcommand)]
    pub command: ClientesCommands,
}

#[derive(Subcommand, Debug)]
pub enum ClientesCommands {
    /// List every cliente
    List,
    /// Show one cliente
    Show { id: i64 },
    /// Register a new cliente
    Create(ClienteFields),
    /// Change fields of an existing cliente
    Update {
        id: i64,
        #[command(flatten)]
        fields: ClienteFields,
    },
    /// Delete a cliente
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Cliente form fields. `--cep` fills the address when `--endereco` is absent.
#[derive(Args, Debug, Default)]
pub struct ClienteFields {
    #[arg(long)]
    pub nome: Option<String>,
    #[arg(long)]
    pub cpf: Option<String>,
    #[arg(long)]
    pub endereco: Option<String>,
    #[arg(long)]
    pub cep: Option<String>,
}

#[derive(Parser, Debug)]
pub struct CepArgs {
    pub cep: String,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
