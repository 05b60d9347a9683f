//! CLI auth command handlers for login, logout, and status.

use std::io::Write;

use chrono::Utc;

use super::{CommandResult, Context, LoginArgs};

/// Handle `cliente-admin auth login <username>`.
pub async fn handle_login(context: &Context, args: LoginArgs) -> CommandResult {
    let senha = match args.senha {
        Some(senha) => senha,
        None => prompt("🔑 Senha: ")?,
    };

    context
        .auth()
        .login(&args.username, &senha)
        .await
        .map_err(|e| format!("Erro ao fazer login: {e}"))?;
    println!("✅ Logged in as {}", args.username);
    Ok(())
}

/// Handle `cliente-admin auth logout`.
pub async fn handle_logout(context: &Context) -> CommandResult {
    context.auth().logout().await?;
    println!("✅ Logged out");
    Ok(())
}

/// Handle `cliente-admin auth logout-all`.
pub async fn handle_logout_all(context: &Context) -> CommandResult {
    context.auth().logout_all().await?;
    println!("✅ Logged out of every session");
    Ok(())
}

/// Handle `cliente-admin auth status`.
pub async fn handle_status(context: &Context) -> CommandResult {
    println!("🔐 Session Status\n");
    println!("  Backend: {}", context.config.base_url);

    let status = match context.auth().status()? {
        Some(pair) => match pair.access_expires_at() {
            Some(expires) if expires > Utc::now() => format!(
                "✅ Logged in (access expires {})",
                expires.format("%Y-%m-%d %H:%M")
            ),
            Some(_) => "⚠️  Access credential expired (refreshes on next request)".to_string(),
            None => "✅ Logged in".to_string(),
        },
        None => "❌ Not logged in".to_string(),
    };
    println!("  Session: {status}");
    Ok(())
}

pub(crate) fn prompt(label: &str) -> Result<String, std::io::Error> {
    print!("{label}");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
