// src/cli/auth.rs — login / register / logout / whoami

use crossterm::style::Stylize;

use super::Context;
use crate::client::UserProfile;
use crate::infra::errors::CopilotError;

/// Handle `kcopilot login`.
pub async fn run_login(
    ctx: &Context,
    username: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = prompt_text("Username:", username)?;
    let password = prompt_password("Password:", password)?;

    let mut session = ctx.session();
    let user = session.login(&username, &password).await?;
    print_signed_in(&user);
    Ok(())
}

/// Handle `kcopilot register`.
pub async fn run_register(
    ctx: &Context,
    username: Option<String>,
    email: Option<String>,
    password: Option<String>,
) -> anyhow::Result<()> {
    let username = prompt_text("Username:", username)?;
    let email = prompt_text("Email:", email)?;
    let password = prompt_password("Password:", password)?;

    let mut session = ctx.session();
    let user = session.register(&username, &email, &password).await?;
    print_signed_in(&user);
    Ok(())
}

pub fn run_logout(ctx: &Context) {
    ctx.session().logout();
    println!("  Signed out.");
}

/// Handle `kcopilot whoami`.
pub async fn run_whoami(ctx: &Context) -> anyhow::Result<()> {
    let mut session = ctx.session();
    if !session.restore().await? {
        return Err(CopilotError::NotLoggedIn.into());
    }
    if let Some(user) = session.user() {
        print_profile(user);
    }
    Ok(())
}

fn print_signed_in(user: &UserProfile) {
    println!("  {} as {}", "Signed in".green(), user.display_name().bold());
}

pub fn print_profile(user: &UserProfile) {
    println!("  User:   {}", user.display_name());
    if let Some(email) = &user.email {
        println!("  Email:  {email}");
    }
}

fn prompt_text(label: &str, given: Option<String>) -> anyhow::Result<String> {
    if let Some(v) = given.filter(|v| !v.trim().is_empty()) {
        return Ok(v);
    }
    match inquire::Text::new(label).prompt_skippable()? {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        _ => anyhow::bail!("{} is required", label.trim_end_matches(':')),
    }
}

fn prompt_password(label: &str, given: Option<String>) -> anyhow::Result<String> {
    if let Some(v) = given.filter(|v| !v.is_empty()) {
        return Ok(v);
    }
    match inquire::Password::new(label)
        .with_display_mode(inquire::PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt_skippable()?
    {
        Some(v) if !v.is_empty() => Ok(v),
        _ => anyhow::bail!("{} is required", label.trim_end_matches(':')),
    }
}
