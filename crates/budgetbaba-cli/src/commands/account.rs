use std::path::Path;

use anyhow::Result;

use budgetbaba_core::{AppContext, SessionState};

use crate::ui::notify;

pub async fn register(
    ctx: &AppContext,
    name: &str,
    email: &str,
    password: &str,
    photo: Option<&Path>,
) -> Result<()> {
    let user = ctx.register(name, email, password, photo).await?;
    notify::success(&format!(
        "Account created for {}. Run `budgetbaba login` to sign in.",
        user.email
    ));
    Ok(())
}

pub fn logout(ctx: &AppContext) -> Result<()> {
    let was_logged_in = ctx.session.is_authenticated();
    ctx.logout()?;
    if was_logged_in {
        notify::success("Logged out");
    } else {
        eprintln!("Not logged in.");
    }
    Ok(())
}

pub fn whoami(ctx: &AppContext) -> Result<()> {
    match ctx.state() {
        SessionState::Authenticated(data) => {
            println!("{} <{}>", data.user.display_name(), data.user.email);
            if let Some(url) = data.user.profile_image_url.as_deref().filter(|u| !u.is_empty()) {
                println!("Photo: {}", url);
            }
        }
        SessionState::Anonymous => println!("Not logged in"),
    }
    Ok(())
}

pub async fn health(ctx: &AppContext) -> Result<()> {
    ctx.api.health().await?;
    notify::success(&format!("API is up at {}", ctx.api.base_url()));
    Ok(())
}

/// Upload an image and print its URL on stdout, for use as an icon.
pub async fn upload(ctx: &AppContext, file: &Path) -> Result<()> {
    let url = ctx.media.upload_file(file).await?;
    println!("{}", url);
    Ok(())
}
