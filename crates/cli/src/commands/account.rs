//! Session and account directory commands.

use secrecy::{ExposeSecret, SecretString};

use eliteshop_core::Session;
use eliteshop_storefront::{Storefront, StorefrontError};

fn describe(session: &Session) -> String {
    format!("{} <{}>", session.name, session.email)
}

/// Sign in.
///
/// # Errors
///
/// Returns the auth error on invalid input, unknown email or wrong password.
#[allow(clippy::print_stdout)]
pub async fn login(
    storefront: &Storefront,
    email: &str,
    password: SecretString,
) -> Result<(), StorefrontError> {
    let session = storefront
        .session()
        .login(email, password.expose_secret())
        .await?;
    println!("Welcome back, {}!", describe(&session));
    Ok(())
}

/// Create an account and sign in.
///
/// # Errors
///
/// Returns the auth error on invalid input or an already registered email.
#[allow(clippy::print_stdout)]
pub async fn register(
    storefront: &Storefront,
    name: &str,
    email: &str,
    password: SecretString,
) -> Result<(), StorefrontError> {
    let session = storefront
        .session()
        .register(name, email, password.expose_secret())
        .await?;
    println!("Account created. Signed in as {}.", describe(&session));
    Ok(())
}

/// Sign out.
///
/// # Errors
///
/// Returns the auth error if the session record cannot be deleted.
#[allow(clippy::print_stdout)]
pub fn logout(storefront: &Storefront) -> Result<(), StorefrontError> {
    match storefront.session().logout()? {
        Some(previous) => println!("Signed out {}.", describe(&previous)),
        None => println!("Not signed in."),
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub fn whoami(storefront: &Storefront) {
    match storefront.session().current_session() {
        Some(session) => println!("{}", describe(&session)),
        None => println!("Not signed in."),
    }
}

/// List registered accounts.
///
/// # Errors
///
/// Returns the auth error if the directory cannot be read or seeded.
#[allow(clippy::print_stdout)]
pub fn users(storefront: &Storefront) -> Result<(), StorefrontError> {
    for user in storefront.session().registered_users()? {
        println!("{:<28} {}", user.email.as_str(), user.name);
    }
    Ok(())
}
