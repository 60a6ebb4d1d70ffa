//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a staff member
//! ops-cli user create -e ops@example.com -n "Ops Lead" -r staff
//!
//! # Create a customer user tied to a customer account
//! ops-cli user create -e buyer@depot.example -n "Buyer" -r customer --customer cust-1
//! ```
//!
//! The password is read from `--password` or `OPS_USER_PASSWORD`.

use customer_ops_core::{CustomerId, UserRole};
use customer_ops_portal::db::CustomerRepository;
use customer_ops_portal::services::{AuthService, NewUser};
use customer_ops_portal::store::PgStore;

use super::{CliError, connect};

/// Arguments for `user create`.
pub struct CreateUser<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub password: &'a str,
    pub role: &'a str,
    pub customer: Option<&'a str>,
}

/// Create a user with an email/password credential and a profile.
///
/// # Errors
///
/// Returns `CliError::InvalidArgument` for an unknown role, a customer user
/// without a customer, or a customer ID that does not exist. Registration
/// errors (bad email, weak password, duplicate) are passed through.
pub async fn create(args: CreateUser<'_>) -> Result<(), CliError> {
    let role: UserRole = args
        .role
        .parse()
        .map_err(|_| CliError::InvalidArgument("role", args.role.to_owned()))?;

    let customer_id = args.customer.map(CustomerId::new);
    if role == UserRole::Customer && customer_id.is_none() {
        return Err(CliError::InvalidArgument(
            "customer",
            "customer users need --customer".to_owned(),
        ));
    }

    let store = PgStore::new(connect().await?);

    if let Some(customer_id) = &customer_id
        && CustomerRepository::new(&store).get(customer_id).await?.is_none()
    {
        return Err(CliError::InvalidArgument(
            "customer",
            format!("no customer with ID {customer_id}"),
        ));
    }

    let profile = AuthService::new(&store)
        .register(NewUser {
            email: args.email,
            name: args.name,
            password: args.password,
            role,
            customer_id,
        })
        .await?;

    tracing::info!(
        uid = %profile.id,
        email = args.email,
        role = %profile.role,
        "User created successfully!"
    );
    Ok(())
}
