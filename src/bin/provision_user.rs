//! Operator tool: inserts a portal account with an argon2-hashed password.
//!
//! Usage: provision_user <username> <password> <role_id> [employee_id]
//! Role ids: 1 = admin, 2 = approver, 3 = employee.

use anyhow::{Context, Result, bail};
use sqlx::MySqlPool;
use std::env;

use leave_portal::auth::password::hash_password;
use leave_portal::model::role::Role;

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let args: Vec<String> = env::args().skip(1).collect();
    let (username, password, role_arg) = match args.as_slice() {
        [username, password, role, ..] => (username, password, role),
        _ => bail!("usage: provision_user <username> <password> <role_id> [employee_id]"),
    };

    let role_id: u8 = role_arg.parse().context("role_id must be numeric")?;
    if Role::from_id(role_id).is_none() {
        bail!("unknown role id {role_id}; expected 1 (admin), 2 (approver) or 3 (employee)");
    }

    let employee_id: Option<u64> = args
        .get(3)
        .map(|v| v.parse())
        .transpose()
        .context("employee_id must be numeric")?;

    let database_url = env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = MySqlPool::connect(&database_url)
        .await
        .context("connecting to database")?;

    let hashed = hash_password(password);

    sqlx::query(
        r#"
        INSERT INTO users (username, password, role_id, employee_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(username)
    .bind(hashed)
    .bind(role_id)
    .bind(employee_id)
    .execute(&pool)
    .await
    .context("inserting user")?;

    println!("user '{username}' created with role id {role_id}");
    Ok(())
}
